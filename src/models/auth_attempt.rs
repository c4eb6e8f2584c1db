use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::config::AuthAttemptsConfig;
use crate::database::{paged_find, DatabaseError, PageRequest, Paged};

/// A failed login, recorded for abuse detection. Attempts are only written
/// by the login flow; the API surface is list/read/delete.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuthAttempt {
    pub id: Uuid,
    pub ip: String,
    pub username: String,
    pub time: DateTime<Utc>,
}

/// Threshold comparison, kept separate from the counting queries
pub fn is_abusive(ip_count: i64, ip_and_user_count: i64, config: &AuthAttemptsConfig) -> bool {
    ip_count >= config.for_ip || ip_and_user_count >= config.for_ip_and_user
}

impl AuthAttempt {
    pub const TABLE: &'static str = "auth_attempts";

    pub const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("ip", "ip"),
        ("username", "username"),
        ("time", "time"),
    ];

    pub async fn paged_find(
        pool: &PgPool,
        request: &PageRequest,
    ) -> Result<Paged<AuthAttempt>, DatabaseError> {
        paged_find(pool, Self::TABLE, request).await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<AuthAttempt>, DatabaseError> {
        let attempt = sqlx::query_as::<_, AuthAttempt>("SELECT * FROM auth_attempts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(attempt)
    }

    pub async fn create(
        pool: &PgPool,
        ip: &str,
        username: &str,
    ) -> Result<AuthAttempt, DatabaseError> {
        let attempt = sqlx::query_as::<_, AuthAttempt>(
            "INSERT INTO auth_attempts (id, ip, username, time) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(ip)
        .bind(username)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;
        Ok(attempt)
    }

    /// True when either the ip or the ip + username pair has reached its
    /// configured attempt maximum.
    pub async fn abuse_detected(
        pool: &PgPool,
        ip: &str,
        username: &str,
        config: &AuthAttemptsConfig,
    ) -> Result<bool, DatabaseError> {
        let ip_count: i64 =
            sqlx::query("SELECT COUNT(*) AS count FROM auth_attempts WHERE ip = $1")
                .bind(ip)
                .fetch_one(pool)
                .await?
                .try_get("count")?;

        let ip_and_user_count: i64 = sqlx::query(
            "SELECT COUNT(*) AS count FROM auth_attempts WHERE ip = $1 AND username = $2",
        )
        .bind(ip)
        .bind(username)
        .fetch_one(pool)
        .await?
        .try_get("count")?;

        Ok(is_abusive(ip_count, ip_and_user_count, config))
    }

    pub async fn delete_by_id(pool: &PgPool, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM auth_attempts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthAttemptsConfig {
        AuthAttemptsConfig {
            for_ip: 50,
            for_ip_and_user: 7,
        }
    }

    #[test]
    fn below_both_thresholds_is_not_abuse() {
        assert!(!is_abusive(49, 6, &config()));
    }

    #[test]
    fn ip_threshold_alone_triggers() {
        assert!(is_abusive(50, 0, &config()));
    }

    #[test]
    fn ip_and_user_threshold_alone_triggers() {
        assert!(is_abusive(10, 7, &config()));
    }
}
