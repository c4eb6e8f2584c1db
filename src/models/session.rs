use bcrypt::DEFAULT_COST;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::{paged_find, DatabaseError, PageRequest, Paged};

/// A login session. `key` stores the bcrypt hash of the session key; the
/// plaintext is returned exactly once, from `create`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub key: String,
    pub time: DateTime<Utc>,
}

impl Session {
    pub const TABLE: &'static str = "sessions";

    pub const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("userId", "user_id"),
        ("time", "time"),
    ];

    pub async fn paged_find(
        pool: &PgPool,
        request: &PageRequest,
    ) -> Result<Paged<Session>, DatabaseError> {
        paged_find(pool, Self::TABLE, request).await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Session>, DatabaseError> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(session)
    }

    /// Create a session for a user. Returns the stored document plus the
    /// plaintext key the client must present on subsequent requests.
    pub async fn create(pool: &PgPool, user_id: Uuid) -> Result<(Session, String), DatabaseError> {
        let key = Uuid::new_v4().to_string();
        let key_hash = bcrypt::hash(&key, DEFAULT_COST)
            .map_err(|e| DatabaseError::QueryError(format!("session key hash failed: {}", e)))?;

        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, user_id, key, time) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(key_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok((session, key))
    }

    /// Load a session by id and verify the presented key against the stored
    /// hash. Returns None when either check misses.
    pub async fn find_by_credentials(
        pool: &PgPool,
        id: Uuid,
        key: &str,
    ) -> Result<Option<Session>, DatabaseError> {
        let session = Self::find_by_id(pool, id).await?;

        match session {
            Some(session) if bcrypt::verify(key, &session.key).unwrap_or(false) => {
                Ok(Some(session))
            }
            _ => Ok(None),
        }
    }

    pub async fn delete_by_id(pool: &PgPool, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_user_id(pool: &PgPool, user_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
