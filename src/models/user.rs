use bcrypt::DEFAULT_COST;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::{paged_find, DatabaseError, PageRequest, Paged};

/// An authenticatable identity. The admin/account links determine which
/// scopes a credential built from this user carries.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// bcrypt hash, never serialized to the wire
    #[serde(skip_serializing)]
    pub password: String,
    pub is_active: bool,
    pub admin_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    pub time_created: DateTime<Utc>,
}

impl User {
    pub const TABLE: &'static str = "users";

    pub const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("username", "username"),
        ("email", "email"),
        ("isActive", "is_active"),
        ("timeCreated", "time_created"),
    ];

    /// Scopes this user's credentials may carry, derived from role links
    pub fn scopes(&self) -> Vec<&'static str> {
        let mut scopes = Vec::with_capacity(2);
        if self.admin_id.is_some() {
            scopes.push("admin");
        }
        if self.account_id.is_some() {
            scopes.push("account");
        }
        scopes
    }

    pub async fn paged_find(
        pool: &PgPool,
        request: &PageRequest,
    ) -> Result<Paged<User>, DatabaseError> {
        paged_find(pool, Self::TABLE, request).await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Look up an active user by username or email and verify the password
    /// against the stored hash. A miss and a bad password are
    /// indistinguishable to the caller.
    pub async fn find_by_credentials(
        pool: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE (username = $1 OR email = $1) AND is_active",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        match user {
            Some(user) if bcrypt::verify(password, &user.password).unwrap_or(false) => {
                Ok(Some(user))
            }
            _ => Ok(None),
        }
    }

    pub async fn create(
        pool: &PgPool,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, DatabaseError> {
        let password_hash = bcrypt::hash(password, DEFAULT_COST)
            .map_err(|e| DatabaseError::QueryError(format!("password hash failed: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password, is_active, time_created) \
             VALUES ($1, $2, $3, $4, TRUE, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    pub async fn update_by_id(
        pool: &PgPool,
        id: Uuid,
        is_active: bool,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET is_active = $2, username = $3, email = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .bind(username)
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub async fn delete_by_id(pool: &PgPool, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(admin: bool, account: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: "ren".to_string(),
            email: "ren@stimpy.show".to_string(),
            password: String::new(),
            is_active: true,
            admin_id: admin.then(Uuid::new_v4),
            account_id: account.then(Uuid::new_v4),
            time_created: Utc::now(),
        }
    }

    #[test]
    fn scopes_follow_role_links() {
        assert_eq!(user(true, false).scopes(), vec!["admin"]);
        assert_eq!(user(false, true).scopes(), vec!["account"]);
        assert_eq!(user(true, true).scopes(), vec!["admin", "account"]);
        assert!(user(false, false).scopes().is_empty());
    }

    #[test]
    fn password_is_not_serialized() {
        let mut u = user(false, false);
        u.password = "$2b$10$secret".to_string();
        let value = serde_json::to_value(&u).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("username").is_some());
    }
}
