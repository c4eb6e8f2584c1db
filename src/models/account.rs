use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::{paged_find, DatabaseError, PageRequest, Paged};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub user_id: Option<Uuid>,
    pub time_created: DateTime<Utc>,
}

/// First token becomes the first name, the remainder the last name.
pub fn split_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<&str>>().join(" ");
    (first, last)
}

impl Account {
    pub const TABLE: &'static str = "accounts";

    pub const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("timeCreated", "time_created"),
    ];

    pub async fn paged_find(
        pool: &PgPool,
        request: &PageRequest,
    ) -> Result<Paged<Account>, DatabaseError> {
        paged_find(pool, Self::TABLE, request).await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Account>, DatabaseError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(account)
    }

    pub async fn create(pool: &PgPool, name: &str) -> Result<Account, DatabaseError> {
        let (first, last) = split_name(name);

        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, first_name, last_name, time_created) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(first)
        .bind(last)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;
        Ok(account)
    }

    pub async fn update_by_id(
        pool: &PgPool,
        id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Account>, DatabaseError> {
        let account = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET first_name = $2, last_name = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(pool)
        .await?;
        Ok(account)
    }

    pub async fn delete_by_id(pool: &PgPool, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_two_part_name() {
        assert_eq!(split_name("Stimpson Cat"), ("Stimpson".into(), "Cat".into()));
    }

    #[test]
    fn split_single_name() {
        assert_eq!(split_name("Stimpson"), ("Stimpson".into(), "".into()));
    }

    #[test]
    fn split_keeps_compound_last_names() {
        assert_eq!(
            split_name("Stimpson J Cat"),
            ("Stimpson".into(), "J Cat".into())
        );
    }
}
