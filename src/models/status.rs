use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::{paged_find, DatabaseError, PageRequest, Paged};
use crate::models::slugify;

/// A workflow state attachable to a pivot entity ("Account" + "Happy" ->
/// id "account-happy").
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: String,
    pub pivot: String,
    pub name: String,
    pub time_created: DateTime<Utc>,
}

impl Status {
    pub const TABLE: &'static str = "statuses";

    pub const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("pivot", "pivot"),
        ("name", "name"),
        ("timeCreated", "time_created"),
    ];

    pub fn id_for(pivot: &str, name: &str) -> String {
        slugify(&format!("{} {}", pivot, name))
    }

    pub async fn paged_find(
        pool: &PgPool,
        request: &PageRequest,
    ) -> Result<Paged<Status>, DatabaseError> {
        paged_find(pool, Self::TABLE, request).await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Status>, DatabaseError> {
        let status = sqlx::query_as::<_, Status>("SELECT * FROM statuses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(status)
    }

    pub async fn create(pool: &PgPool, pivot: &str, name: &str) -> Result<Status, DatabaseError> {
        let status = sqlx::query_as::<_, Status>(
            "INSERT INTO statuses (id, pivot, name, time_created) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Self::id_for(pivot, name))
        .bind(pivot)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;
        Ok(status)
    }

    pub async fn update_by_id(
        pool: &PgPool,
        id: &str,
        name: &str,
    ) -> Result<Option<Status>, DatabaseError> {
        let status = sqlx::query_as::<_, Status>(
            "UPDATE statuses SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;
        Ok(status)
    }

    pub async fn delete_by_id(pool: &PgPool, id: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM statuses WHERE id = $1")
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
    fn id_combines_pivot_and_name() {
        assert_eq!(Status::id_for("Account", "Happy"), "account-happy");
        assert_eq!(Status::id_for("Account", "Setup In Progress"), "account-setup-in-progress");
    }
}
