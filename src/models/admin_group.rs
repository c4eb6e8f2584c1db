use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::{paged_find, DatabaseError, PageRequest, Paged};
use crate::models::slugify;

/// An authorization partition among admins. The id is the slugified name
/// ("Root" -> "root") and doubles as the membership key on admin documents.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminGroup {
    pub id: String,
    pub name: String,
}

impl AdminGroup {
    pub const TABLE: &'static str = "admin_groups";

    pub const SORTABLE: &'static [(&'static str, &'static str)] =
        &[("id", "id"), ("name", "name")];

    pub async fn paged_find(
        pool: &PgPool,
        request: &PageRequest,
    ) -> Result<Paged<AdminGroup>, DatabaseError> {
        paged_find(pool, Self::TABLE, request).await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<AdminGroup>, DatabaseError> {
        let group = sqlx::query_as::<_, AdminGroup>("SELECT * FROM admin_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(group)
    }

    pub async fn create(pool: &PgPool, name: &str) -> Result<AdminGroup, DatabaseError> {
        let group = sqlx::query_as::<_, AdminGroup>(
            "INSERT INTO admin_groups (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(slugify(name))
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(group)
    }

    pub async fn update_by_id(
        pool: &PgPool,
        id: &str,
        name: &str,
    ) -> Result<Option<AdminGroup>, DatabaseError> {
        let group = sqlx::query_as::<_, AdminGroup>(
            "UPDATE admin_groups SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;
        Ok(group)
    }

    pub async fn delete_by_id(pool: &PgPool, id: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM admin_groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
