use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::{paged_find, DatabaseError, PageRequest, Paged};

/// A physical site belonging to a customer. `global_id` is the external
/// identifier and is unique across all facilities (enforced by the storage
/// index; a violation surfaces as a conflict).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: Uuid,
    pub name: String,
    pub global_id: String,
    pub customer: String,
    pub is_active: bool,
    pub time_created: DateTime<Utc>,
}

impl Facility {
    pub const TABLE: &'static str = "facilities";

    /// Wire sort keys mapped to their backing columns
    pub const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("name", "name"),
        ("globalId", "global_id"),
        ("customer", "customer"),
        ("timeCreated", "time_created"),
    ];

    pub async fn paged_find(
        pool: &PgPool,
        request: &PageRequest,
    ) -> Result<Paged<Facility>, DatabaseError> {
        paged_find(pool, Self::TABLE, request).await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Facility>, DatabaseError> {
        let facility = sqlx::query_as::<_, Facility>("SELECT * FROM facilities WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(facility)
    }

    pub async fn create(
        pool: &PgPool,
        name: &str,
        global_id: &str,
        customer: &str,
    ) -> Result<Facility, DatabaseError> {
        let facility = sqlx::query_as::<_, Facility>(
            "INSERT INTO facilities (id, name, global_id, customer, is_active, time_created) \
             VALUES ($1, $2, $3, $4, TRUE, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(global_id)
        .bind(customer)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;
        Ok(facility)
    }

    pub async fn update_by_id(
        pool: &PgPool,
        id: Uuid,
        name: &str,
        global_id: &str,
        customer: &str,
    ) -> Result<Option<Facility>, DatabaseError> {
        let facility = sqlx::query_as::<_, Facility>(
            "UPDATE facilities SET name = $2, global_id = $3, customer = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(global_id)
        .bind(customer)
        .fetch_optional(pool)
        .await?;
        Ok(facility)
    }

    pub async fn delete_by_id(pool: &PgPool, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM facilities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
