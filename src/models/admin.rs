use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::{paged_find, DatabaseError, PageRequest, Paged};

/// An administrative identity. Group memberships partition admin-scoped
/// credentials further (e.g. only "root" members may delete).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub user_id: Option<Uuid>,
    pub groups: Vec<String>,
    pub time_created: DateTime<Utc>,
}

/// Split a free-text full name into first/middle/last the way the create
/// endpoint expects: first token, optional middle token, remainder as last.
pub fn split_name(name: &str) -> (String, String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest: Vec<&str> = parts.collect();

    let (middle, last) = match rest.len() {
        0 => (String::new(), String::new()),
        1 => (String::new(), rest[0].to_string()),
        _ => (rest[0].to_string(), rest[1..].join(" ")),
    };

    (first, middle, last)
}

impl Admin {
    pub const TABLE: &'static str = "admins";

    pub const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("timeCreated", "time_created"),
    ];

    pub fn is_member_of(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    pub async fn paged_find(
        pool: &PgPool,
        request: &PageRequest,
    ) -> Result<Paged<Admin>, DatabaseError> {
        paged_find(pool, Self::TABLE, request).await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Admin>, DatabaseError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(admin)
    }

    pub async fn create(pool: &PgPool, name: &str) -> Result<Admin, DatabaseError> {
        let (first, middle, last) = split_name(name);

        let admin = sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (id, first_name, middle_name, last_name, time_created) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(first)
        .bind(middle)
        .bind(last)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;
        Ok(admin)
    }

    pub async fn update_by_id(
        pool: &PgPool,
        id: Uuid,
        first_name: &str,
        middle_name: &str,
        last_name: &str,
    ) -> Result<Option<Admin>, DatabaseError> {
        let admin = sqlx::query_as::<_, Admin>(
            "UPDATE admins SET first_name = $2, middle_name = $3, last_name = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(first_name)
        .bind(middle_name)
        .bind(last_name)
        .fetch_optional(pool)
        .await?;
        Ok(admin)
    }

    /// Replace the admin's group memberships
    pub async fn set_groups(
        pool: &PgPool,
        id: Uuid,
        groups: &[String],
    ) -> Result<Option<Admin>, DatabaseError> {
        let admin = sqlx::query_as::<_, Admin>(
            "UPDATE admins SET groups = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(groups.to_vec())
        .fetch_optional(pool)
        .await?;
        Ok(admin)
    }

    pub async fn delete_by_id(pool: &PgPool, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
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
    fn split_full_name() {
        assert_eq!(
            split_name("Ren Quincy Höek"),
            ("Ren".into(), "Quincy".into(), "Höek".into())
        );
    }

    #[test]
    fn split_two_part_name_has_no_middle() {
        assert_eq!(split_name("Ren Höek"), ("Ren".into(), "".into(), "Höek".into()));
    }

    #[test]
    fn split_single_name() {
        assert_eq!(split_name("Ren"), ("Ren".into(), "".into(), "".into()));
    }

    #[test]
    fn split_long_name_joins_the_tail() {
        let (first, middle, last) = split_name("Anna Maria van der Berg");
        assert_eq!(first, "Anna");
        assert_eq!(middle, "Maria");
        assert_eq!(last, "van der Berg");
    }

    #[test]
    fn membership_check() {
        let admin = Admin {
            id: Uuid::new_v4(),
            first_name: "Ren".into(),
            middle_name: String::new(),
            last_name: "Höek".into(),
            user_id: None,
            groups: vec!["root".into(), "sales".into()],
            time_created: Utc::now(),
        };
        assert!(admin.is_member_of("root"));
        assert!(!admin.is_member_of("support"));
    }
}
