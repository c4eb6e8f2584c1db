use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;

/// A validated page request: `column` has already been checked against the
/// model's sortable-column vocabulary, so it is safe to interpolate.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub column: &'static str,
    pub descending: bool,
    pub limit: i64,
    pub page: i64,
}

/// A page of documents plus pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub data: Vec<T>,
    pub pages: Pages,
    pub items: Items,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pages {
    pub current: i64,
    pub prev: i64,
    pub has_prev: bool,
    pub next: i64,
    pub has_next: bool,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Items {
    pub limit: i64,
    pub begin: i64,
    pub end: i64,
    pub total: i64,
}

impl<T> Paged<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

        let mut begin = (page * limit) - limit + 1;
        let mut end = page * limit;
        if begin > total {
            begin = total;
        }
        if end > total {
            end = total;
        }

        let prev = page - 1;
        let next = page + 1;

        Self {
            data,
            pages: Pages {
                current: page,
                prev,
                has_prev: prev != 0,
                next,
                has_next: next <= total_pages,
                total: total_pages,
            },
            items: Items {
                limit,
                begin,
                end,
                total,
            },
        }
    }
}

/// Fetch one page of rows from `table` plus the matching total count.
pub async fn paged_find<T>(
    pool: &PgPool,
    table: &str,
    request: &PageRequest,
) -> Result<Paged<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let direction = if request.descending { "DESC" } else { "ASC" };
    let sql = format!(
        "SELECT * FROM \"{}\" ORDER BY \"{}\" {} LIMIT $1 OFFSET $2",
        table, request.column, direction
    );
    let offset = (request.page - 1) * request.limit;

    let data = sqlx::query_as::<_, T>(&sql)
        .bind(request.limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) AS count FROM \"{}\"", table);
    let row = sqlx::query(&count_sql).fetch_one(pool).await?;
    let total: i64 = row.try_get("count")?;

    Ok(Paged::new(data, request.page, request.limit, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paged(page: i64, limit: i64, total: i64) -> Paged<()> {
        Paged::new(vec![], page, limit, total)
    }

    #[test]
    fn first_page_of_many() {
        let p = paged(1, 20, 55);
        assert_eq!(p.pages.total, 3);
        assert!(!p.pages.has_prev);
        assert!(p.pages.has_next);
        assert_eq!(p.pages.next, 2);
        assert_eq!(p.items.begin, 1);
        assert_eq!(p.items.end, 20);
        assert_eq!(p.items.total, 55);
    }

    #[test]
    fn middle_page() {
        let p = paged(2, 20, 55);
        assert!(p.pages.has_prev);
        assert!(p.pages.has_next);
        assert_eq!(p.items.begin, 21);
        assert_eq!(p.items.end, 40);
    }

    #[test]
    fn last_partial_page_clamps_end() {
        let p = paged(3, 20, 55);
        assert!(p.pages.has_prev);
        assert!(!p.pages.has_next);
        assert_eq!(p.items.begin, 41);
        assert_eq!(p.items.end, 55);
    }

    #[test]
    fn empty_result_set() {
        let p = paged(1, 20, 0);
        assert_eq!(p.pages.total, 0);
        assert!(!p.pages.has_prev);
        assert!(!p.pages.has_next);
        assert_eq!(p.items.begin, 0);
        assert_eq!(p.items.end, 0);
    }

    #[test]
    fn page_beyond_the_data_clamps_begin() {
        let p = paged(5, 20, 55);
        assert_eq!(p.items.begin, 55);
        assert_eq!(p.items.end, 55);
        assert!(!p.pages.has_next);
    }

    #[test]
    fn totals_are_consistent() {
        for (page, limit, total) in [(1, 10, 10), (1, 10, 11), (2, 7, 13), (1, 1, 1)] {
            let p = paged(page, limit, total);
            assert_eq!(p.pages.total, (total + limit - 1) / limit);
        }
    }
}
