use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde_json::Value;
use uuid::Uuid;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::params::{paged_response, ListParams};
use crate::handlers::{document_not_found, Message};
use crate::middleware::{ensure_admin_group, Credentials};
use crate::models::AuthAttempt;

// Auth attempts are written by the login flow; the API surface is read-only
// apart from deletion (clearing an abuse lockout).

/// GET /api/v1/auth-attempts
pub async fn list(Query(params): Query<ListParams>) -> Result<Json<Value>, ApiError> {
    let request = params.page_request(AuthAttempt::SORTABLE)?;
    let pool = DatabaseManager::main_pool().await?;

    let results = AuthAttempt::paged_find(&pool, &request).await?;
    paged_response(results, params.fields.as_deref())
}

/// GET /api/v1/auth-attempts/:id
pub async fn read(Path(id): Path<Uuid>) -> Result<Json<AuthAttempt>, ApiError> {
    let pool = DatabaseManager::main_pool().await?;

    let attempt = AuthAttempt::find_by_id(&pool, id)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(attempt))
}

/// DELETE /api/v1/auth-attempts/:id - root admin group only
pub async fn delete(
    Extension(credentials): Extension<Credentials>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    ensure_admin_group(&credentials, "root")?;
    let pool = DatabaseManager::main_pool().await?;

    if AuthAttempt::delete_by_id(&pool, id).await? == 0 {
        return Err(document_not_found());
    }
    Ok(Json(Message::success()))
}
