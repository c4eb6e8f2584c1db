use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde_json::Value;
use uuid::Uuid;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::params::{paged_response, ListParams};
use crate::handlers::{document_not_found, Message};
use crate::middleware::{ensure_admin_group, Credentials};
use crate::models::Session;

// Sessions are created by the login flow and only listed, read, and revoked
// through this resource.

/// GET /api/v1/sessions
pub async fn list(Query(params): Query<ListParams>) -> Result<Json<Value>, ApiError> {
    let request = params.page_request(Session::SORTABLE)?;
    let pool = DatabaseManager::main_pool().await?;

    let results = Session::paged_find(&pool, &request).await?;
    paged_response(results, params.fields.as_deref())
}

/// GET /api/v1/sessions/:id
pub async fn read(Path(id): Path<Uuid>) -> Result<Json<Session>, ApiError> {
    let pool = DatabaseManager::main_pool().await?;

    let session = Session::find_by_id(&pool, id)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(session))
}

/// DELETE /api/v1/sessions/:id - root admin group only
pub async fn delete(
    Extension(credentials): Extension<Credentials>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    ensure_admin_group(&credentials, "root")?;
    let pool = DatabaseManager::main_pool().await?;

    if Session::delete_by_id(&pool, id).await? == 0 {
        return Err(document_not_found());
    }
    Ok(Json(Message::success()))
}
