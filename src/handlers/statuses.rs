use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::params::{paged_response, require, ListParams, ValidJson};
use crate::handlers::{document_not_found, Message};
use crate::middleware::{ensure_admin_group, Credentials};
use crate::models::Status;

#[derive(Debug, Deserialize)]
pub struct CreateStatusPayload {
    pub pivot: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    pub name: String,
}

/// GET /api/v1/statuses
pub async fn list(Query(params): Query<ListParams>) -> Result<Json<Value>, ApiError> {
    let request = params.page_request(Status::SORTABLE)?;
    let pool = DatabaseManager::main_pool().await?;

    let results = Status::paged_find(&pool, &request).await?;
    paged_response(results, params.fields.as_deref())
}

/// GET /api/v1/statuses/:id
pub async fn read(Path(id): Path<String>) -> Result<Json<Status>, ApiError> {
    let pool = DatabaseManager::main_pool().await?;

    let status = Status::find_by_id(&pool, &id)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(status))
}

/// POST /api/v1/statuses - the id is "{pivot}-{name}" slugified
pub async fn create(
    ValidJson(payload): ValidJson<CreateStatusPayload>,
) -> Result<Json<Status>, ApiError> {
    require("pivot", &payload.pivot)?;
    require("name", &payload.name)?;
    let pool = DatabaseManager::main_pool().await?;

    let status = Status::create(&pool, &payload.pivot, &payload.name).await?;
    Ok(Json(status))
}

/// PUT /api/v1/statuses/:id
pub async fn update(
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateStatusPayload>,
) -> Result<Json<Status>, ApiError> {
    require("name", &payload.name)?;
    let pool = DatabaseManager::main_pool().await?;

    let status = Status::update_by_id(&pool, &id, &payload.name)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(status))
}

/// DELETE /api/v1/statuses/:id - root admin group only
pub async fn delete(
    Extension(credentials): Extension<Credentials>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    ensure_admin_group(&credentials, "root")?;
    let pool = DatabaseManager::main_pool().await?;

    if Status::delete_by_id(&pool, &id).await? == 0 {
        return Err(document_not_found());
    }
    Ok(Json(Message::success()))
}
