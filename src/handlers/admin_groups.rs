use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::params::{paged_response, require, ListParams, ValidJson};
use crate::handlers::{document_not_found, Message};
use crate::middleware::{ensure_admin_group, Credentials};
use crate::models::AdminGroup;

#[derive(Debug, Deserialize)]
pub struct AdminGroupPayload {
    pub name: String,
}

/// GET /api/v1/admin-groups
pub async fn list(Query(params): Query<ListParams>) -> Result<Json<Value>, ApiError> {
    let request = params.page_request(AdminGroup::SORTABLE)?;
    let pool = DatabaseManager::main_pool().await?;

    let results = AdminGroup::paged_find(&pool, &request).await?;
    paged_response(results, params.fields.as_deref())
}

/// GET /api/v1/admin-groups/:id
pub async fn read(Path(id): Path<String>) -> Result<Json<AdminGroup>, ApiError> {
    let pool = DatabaseManager::main_pool().await?;

    let group = AdminGroup::find_by_id(&pool, &id)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(group))
}

/// POST /api/v1/admin-groups - the id is the slugified name
pub async fn create(
    ValidJson(payload): ValidJson<AdminGroupPayload>,
) -> Result<Json<AdminGroup>, ApiError> {
    require("name", &payload.name)?;
    let pool = DatabaseManager::main_pool().await?;

    let group = AdminGroup::create(&pool, &payload.name).await?;
    Ok(Json(group))
}

/// PUT /api/v1/admin-groups/:id
pub async fn update(
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<AdminGroupPayload>,
) -> Result<Json<AdminGroup>, ApiError> {
    require("name", &payload.name)?;
    let pool = DatabaseManager::main_pool().await?;

    let group = AdminGroup::update_by_id(&pool, &id, &payload.name)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(group))
}

/// DELETE /api/v1/admin-groups/:id - root admin group only
pub async fn delete(
    Extension(credentials): Extension<Credentials>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    ensure_admin_group(&credentials, "root")?;
    let pool = DatabaseManager::main_pool().await?;

    if AdminGroup::delete_by_id(&pool, &id).await? == 0 {
        return Err(document_not_found());
    }
    Ok(Json(Message::success()))
}
