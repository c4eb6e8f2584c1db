use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::params::{paged_response, require, ListParams, ValidJson};
use crate::handlers::{document_not_found, Message};
use crate::middleware::{ensure_admin_group, Credentials};
use crate::models::Admin;

#[derive(Debug, Deserialize)]
pub struct CreateAdminPayload {
    /// Full name, split into first/middle/last on create
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminPayload {
    pub name_first: String,
    #[serde(default)]
    pub name_middle: String,
    pub name_last: String,
}

#[derive(Debug, Deserialize)]
pub struct GroupsPayload {
    pub groups: Vec<String>,
}

/// GET /api/v1/admins
pub async fn list(Query(params): Query<ListParams>) -> Result<Json<Value>, ApiError> {
    let request = params.page_request(Admin::SORTABLE)?;
    let pool = DatabaseManager::main_pool().await?;

    let results = Admin::paged_find(&pool, &request).await?;
    paged_response(results, params.fields.as_deref())
}

/// GET /api/v1/admins/:id
pub async fn read(Path(id): Path<Uuid>) -> Result<Json<Admin>, ApiError> {
    let pool = DatabaseManager::main_pool().await?;

    let admin = Admin::find_by_id(&pool, id)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(admin))
}

/// POST /api/v1/admins
pub async fn create(
    ValidJson(payload): ValidJson<CreateAdminPayload>,
) -> Result<Json<Admin>, ApiError> {
    require("name", &payload.name)?;
    let pool = DatabaseManager::main_pool().await?;

    let admin = Admin::create(&pool, &payload.name).await?;
    Ok(Json(admin))
}

/// PUT /api/v1/admins/:id
pub async fn update(
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateAdminPayload>,
) -> Result<Json<Admin>, ApiError> {
    require("nameFirst", &payload.name_first)?;
    require("nameLast", &payload.name_last)?;
    let pool = DatabaseManager::main_pool().await?;

    let admin = Admin::update_by_id(
        &pool,
        id,
        &payload.name_first,
        &payload.name_middle,
        &payload.name_last,
    )
    .await?
    .ok_or_else(document_not_found)?;
    Ok(Json(admin))
}

/// PUT /api/v1/admins/:id/groups - root admin group only
pub async fn update_groups(
    Extension(credentials): Extension<Credentials>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<GroupsPayload>,
) -> Result<Json<Admin>, ApiError> {
    ensure_admin_group(&credentials, "root")?;
    let pool = DatabaseManager::main_pool().await?;

    let admin = Admin::set_groups(&pool, id, &payload.groups)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(admin))
}

/// DELETE /api/v1/admins/:id - root admin group only
pub async fn delete(
    Extension(credentials): Extension<Credentials>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    ensure_admin_group(&credentials, "root")?;
    let pool = DatabaseManager::main_pool().await?;

    if Admin::delete_by_id(&pool, id).await? == 0 {
        return Err(document_not_found());
    }
    Ok(Json(Message::success()))
}
