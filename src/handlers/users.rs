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
use crate::models::User;

#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub is_active: bool,
    pub username: String,
    pub email: String,
}

/// GET /api/v1/users
pub async fn list(Query(params): Query<ListParams>) -> Result<Json<Value>, ApiError> {
    let request = params.page_request(User::SORTABLE)?;
    let pool = DatabaseManager::main_pool().await?;

    let results = User::paged_find(&pool, &request).await?;
    paged_response(results, params.fields.as_deref())
}

/// GET /api/v1/users/:id
pub async fn read(Path(id): Path<Uuid>) -> Result<Json<User>, ApiError> {
    let pool = DatabaseManager::main_pool().await?;

    let user = User::find_by_id(&pool, id)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(user))
}

/// POST /api/v1/users
///
/// Username/email uniqueness is enforced by the storage indexes; a duplicate
/// surfaces as a 409.
pub async fn create(ValidJson(payload): ValidJson<CreateUserPayload>) -> Result<Json<User>, ApiError> {
    require("username", &payload.username)?;
    require("password", &payload.password)?;
    require("email", &payload.email)?;
    let pool = DatabaseManager::main_pool().await?;

    let user = User::create(&pool, &payload.username, &payload.password, &payload.email).await?;
    Ok(Json(user))
}

/// PUT /api/v1/users/:id
pub async fn update(
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateUserPayload>,
) -> Result<Json<User>, ApiError> {
    require("username", &payload.username)?;
    require("email", &payload.email)?;
    let pool = DatabaseManager::main_pool().await?;

    let user = User::update_by_id(&pool, id, payload.is_active, &payload.username, &payload.email)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(user))
}

/// DELETE /api/v1/users/:id - root admin group only
pub async fn delete(
    Extension(credentials): Extension<Credentials>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    ensure_admin_group(&credentials, "root")?;
    let pool = DatabaseManager::main_pool().await?;

    if User::delete_by_id(&pool, id).await? == 0 {
        return Err(document_not_found());
    }
    Ok(Json(Message::success()))
}
