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
use crate::models::Account;

#[derive(Debug, Deserialize)]
pub struct CreateAccountPayload {
    /// Full name, split into first/last on create
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountPayload {
    pub name_first: String,
    pub name_last: String,
}

/// GET /api/v1/accounts
pub async fn list(Query(params): Query<ListParams>) -> Result<Json<Value>, ApiError> {
    let request = params.page_request(Account::SORTABLE)?;
    let pool = DatabaseManager::main_pool().await?;

    let results = Account::paged_find(&pool, &request).await?;
    paged_response(results, params.fields.as_deref())
}

/// GET /api/v1/accounts/:id
pub async fn read(Path(id): Path<Uuid>) -> Result<Json<Account>, ApiError> {
    let pool = DatabaseManager::main_pool().await?;

    let account = Account::find_by_id(&pool, id)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(account))
}

/// POST /api/v1/accounts
pub async fn create(
    ValidJson(payload): ValidJson<CreateAccountPayload>,
) -> Result<Json<Account>, ApiError> {
    require("name", &payload.name)?;
    let pool = DatabaseManager::main_pool().await?;

    let account = Account::create(&pool, &payload.name).await?;
    Ok(Json(account))
}

/// PUT /api/v1/accounts/:id
pub async fn update(
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateAccountPayload>,
) -> Result<Json<Account>, ApiError> {
    require("nameFirst", &payload.name_first)?;
    require("nameLast", &payload.name_last)?;
    let pool = DatabaseManager::main_pool().await?;

    let account = Account::update_by_id(&pool, id, &payload.name_first, &payload.name_last)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(account))
}

/// DELETE /api/v1/accounts/:id - root admin group only
pub async fn delete(
    Extension(credentials): Extension<Credentials>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    ensure_admin_group(&credentials, "root")?;
    let pool = DatabaseManager::main_pool().await?;

    if Account::delete_by_id(&pool, id).await? == 0 {
        return Err(document_not_found());
    }
    Ok(Json(Message::success()))
}
