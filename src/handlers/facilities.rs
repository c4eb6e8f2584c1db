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
use crate::models::Facility;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityPayload {
    pub name: String,
    pub global_id: String,
    pub customer: String,
}

impl FacilityPayload {
    fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        require("globalId", &self.global_id)?;
        require("customer", &self.customer)
    }
}

/// GET /api/v1/facilities - paged facility listing
pub async fn list(Query(params): Query<ListParams>) -> Result<Json<Value>, ApiError> {
    let request = params.page_request(Facility::SORTABLE)?;
    let pool = DatabaseManager::main_pool().await?;

    let results = Facility::paged_find(&pool, &request).await?;
    paged_response(results, params.fields.as_deref())
}

/// GET /api/v1/facilities/:id
pub async fn read(Path(id): Path<Uuid>) -> Result<Json<Facility>, ApiError> {
    let pool = DatabaseManager::main_pool().await?;

    let facility = Facility::find_by_id(&pool, id)
        .await?
        .ok_or_else(document_not_found)?;
    Ok(Json(facility))
}

/// POST /api/v1/facilities
///
/// `globalId` uniqueness is enforced by the storage index; a duplicate
/// surfaces as a 409 rather than being pre-checked here.
pub async fn create(
    ValidJson(payload): ValidJson<FacilityPayload>,
) -> Result<Json<Facility>, ApiError> {
    payload.validate()?;
    let pool = DatabaseManager::main_pool().await?;

    let facility =
        Facility::create(&pool, &payload.name, &payload.global_id, &payload.customer).await?;
    Ok(Json(facility))
}

/// PUT /api/v1/facilities/:id
pub async fn update(
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<FacilityPayload>,
) -> Result<Json<Facility>, ApiError> {
    payload.validate()?;
    let pool = DatabaseManager::main_pool().await?;

    let facility =
        Facility::update_by_id(&pool, id, &payload.name, &payload.global_id, &payload.customer)
            .await?
            .ok_or_else(document_not_found)?;
    Ok(Json(facility))
}

/// DELETE /api/v1/facilities/:id - root admin group only
pub async fn delete(
    Extension(credentials): Extension<Credentials>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError> {
    ensure_admin_group(&credentials, "root")?;
    let pool = DatabaseManager::main_pool().await?;

    if Facility::delete_by_id(&pool, id).await? == 0 {
        return Err(document_not_found());
    }
    Ok(Json(Message::success()))
}
