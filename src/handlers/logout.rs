use axum::{Extension, Json};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::{document_not_found, Message};
use crate::middleware::Credentials;
use crate::models::Session;

/// DELETE /api/v1/logout - destroy the caller's session
///
/// Deletes by the credential's session id, falling back to a delete by user
/// id when that removes nothing (a stale or already-revoked session).
pub async fn logout(
    Extension(credentials): Extension<Credentials>,
) -> Result<Json<Message>, ApiError> {
    let pool = DatabaseManager::main_pool().await?;

    let mut removed = Session::delete_by_id(&pool, credentials.session.id).await?;
    if removed == 0 {
        removed = Session::delete_by_user_id(&pool, credentials.user.id).await?;
    }

    if removed == 0 {
        return Err(document_not_found());
    }
    Ok(Json(Message::success()))
}
