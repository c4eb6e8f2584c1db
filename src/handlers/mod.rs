pub mod accounts;
pub mod admin_groups;
pub mod admins;
pub mod auth_attempts;
pub mod facilities;
pub mod healthcheck;
pub mod login;
pub mod logout;
pub mod params;
pub mod sessions;
pub mod statuses;
pub mod users;

use serde::Serialize;

use crate::error::ApiError;

/// Body returned by destructive endpoints
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn success() -> Self {
        Message {
            message: "Success.".to_string(),
        }
    }
}

pub(crate) fn document_not_found() -> ApiError {
    ApiError::not_found("Document not found.")
}
