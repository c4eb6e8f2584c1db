use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::params::{require, ValidJson};
use crate::models::{AuthAttempt, Session, User};

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: LoginUser,
    pub session: Session,
    /// Ready-to-use Authorization header value for subsequent requests
    pub auth_header: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub scope: Vec<&'static str>,
}

/// POST /api/v1/login - authenticate and open a session
///
/// Failed attempts are recorded per ip/username; once either count reaches
/// its configured maximum, further logins from that source are refused
/// before credentials are checked.
pub async fn login(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    ValidJson(payload): ValidJson<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    require("username", &payload.username)?;
    require("password", &payload.password)?;

    let ip = client_ip(&headers, addr);
    let pool = DatabaseManager::main_pool().await?;
    let thresholds = &config::config().auth_attempts;

    if AuthAttempt::abuse_detected(&pool, &ip, &payload.username, thresholds).await? {
        return Err(ApiError::bad_request(
            "Maximum number of auth attempts reached. Please try again later.",
        ));
    }

    let user = match User::find_by_credentials(&pool, &payload.username, &payload.password).await? {
        Some(user) => user,
        None => {
            AuthAttempt::create(&pool, &ip, &payload.username).await?;
            return Err(ApiError::bad_request(
                "Username and password combination not found or account is inactive.",
            ));
        }
    };

    let (session, key) = Session::create(&pool, user.id).await?;
    let auth_header = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", session.id, key))
    );

    Ok(Json(LoginResponse {
        user: LoginUser {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            scope: user.scopes(),
        },
        session,
        auth_header,
    }))
}

/// Prefer the first X-Forwarded-For hop; fall back to the socket address
fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn addr() -> SocketAddr {
        "10.0.0.1:54321".parse().unwrap()
    }

    #[test]
    fn socket_address_without_forwarding_header() {
        assert_eq!(client_ip(&HeaderMap::new(), addr()), "10.0.0.1");
    }

    #[test]
    fn forwarded_header_takes_the_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.2"),
        );
        assert_eq!(client_ip(&headers, addr()), "203.0.113.9");
    }

    #[test]
    fn empty_forwarded_header_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        assert_eq!(client_ip(&headers, addr()), "10.0.0.1");
    }
}
