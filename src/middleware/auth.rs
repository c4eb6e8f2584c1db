use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::Engine;
use uuid::Uuid;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::models::{Admin, Session, User};

/// Authenticated request context built by `session_auth_middleware` and read
/// by handlers via `Extension<Credentials>`.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub session: Session,
    pub user: User,
    /// Hydrated admin document, present when the user carries the admin role
    pub admin: Option<Admin>,
    pub scope: Vec<&'static str>,
}

impl Credentials {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.iter().any(|s| *s == scope)
    }
}

/// Basic-auth session middleware. The username half of the credential is the
/// session id, the password half the session key; both are checked against
/// the sessions table and the owning user must still be active.
pub async fn session_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (session_id, key) = parse_basic_credentials(&headers)?;

    let pool = DatabaseManager::main_pool().await?;

    let session = Session::find_by_credentials(&pool, session_id, &key)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials."))?;

    let user = User::find_by_id(&pool, session.user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials."))?;

    let admin = match user.admin_id {
        Some(admin_id) => Admin::find_by_id(&pool, admin_id).await?,
        None => None,
    };

    let scope = user.scopes();
    request.extensions_mut().insert(Credentials {
        session,
        user,
        admin,
        scope,
    });

    Ok(next.run(request).await)
}

/// Scope gate layered over the resource routers; runs after
/// `session_auth_middleware` has attached the credentials.
pub async fn require_admin_scope(request: Request, next: Next) -> Result<Response, ApiError> {
    let credentials = request
        .extensions()
        .get::<Credentials>()
        .ok_or_else(|| ApiError::unauthorized("Missing authentication."))?;

    if !credentials.has_scope("admin") {
        return Err(ApiError::forbidden("Insufficient scope."));
    }

    Ok(next.run(request).await)
}

/// Precondition for destructive routes: the credential's admin must belong
/// to the named group.
pub fn ensure_admin_group(credentials: &Credentials, group: &str) -> Result<(), ApiError> {
    match &credentials.admin {
        Some(admin) if admin.is_member_of(group) => Ok(()),
        _ => Err(ApiError::forbidden("Permission denied to this resource.")),
    }
}

/// Extract `(session_id, key)` from a `Basic` authorization header
fn parse_basic_credentials(headers: &HeaderMap) -> Result<(Uuid, String), ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication."))?
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid authorization header."))?;

    let encoded = auth_header
        .strip_prefix("Basic ")
        .ok_or_else(|| ApiError::unauthorized("Invalid authorization header."))?;

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| ApiError::unauthorized("Invalid authorization header."))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| ApiError::unauthorized("Invalid authorization header."))?;

    let (id, key) = decoded
        .split_once(':')
        .ok_or_else(|| ApiError::unauthorized("Invalid authorization header."))?;

    if key.is_empty() {
        return Err(ApiError::unauthorized("Invalid authorization header."));
    }

    let session_id = Uuid::parse_str(id)
        .map_err(|_| ApiError::unauthorized("Invalid credentials."))?;

    Ok((session_id, key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn encode(raw: &str) -> String {
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }

    #[test]
    fn parses_well_formed_credentials() {
        let id = Uuid::new_v4();
        let headers = headers_with(&encode(&format!("{}:secret-key", id)));

        let (session_id, key) = parse_basic_credentials(&headers).unwrap();
        assert_eq!(session_id, id);
        assert_eq!(key, "secret-key");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = parse_basic_credentials(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn rejects_non_basic_schemes() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(parse_basic_credentials(&headers).unwrap_err().status_code(), 401);
    }

    #[test]
    fn rejects_bad_base64() {
        let headers = headers_with("Basic %%%%");
        assert!(parse_basic_credentials(&headers).is_err());
    }

    #[test]
    fn rejects_missing_key() {
        let id = Uuid::new_v4();
        let headers = headers_with(&encode(&format!("{}:", id)));
        assert!(parse_basic_credentials(&headers).is_err());
    }

    #[test]
    fn rejects_non_uuid_session_id() {
        let headers = headers_with(&encode("not-a-uuid:key"));
        assert!(parse_basic_credentials(&headers).is_err());
    }
}
