pub mod auth;

pub use auth::{ensure_admin_group, require_admin_scope, session_auth_middleware, Credentials};
