use std::net::SocketAddr;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod models;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Beacon API in {:?} mode", config.environment);

    // Capture the start timestamp and version/build side files up front
    handlers::healthcheck::init();

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Beacon API server listening on http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}

fn app() -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .merge(healthcheck_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// The authenticated API surface. Resource routers sit behind the admin
/// scope gate; logout only needs an authenticated credential; login is
/// public (it is how credentials are obtained).
fn api_routes() -> Router {
    let admin_scoped = Router::new()
        .merge(account_routes())
        .merge(admin_group_routes())
        .merge(admin_routes())
        .merge(auth_attempt_routes())
        .merge(facility_routes())
        .merge(session_routes())
        .merge(status_routes())
        .merge(user_routes())
        .layer(axum::middleware::from_fn(middleware::require_admin_scope));

    Router::new()
        .merge(admin_scoped)
        .route("/logout", delete(handlers::logout::logout))
        .layer(axum::middleware::from_fn(middleware::session_auth_middleware))
        .route("/login", post(handlers::login::login))
}

fn facility_routes() -> Router {
    use handlers::facilities;

    Router::new()
        .route("/facilities", get(facilities::list).post(facilities::create))
        .route(
            "/facilities/:id",
            get(facilities::read)
                .put(facilities::update)
                .delete(facilities::delete),
        )
}

fn account_routes() -> Router {
    use handlers::accounts;

    Router::new()
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/accounts/:id",
            get(accounts::read)
                .put(accounts::update)
                .delete(accounts::delete),
        )
}

fn admin_routes() -> Router {
    use handlers::admins;

    Router::new()
        .route("/admins", get(admins::list).post(admins::create))
        .route(
            "/admins/:id",
            get(admins::read).put(admins::update).delete(admins::delete),
        )
        .route("/admins/:id/groups", put(admins::update_groups))
}

fn admin_group_routes() -> Router {
    use handlers::admin_groups;

    Router::new()
        .route(
            "/admin-groups",
            get(admin_groups::list).post(admin_groups::create),
        )
        .route(
            "/admin-groups/:id",
            get(admin_groups::read)
                .put(admin_groups::update)
                .delete(admin_groups::delete),
        )
}

fn auth_attempt_routes() -> Router {
    use handlers::auth_attempts;

    Router::new()
        .route("/auth-attempts", get(auth_attempts::list))
        .route(
            "/auth-attempts/:id",
            get(auth_attempts::read).delete(auth_attempts::delete),
        )
}

fn session_routes() -> Router {
    use handlers::sessions;

    Router::new()
        .route("/sessions", get(sessions::list))
        .route(
            "/sessions/:id",
            get(sessions::read).delete(sessions::delete),
        )
}

fn status_routes() -> Router {
    use handlers::statuses;

    Router::new()
        .route("/statuses", get(statuses::list).post(statuses::create))
        .route(
            "/statuses/:id",
            get(statuses::read)
                .put(statuses::update)
                .delete(statuses::delete),
        )
}

fn user_routes() -> Router {
    use handlers::users;

    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:id",
            get(users::read).put(users::update).delete(users::delete),
        )
}

/// Public health endpoints, outside the /api/v1 prefix
fn healthcheck_routes() -> Router {
    use handlers::healthcheck;

    Router::new()
        .route("/status/healthcheck", get(healthcheck::report))
        .route("/status/healthcheck/ping", get(healthcheck::ping))
}
