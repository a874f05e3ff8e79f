/// Application state and router builder for the task service
///
/// # Routes
///
/// ```text
/// /
/// ├── GET    /           # Service banner (public)
/// ├── GET    /health     # Health check (public)
/// └── /tasks             # All routes below require a bearer token
///     ├── POST   /           # Create task (owner = caller)
///     ├── GET    /           # List caller's tasks
///     ├── GET    /:id        # Fetch one owned task
///     ├── PUT    /:id        # Update one owned task
///     └── DELETE /:id        # Delete one owned task
/// ```
///
/// The bearer middleware runs in front of every `/tasks` route; handlers
/// receive the verified caller identity as an `AuthContext` extension and
/// thread it into each store operation as an explicit argument.
use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskvault_shared::auth::middleware::require_bearer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state, cloned into each request handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the token verification secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the task service router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(middleware::from_fn(require_bearer(
            state.jwt_secret().to_string(),
        )));

    let cors = build_cors(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(routes::health::banner))
        .route("/health", get(routes::health::health_check))
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Permissive when origins contain "*", otherwise restricted to the
/// configured list
pub fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}
