/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasktracker_api::{app::AppState, config::Config};
/// use tasktracker_shared::store::postgres::PgStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let store = PgStore::connect(&config.database.url, config.database.max_connections).await?;
/// let state = AppState::new(Arc::new(store), config);
/// let app = tasktracker_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tasktracker_shared::auth::{identity::Principal, jwt};
use tasktracker_shared::service::{
    projects::ProjectService, tasks::TaskService, users::UserService,
};
use tasktracker_shared::store::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Project operations
    pub projects: ProjectService,

    /// Task operations
    pub tasks: TaskService,

    /// User management operations
    pub users: UserService,
}

impl AppState {
    /// Creates new application state over the given store
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            projects: ProjectService::new(store.clone()),
            tasks: TaskService::new(store.clone()),
            users: UserService::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── /auth/                       # Authentication (public)
///     │   ├── POST /register
///     │   └── POST /login
///     ├── /admin/                      # Admin operations (authenticated)
///     │   └── POST /users
///     ├── /projects/                   # Project CRUD (authenticated)
///     │   ├── POST   /
///     │   ├── GET    /
///     │   └── GET|PUT|DELETE /:id
///     └── /tasks/                      # Task operations (authenticated)
///         ├── POST /
///         ├── GET  /                   # Own/filtered task listing
///         ├── GET  /all                # Full listing (ADMIN)
///         ├── GET  /project/:project_id
///         ├── GET|PUT|DELETE /:id
///         ├── PUT  /:id/assign
///         └── PUT  /:id/status
/// ```
///
/// All authorization decisions live in the service layer; the router only
/// distinguishes public from authenticated routes.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes: health check and credential exchange
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login));

    // Everything else requires a valid bearer token
    let protected_routes = Router::new()
        .route("/api/admin/users", post(routes::admin::create_user))
        .route(
            "/api/projects",
            post(routes::projects::create_project).get(routes::projects::list_projects),
        )
        .route(
            "/api/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/api/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route("/api/tasks/all", get(routes::tasks::list_all_tasks))
        .route(
            "/api/tasks/project/:project_id",
            get(routes::tasks::list_project_tasks),
        )
        .route(
            "/api/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/api/tasks/:id/assign", put(routes::tasks::assign_task))
        .route("/api/tasks/:id/status", put(routes::tasks::update_task_status))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

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
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects the authenticated `Principal` into request extensions. The
/// email claim is resolved to a user record lazily by the service layer.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut()
        .insert(Principal::authenticated(&claims.email));

    Ok(next.run(req).await)
}
