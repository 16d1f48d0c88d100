//! # TaskTracker API Server
//!
//! Role-based project and task tracker. Provides JWT-authenticated REST
//! endpoints for project CRUD, task lifecycle management, and user
//! administration, with all authorization enforced in the service layer.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tasktracker-api
//! ```

use std::sync::Arc;

use tasktracker_api::{app, config::Config};
use tasktracker_shared::store::postgres::PgStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasktracker_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskTracker API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let store = PgStore::connect(&config.database.url, config.database.max_connections).await?;
    store.run_migrations().await?;
    tracing::info!("Database schema is up to date");

    let bind_address = config.bind_address();
    let state = app::AppState::new(Arc::new(store), config);
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, exiting...");
    Ok(())
}

async fn shutdown_signal() {
    // Ignore the error from a missing signal handler; the server then only
    // stops when the process is killed
    let _ = tokio::signal::ctrl_c().await;
}
