// Entry point of the Keramas magazine backend.
//
// **Architecture Overview:**
// - `core/` = Business logic (storage-agnostic)
// - `infra/` = Implementations of core traits (SQLite, disk)
// - `web/` = HTTP adapters (routes, handlers, error mapping)
//
// This file's job is to:
// 1. Load configuration
// 2. Open and migrate the database
// 3. Initialize services (dependency injection)
// 4. Serve HTTP until a shutdown signal arrives

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "web/web_layer.rs"]
mod web;

mod config;

use crate::config::Config;
use crate::infra::database;
use crate::web::AppState;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load().expect("Invalid configuration");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let pool = database::connect(&config.database_url)
        .await
        .expect("Failed to open database");
    database::migrate(&pool)
        .await
        .expect("Failed to migrate database");

    let state = AppState::new(pool.clone(), &config.upload_dir);
    let app = web::routes::router(state, &config.upload_dir, config.static_dir.as_deref());

    // ========================================================================
    // SERVE
    // ========================================================================

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        %address,
        database = %config.database_url,
        uploads = %config.upload_dir.display(),
        "Keramas backend listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
