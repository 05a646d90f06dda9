//! Teslo API server binary.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use teslo_api::{build_router, ApiConfig, AppState};
use teslo_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,teslo_api=debug,sqlx=warn")),
        )
        .with_target(true)
        .init();

    info!("Starting Teslo API server...");

    let config = ApiConfig::load()?;
    info!(
        bind = %config.bind_address(),
        database = %config.database_path.display(),
        tax_rate_bps = config.tax_rate.bps(),
        environment = ?config.environment,
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(config.database_path.clone())).await?;
    info!("Database ready");

    let addr = config.bind_address();
    let state = Arc::new(AppState::new(db.clone(), config));
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
