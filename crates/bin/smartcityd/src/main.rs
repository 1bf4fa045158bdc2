//! # smartcityd — smart-city inventory daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`smartcity.toml` plus environment overrides)
//! - Initialize `tracing` with the configured filter
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations and inject them into the services
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT) and close the pool
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all adapter crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use smartcity_adapter_http_axum::router;
use smartcity_adapter_http_axum::state::AppState;
use smartcity_adapter_storage_sqlite_sqlx::{
    SqliteDeviceRepository, SqliteReadingRepository, SqliteSensorRepository,
    SqliteUserRepository, SqliteZoneRepository,
};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter `{}`", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Database
    let db = smartcity_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to open database")?;
    let pool = db.pool().clone();

    // Repositories → services → HTTP
    let state = AppState::new(
        SqliteUserRepository::new(pool.clone()),
        SqliteZoneRepository::new(pool.clone()),
        SqliteSensorRepository::new(pool.clone()),
        SqliteDeviceRepository::new(pool.clone()),
        SqliteReadingRepository::new(pool),
    );
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "smartcityd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Resolve once SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}
