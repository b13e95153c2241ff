//! HTTP server initialization and runtime setup.
//!
//! Handles the database connection, cache and sweeper startup, and the Axum server
//! lifecycle including graceful shutdown.

use crate::config::Config;
use crate::infrastructure::cache::LinkCache;
use crate::infrastructure::persistence;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool, with migrations applied
/// - Link cache and its background sweeper
/// - Axum HTTP server
///
/// Returns once a shutdown signal has been received, in-flight requests have
/// drained and the sweeper has stopped.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = persistence::connect(&config.database_url, config.db_max_connections).await?;
    info!("Connected to database");

    let (cache, sweeper) = LinkCache::start(config.evict_interval, config.cache_ttl);
    info!(
        "Cache started: eviction every {:?}, TTL {:?}",
        config.evict_interval, config.cache_ttl
    );

    let state = AppState::new(Arc::new(pool.clone()), cache, config.base_url());

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::warn!("PunyURL now running on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.shutdown().await;

    pool.close().await;
    info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
