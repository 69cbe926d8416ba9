//! HTTP server initialization and runtime setup.
//!
//! Handles storage connection, shortener wiring, and the Axum server
//! lifecycle including graceful shutdown.

use crate::application::services::Shortener;
use crate::config::Config;
use crate::infrastructure::persistence::connect_storage;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend selected by `DATABASE_URL` (with startup backoff)
/// - Apply migrations (PostgreSQL only)
/// - Shortener service
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the listener stops accepting connections and in-flight
/// requests get `SHUTDOWN_TIMEOUT` seconds to finish.
///
/// # Errors
///
/// Returns an error if:
/// - Storage connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = connect_storage(&config.database_url, &config.pool_settings(), true)
        .await
        .context("Failed to connect to storage")?;
    info!(backend = repository.backend_name(), "Storage ready");

    let shortener = Shortener::new(
        repository,
        config.base_url.clone(),
        config.code_length,
        config.max_generate_retries,
    )
    .with_storage_timeout(config.storage_timeout());

    let state = AppState::new(Arc::new(shortener));

    let app = app_router(state, Duration::from_secs(config.request_timeout));

    let listener = bind_listener(&config.listen_addr()).await?;
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Listening on http://{addr}");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let server = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received, draining connections");
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    let grace = Duration::from_secs(config.shutdown_timeout);
    let grace_elapsed = async move {
        if shutdown_rx.wait_for(|stopping| *stopping).await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result.context("Server error")?,
        _ = grace_elapsed => {
            warn!(grace_secs = grace.as_secs(), "Shutdown grace period elapsed, dropping in-flight requests");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Binds `host:port`, resolving `host` when it is a name like `localhost`.
async fn bind_listener(listen_addr: &str) -> Result<TcpListener> {
    TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {listen_addr}"))
}

/// Resolves when SIGINT (Ctrl+C) or, on Unix, SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}
