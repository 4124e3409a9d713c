//! Server lifecycle
//!
//! Startup opens the shared pool before the listener accepts traffic.
//! Shutdown stops accepting, drains in-flight requests, then closes the pool.

use std::sync::Arc;

use anyhow::Context;
use envio_service::MySqlRepository;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::router::{build_router, AppState};

/// Run the HTTP server until Ctrl+C or SIGTERM.
pub async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let pool = db::init_pool(&config.db)
        .await
        .context("failed to open database pool")?;

    let state = AppState::new(Arc::new(MySqlRepository::new(pool.clone())));
    let app = build_router(state);

    let listener = TcpListener::bind(config.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http_addr))?;
    tracing::info!("HTTP server listening on {}", config.http_addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db::close_pool().await;
    served.context("HTTP server failed")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
