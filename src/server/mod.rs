//! HTTP server for the local control plane.

mod handlers;
mod router;

pub use handlers::{ApiError, SetLockRequest};
pub use router::build_router;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::vault::UploadGateway;

/// Shared state handed to the router.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<UploadGateway>,
}

impl AppState {
    /// Create state over the given gateway.
    pub fn new(gateway: Arc<UploadGateway>) -> Self {
        Self { gateway }
    }

    /// The upload gateway (single mutating entry point to local storage).
    pub fn gateway(&self) -> &UploadGateway {
        &self.gateway
    }
}

/// Bind and serve until a shutdown signal arrives.
pub async fn serve(listen_addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", listen_addr))?;
    tracing::info!(%listen_addr, "control plane listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
