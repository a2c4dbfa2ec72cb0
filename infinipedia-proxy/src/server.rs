//! Proxy server lifecycle.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::ProxyState;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8787";

/// Errors that can occur when starting or running the proxy.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Serves the proxy on `addr` until `Ctrl-C`.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or serving fails.
pub async fn serve(addr: SocketAddr, state: ProxyState) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;
    let local = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(e.to_string()))?;

    info!(addr = %local, configured = state.provider().is_some(), "Proxy listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))
}
