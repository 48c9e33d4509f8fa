use crate::{ServerConfig, SignalingService, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

/// Router exposing the signaling socket at `/ws`.
pub fn app(service: SignalingService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(service)
}

/// Binds and serves until the listener fails.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let service = SignalingService::new(config.ice_servers.clone());
    let addr = config.bind_addr();

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Signaling server listening on {}", addr);
    axum::serve(listener, app(service))
        .await
        .context("Signaling server stopped")
}
