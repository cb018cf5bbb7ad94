//! The routing gateway (§4.2): the authoritative view of ring membership
//! for clients and peers. A gateway never stores user data.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod health;
pub mod http;
pub mod state;

pub use config::GatewayConfig;
pub use descriptor::{NodeDescriptor, Status};
pub use error::GatewayError;
pub use state::GatewayState;

use state::{DEFAULT_HEALTH_CHECK_INTERVAL_SECS, DEFAULT_HEARTBEAT_TIMEOUT_SECS, DEFAULT_VNODES};
use std::sync::Arc;
use std::time::Duration;

/// Run a gateway to completion: spawn the health checker, then serve the
/// HTTP surface until the process is killed.
pub async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    tracing::info!(
        gateway_id = %config.gateway_id,
        port = config.listen_port,
        peers = ?config.peers,
        "starting gateway"
    );

    let state = Arc::new(GatewayState::new(
        config.gateway_id.clone(),
        config.peers.clone(),
        DEFAULT_VNODES,
        DEFAULT_HEARTBEAT_TIMEOUT_SECS,
    ));

    tokio::spawn(health::run(state.clone(), Duration::from_secs(DEFAULT_HEALTH_CHECK_INTERVAL_SECS)));

    let app = http::router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
