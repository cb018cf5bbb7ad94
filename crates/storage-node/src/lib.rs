//! The storage node (§4.3): owns a flat in-memory key-value map, registers
//! with exactly one gateway, publishes liveness by heartbeat, and serves
//! data operations routed to it by a client that already resolved
//! ownership through the gateway.

pub mod config;
pub mod error;
pub mod http;
pub mod registration;
pub mod state;
pub mod store;

pub use config::StorageNodeConfig;
pub use error::StorageError;
pub use state::StorageNodeState;

use std::sync::Arc;

/// Run a storage node to completion: spawn the registration/heartbeat
/// loop, then serve the HTTP surface until `admin_shutdown` fires.
pub async fn run(config: StorageNodeConfig) -> anyhow::Result<()> {
    tracing::info!(
        node_id = %config.node_id,
        port = config.listen_port,
        gateway = %config.gateway_address,
        "starting storage node"
    );

    let state = Arc::new(StorageNodeState::new(
        config.node_id.clone(),
        config.advertise_address.clone(),
        config.listen_port,
        config.gateway_address.clone(),
    ));

    tokio::spawn(registration::run(
        state.clone(),
        registration::DEFAULT_HEARTBEAT_INTERVAL,
        registration::DEFAULT_REGISTRATION_RETRY_INTERVAL,
    ));

    let app = http::router(state.clone());
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "storage node listening");

    let shutdown_state = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_state.shutdown_notify.notified().await;
        })
        .await?;
    Ok(())
}
