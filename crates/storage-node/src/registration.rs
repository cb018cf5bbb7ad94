//! Registration + heartbeat loop.
//!
//! Runs until `state.running` is cleared. Each iteration either attempts
//! (re-)registration — when the previous heartbeat or registration
//! attempt failed — or sends a heartbeat on the steady tick. Background
//! loops never propagate errors; every failure here is logged and either
//! retried on the next tick or turns into a deregistration for the next
//! iteration to repair.

use crate::state::StorageNodeState;
use crate::store::Store;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// Default heartbeat tick.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);
/// Default retry period while unregistered.
pub const DEFAULT_REGISTRATION_RETRY_INTERVAL: Duration = Duration::from_secs(5);
/// Registration HTTP timeout.
pub const REGISTRATION_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn run(
    state: Arc<StorageNodeState>,
    heartbeat_interval: Duration,
    registration_retry_interval: Duration,
) {
    let client = reqwest::Client::builder()
        .timeout(REGISTRATION_TIMEOUT)
        .build()
        .expect("reqwest client configuration is static and known-valid");
    let url = format!("{}/heartbeat", state.gateway_address);

    while state.is_running() {
        if !state.is_registered() {
            match register(&client, &url, &state).await {
                Ok(()) => {
                    tracing::info!(node_id = %state.node_id, "registered with gateway");
                    state.registered.store(true, Ordering::SeqCst);
                }
                Err(err) => {
                    tracing::warn!(node_id = %state.node_id, error = %err, "registration failed, retrying");
                    tokio::time::sleep(registration_retry_interval).await;
                    continue;
                }
            }
        }

        match heartbeat(&client, &url, &state).await {
            Ok(()) => {
                tracing::debug!(node_id = %state.node_id, "heartbeat sent");
            }
            Err(err) => {
                tracing::warn!(node_id = %state.node_id, error = %err, "heartbeat failed, will re-register");
                state.registered.store(false, Ordering::SeqCst);
            }
        }

        tokio::time::sleep(heartbeat_interval).await;
    }
}

async fn register(client: &reqwest::Client, url: &str, state: &StorageNodeState) -> Result<(), reqwest::Error> {
    let resp = client
        .post(url)
        .json(&json!({
            "node_id": state.node_id,
            "address": state.address,
            "port": state.port,
        }))
        .send()
        .await?;
    resp.error_for_status().map(|_| ())
}

async fn heartbeat(client: &reqwest::Client, url: &str, state: &StorageNodeState) -> Result<(), reqwest::Error> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is after the epoch")
        .as_secs_f64();
    let resp = client
        .post(url)
        .json(&json!({
            "node_id": state.node_id,
            "address": state.address,
            "port": state.port,
            "timestamp": timestamp,
            "key_count": state.store.size(),
        }))
        .send()
        .await?;
    resp.error_for_status().map(|_| ())
}
