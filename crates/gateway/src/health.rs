//! The gateway's health checker (§4.2): a background task that evicts
//! nodes which have either stopped heartbeating or started failing direct
//! probes.

use crate::descriptor::Status;
use crate::state::{now_secs, GatewayState, DEFAULT_PROBE_TIMEOUT_SECS};
use std::sync::Arc;
use std::time::Duration;

/// Runs the health-check loop until the process exits. Intended to be
/// spawned once per gateway via `tokio::spawn`.
pub async fn run(state: Arc<GatewayState>, interval: Duration) {
    let probe_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS))
        .build()
        .expect("probe client configuration is static and known-valid");

    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        check_once(&state, &probe_client).await;
    }
}

/// One pass over the known descriptors. Exposed separately from [`run`] so
/// tests can drive a single tick deterministically instead of racing a
/// timer.
pub async fn check_once(state: &GatewayState, probe_client: &reqwest::Client) {
    // Snapshot first so the table lock is never held across a probe.
    for descriptor in state.snapshot_descriptors() {
        let age = now_secs() - descriptor.last_heartbeat;
        if age > state.heartbeat_timeout {
            if descriptor.status != Status::Dead {
                tracing::info!(node_id = %descriptor.node_id, age, "heartbeat timeout, evicting");
                state.mark_dead(&descriptor.node_id);
            }
            continue;
        }

        let url = format!("{}/health", descriptor.base_url());
        match probe_client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                if descriptor.status == Status::Dead {
                    tracing::info!(node_id = %descriptor.node_id, "probe recovered, marking active");
                }
                state.mark_active(&descriptor.node_id);
            }
            Ok(resp) => {
                tracing::warn!(node_id = %descriptor.node_id, status = %resp.status(), "probe failed, evicting");
                state.mark_dead(&descriptor.node_id);
            }
            Err(err) => {
                tracing::warn!(node_id = %descriptor.node_id, error = %err, "probe unreachable, evicting");
                state.mark_dead(&descriptor.node_id);
            }
        }
    }
}
