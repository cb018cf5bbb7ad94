//! Integration tests for the gateway's health checker (§4.2, §8 scenario 3
//! "node failure eviction"): a node is evicted from the ring on heartbeat
//! timeout, and separately on a failed direct probe, even while its
//! heartbeat is still fresh.

use corelib::node::NodeId;
use gateway::health;
use gateway::{GatewayState, Status};
use std::sync::Arc;
use std::time::Duration;

fn make_state() -> Arc<GatewayState> {
    Arc::new(GatewayState::new("gw-1".to_string(), vec![], 10, 30.0))
}

fn probe_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .unwrap()
}

#[tokio::test]
async fn stale_heartbeat_is_evicted_from_the_ring() {
    let state = make_state();
    state.record_direct_heartbeat(NodeId::from("kvstore-A"), "127.0.0.1".to_string(), 9000);
    assert_eq!(state.ring.node_count(), 1);

    // Backdate last_heartbeat past the 30s timeout without a live probe
    // target — the node should be evicted purely on staleness.
    {
        let mut nodes = state.nodes.lock();
        let descriptor = nodes.get_mut(&NodeId::from("kvstore-A")).unwrap();
        descriptor.last_heartbeat = gateway::state::now_secs() - 60.0;
    }

    health::check_once(&state, &probe_client()).await;

    assert_eq!(state.ring.node_count(), 0, "stale node should be removed from the ring");
    let descriptor = state.get_node(&NodeId::from("kvstore-A")).unwrap();
    assert_eq!(descriptor.status, Status::Dead);
}

#[tokio::test]
async fn fresh_heartbeat_but_failed_probe_is_evicted() {
    let state = make_state();
    // Port 1 on loopback refuses connections immediately.
    state.record_direct_heartbeat(NodeId::from("kvstore-B"), "127.0.0.1".to_string(), 1);
    assert_eq!(state.ring.node_count(), 1);

    health::check_once(&state, &probe_client()).await;

    assert_eq!(state.ring.node_count(), 0, "node failing its direct probe should be evicted");
    let descriptor = state.get_node(&NodeId::from("kvstore-B")).unwrap();
    assert_eq!(descriptor.status, Status::Dead);
}

#[tokio::test]
async fn successful_probe_keeps_a_fresh_node_active_and_routable() {
    let state = make_state();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = axum::Router::new().route(
        "/health",
        axum::routing::get(|| async { axum::Json(serde_json::json!({"status": "healthy"})) }),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    state.record_direct_heartbeat(NodeId::from("kvstore-C"), "127.0.0.1".to_string(), addr.port());

    health::check_once(&state, &probe_client()).await;

    assert_eq!(state.ring.node_count(), 1, "a node whose probe succeeds must stay in the ring");
    let descriptor = state.get_node(&NodeId::from("kvstore-C")).unwrap();
    assert_eq!(descriptor.status, Status::Active);
}
