//! The gateway's HTTP surface (§6).

use crate::error::GatewayError;
use crate::state::{now_secs, GatewayState};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use corelib::node::NodeId;
use gossip::Message;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/heartbeat", post(heartbeat))
        .route("/nodes", get(list_nodes))
        .route("/nodes/:key", get(owner_of))
        .route("/ring/status", get(ring_status))
        .route("/gossip", post(inbound_gossip))
        .route("/health", get(health))
        .route("/admin/clear_nodes", post(admin_clear_nodes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct HeartbeatRequest {
    node_id: Option<String>,
    address: Option<String>,
    port: Option<u16>,
}

async fn heartbeat(
    State(state): State<Arc<GatewayState>>,
    Json(req): Json<HeartbeatRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let node_id = req.node_id.ok_or(GatewayError::MissingField("node_id"))?;
    let address = req.address.ok_or(GatewayError::MissingField("address"))?;
    let port = req.port.ok_or(GatewayError::MissingField("port"))?;

    let node_id = NodeId::from(node_id);
    state.record_direct_heartbeat(node_id.clone(), address.clone(), port);
    state.gossip_heartbeat(node_id, address, port).await;

    Ok(Json(json!({ "status": "heartbeat_received" })))
}

async fn list_nodes(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(json!({ "nodes": state.list_nodes() }))
}

async fn owner_of(
    State(state): State<Arc<GatewayState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let node = state.owner_of(&key).ok_or(GatewayError::RingEmpty)?;
    Ok(Json(json!({ "key": key, "node": node })))
}

async fn ring_status(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(json!({
        "gateway_id": state.gateway_id,
        "total_nodes": state.list_nodes().len(),
        "active_nodes": state.active_count(),
        "ring_nodes": state.ring.node_ids(),
        "peer_gateways": state.peers,
    }))
}

async fn inbound_gossip(
    State(state): State<Arc<GatewayState>>,
    Json(message): Json<Message>,
) -> impl IntoResponse {
    if state.handle_inbound_gossip(&message) {
        state.rebroadcast(message).await;
    }
    Json(json!({ "status": "gossip_received" }))
}

async fn health(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "gateway_id": state.gateway_id,
        "nodes_count": state.list_nodes().len(),
        "active_nodes": state.active_count(),
        "timestamp": now_secs(),
    }))
}

async fn admin_clear_nodes(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    let cleared = state.admin_clear();
    Json(json!({
        "status": "success",
        "cleared_nodes": cleared,
        "gateway_id": state.gateway_id,
    }))
}
