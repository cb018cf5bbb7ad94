//! The storage node's HTTP surface.
//!
//! `get`/`delete` ship in two forms: a path form for trivial keys and a
//! body form that accepts the key in the JSON payload. The body form
//! is the only one guaranteed to work for keys containing `/`, spaces,
//! or non-ASCII bytes.

use crate::error::StorageError;
use crate::state::StorageNodeState;
use crate::store::Store;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<StorageNodeState>) -> Router {
    Router::new()
        .route("/put", post(put))
        .route("/get/:key", get(get_by_path))
        .route("/get", post(get_by_body))
        .route("/delete/:key", delete(delete_by_path))
        .route("/delete", post(delete_by_body))
        .route("/keys", get(list_keys))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/admin/shutdown", post(admin_shutdown))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct PutRequest {
    key: Option<String>,
    value: Option<serde_json::Value>,
}

async fn put(
    State(state): State<Arc<StorageNodeState>>,
    Json(req): Json<PutRequest>,
) -> Result<impl IntoResponse, StorageError> {
    let key = req.key.filter(|k| !k.is_empty()).ok_or(StorageError::MissingField("key"))?;
    let value = req.value.unwrap_or(serde_json::Value::Null);
    state.store.put(key.clone(), value);
    Ok(Json(json!({ "status": "stored", "key": key, "node_id": state.node_id })))
}

async fn get_by_path(
    State(state): State<Arc<StorageNodeState>>,
    Path(key): Path<String>,
) -> Response {
    fetch(&state, &key)
}

#[derive(Deserialize)]
struct KeyRequest {
    key: String,
}

async fn get_by_body(
    State(state): State<Arc<StorageNodeState>>,
    Json(req): Json<KeyRequest>,
) -> Response {
    fetch(&state, &req.key)
}

fn fetch(state: &StorageNodeState, key: &str) -> Response {
    match state.store.get(key) {
        Some(value) => Json(json!({ "key": key, "value": value, "node_id": state.node_id })).into_response(),
        None => StorageError::NotFound.into_response(),
    }
}

async fn delete_by_path(
    State(state): State<Arc<StorageNodeState>>,
    Path(key): Path<String>,
) -> Response {
    remove(&state, &key)
}

async fn delete_by_body(
    State(state): State<Arc<StorageNodeState>>,
    Json(req): Json<KeyRequest>,
) -> Response {
    remove(&state, &req.key)
}

fn remove(state: &StorageNodeState, key: &str) -> Response {
    if state.store.delete(key) {
        Json(json!({ "status": "deleted", "key": key, "node_id": state.node_id })).into_response()
    } else {
        StorageError::NotFound.into_response()
    }
}

async fn list_keys(State(state): State<Arc<StorageNodeState>>) -> impl IntoResponse {
    let keys = state.store.keys();
    Json(json!({ "keys": keys, "count": state.store.size(), "node_id": state.node_id }))
}

async fn health(State(state): State<Arc<StorageNodeState>>) -> Response {
    if state.is_stopping() {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "stopping" }))).into_response()
    } else {
        Json(json!({ "status": "healthy" })).into_response()
    }
}

async fn stats(State(state): State<Arc<StorageNodeState>>) -> impl IntoResponse {
    Json(json!({
        "node_id": state.node_id,
        "address": format!("{}:{}", state.address, state.port),
        "key_count": state.store.size(),
        "registered": state.is_registered(),
        "gateway": state.gateway_address,
        "uptime": state.uptime_secs(),
    }))
}

async fn admin_shutdown(State(state): State<Arc<StorageNodeState>>) -> impl IntoResponse {
    state.shutdown();
    Json(json!({ "status": "stopping" }))
}
