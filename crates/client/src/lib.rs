//! The two-hop routed client (§4.4): translate a logical
//! `put`/`get`/`delete(key, ...)` into a gateway lookup followed by a
//! direct call to the storage node that owns the key.
//!
//! The client does no caching of `owner_of` results — each operation
//! re-resolves the owner, so a `get`/`delete` racing a membership change
//! always targets whoever the gateway currently believes owns the key
//! (§4.4: "An implementation MAY cache, but MUST invalidate on any
//! data-plane 404 observed after a successful lookup"; not caching at all
//! trivially satisfies that).

pub mod error;

pub use error::ClientError;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Data-plane client timeout (§6).
pub const DATA_PLANE_TIMEOUT: Duration = Duration::from_secs(5);

/// The node descriptor shape the gateway's `/nodes/<key>` endpoint returns —
/// just enough to reach the storage node directly. Deliberately not the
/// same type as `gateway::NodeDescriptor`: the client only needs to parse
/// the wire shape, not share the gateway's internal representation.
#[derive(Clone, Debug, Deserialize)]
pub struct NodeInfo {
    pub node_id: String,
    pub address: String,
    pub port: u16,
}

impl NodeInfo {
    fn base_url(&self) -> String {
        format!("http://{}:{}", self.address, self.port)
    }
}

#[derive(Deserialize)]
struct OwnerResponse {
    node: NodeInfo,
}

#[derive(Serialize)]
struct KeyRequest<'a> {
    key: &'a str,
}

#[derive(Deserialize)]
struct GetResponse {
    value: Value,
}

fn path_segment(key: &str) -> String {
    utf8_percent_encode(key, NON_ALPHANUMERIC).to_string()
}

/// Outcome of a single body-form or path-form attempt.
enum Outcome<T> {
    Success(T),
    /// Authoritative "key not found" — a 2xx-adjacent domain answer, not a
    /// structural routing failure.
    NotFound,
    /// This endpoint didn't give a usable answer (transport error,
    /// non-2xx/404 status, or a 404 whose body isn't parseable JSON — the
    /// latter is how an unmatched axum route looks, which is how a
    /// storage node that only implements one of the two forms presents).
    /// The caller should try the other form.
    TryOtherForm,
    /// A definite failure that isn't worth falling back from (5xx, bad
    /// status on the fallback path itself).
    Failed(StatusCode),
}

async fn classify<T: DeserializeOwned>(result: reqwest::Result<reqwest::Response>) -> Outcome<T> {
    let resp = match result {
        Ok(resp) => resp,
        Err(_) => return Outcome::TryOtherForm,
    };
    let status = resp.status();
    if status.is_success() {
        match resp.json::<T>().await {
            Ok(value) => Outcome::Success(value),
            Err(_) => Outcome::TryOtherForm,
        }
    } else if status == StatusCode::NOT_FOUND {
        match resp.json::<Value>().await {
            Ok(_) => Outcome::NotFound,
            Err(_) => Outcome::TryOtherForm,
        }
    } else {
        Outcome::Failed(status)
    }
}

/// Two-hop routed key-value client: `gateway.owner_of(key)` then a direct
/// call to the returned storage node (§4.4).
pub struct Client {
    gateway_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(gateway_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DATA_PLANE_TIMEOUT)
            .build()
            .expect("reqwest client configuration is static and known-valid");
        Self {
            gateway_url: gateway_url.into(),
            http,
        }
    }

    /// Resolve the storage node currently owning `key` (§4.1, §6's
    /// `GET /nodes/<key>`). Percent-encodes the key so a `/`, a space, or
    /// a multibyte character in the key doesn't get interpreted as a path
    /// separator by the gateway's router.
    pub async fn owner_of(&self, key: &str) -> Result<NodeInfo, ClientError> {
        let url = format!("{}/nodes/{}", self.gateway_url, path_segment(key));
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| ClientError::Lookup(err.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::RingEmpty);
        }
        if !resp.status().is_success() {
            return Err(ClientError::Lookup(resp.status().to_string()));
        }
        resp.json::<OwnerResponse>()
            .await
            .map(|body| body.node)
            .map_err(|err| ClientError::Lookup(err.to_string()))
    }

    /// Store `value` under `key`. Single endpoint, no body/path split —
    /// `put` always carries the key in the body (§4.3/§9).
    pub async fn put(&self, key: &str, value: Value) -> Result<(), ClientError> {
        let node = self.owner_of(key).await?;
        let url = format!("{}/put", node.base_url());
        let resp = self
            .http
            .post(&url)
            .json(&json!({ "key": key, "value": value }))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::StorageNode(resp.status()))
        }
    }

    /// Fetch the value stored under `key`. Tries the body form first, then
    /// the path form (§4.4, §9).
    pub async fn get(&self, key: &str) -> Result<Value, ClientError> {
        let node = self.owner_of(key).await?;

        let body_url = format!("{}/get", node.base_url());
        let body_result = self.http.post(&body_url).json(&KeyRequest { key }).send().await;
        match classify::<GetResponse>(body_result).await {
            Outcome::Success(body) => return Ok(body.value),
            Outcome::NotFound => return Err(ClientError::NotFound),
            Outcome::Failed(status) => return Err(ClientError::StorageNode(status)),
            Outcome::TryOtherForm => {}
        }

        let path_url = format!("{}/get/{}", node.base_url(), path_segment(key));
        let path_result = self.http.get(&path_url).send().await;
        match classify::<GetResponse>(path_result).await {
            Outcome::Success(body) => Ok(body.value),
            Outcome::NotFound | Outcome::TryOtherForm => Err(ClientError::NotFound),
            Outcome::Failed(status) => Err(ClientError::StorageNode(status)),
        }
    }

    /// Remove `key`. Tries the body form first, then the path form
    /// (§4.4, §9).
    pub async fn delete(&self, key: &str) -> Result<(), ClientError> {
        let node = self.owner_of(key).await?;

        let body_url = format!("{}/delete", node.base_url());
        let body_result = self.http.post(&body_url).json(&KeyRequest { key }).send().await;
        match classify::<Value>(body_result).await {
            Outcome::Success(_) => return Ok(()),
            Outcome::NotFound => return Err(ClientError::NotFound),
            Outcome::Failed(status) => return Err(ClientError::StorageNode(status)),
            Outcome::TryOtherForm => {}
        }

        let path_url = format!("{}/delete/{}", node.base_url(), path_segment(key));
        let path_result = self.http.delete(&path_url).send().await;
        match classify::<Value>(path_result).await {
            Outcome::Success(_) => Ok(()),
            Outcome::NotFound | Outcome::TryOtherForm => Err(ClientError::NotFound),
            Outcome::Failed(status) => Err(ClientError::StorageNode(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::response::{IntoResponse, Json, Response};
    use axum::routing::{delete, get, post};
    use axum::Router;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// A fake storage node: the handful of routes the client actually
    /// calls, backed by a plain mutex-guarded map.
    #[derive(Default)]
    struct FakeNode {
        data: Mutex<HashMap<String, Value>>,
        node_id: String,
    }

    fn fake_node_router(node_id: &str) -> (Router, Arc<FakeNode>) {
        let state = Arc::new(FakeNode {
            data: Mutex::new(HashMap::new()),
            node_id: node_id.to_string(),
        });
        let router = Router::new()
            .route("/put", post(fake_put))
            .route("/get", post(fake_get_body))
            .route("/get/:key", get(fake_get_path))
            .route("/delete", post(fake_delete_body))
            .route("/delete/:key", delete(fake_delete_path))
            .with_state(state.clone());
        (router, state)
    }

    async fn fake_put(State(state): State<Arc<FakeNode>>, Json(req): Json<Value>) -> Response {
        let key = req["key"].as_str().unwrap().to_string();
        state.data.lock().insert(key.clone(), req["value"].clone());
        Json(json!({ "status": "stored", "key": key, "node_id": state.node_id })).into_response()
    }

    async fn fake_get_body(State(state): State<Arc<FakeNode>>, Json(req): Json<KeyRequestOwned>) -> Response {
        fetch(&state, &req.key)
    }

    async fn fake_get_path(State(state): State<Arc<FakeNode>>, Path(key): Path<String>) -> Response {
        fetch(&state, &key)
    }

    fn fetch(state: &FakeNode, key: &str) -> Response {
        match state.data.lock().get(key).cloned() {
            Some(value) => Json(json!({ "key": key, "value": value, "node_id": state.node_id })).into_response(),
            None => (axum::http::StatusCode::NOT_FOUND, Json(json!({ "error": "Key not found" }))).into_response(),
        }
    }

    async fn fake_delete_body(State(state): State<Arc<FakeNode>>, Json(req): Json<KeyRequestOwned>) -> Response {
        remove(&state, &req.key)
    }

    async fn fake_delete_path(State(state): State<Arc<FakeNode>>, Path(key): Path<String>) -> Response {
        remove(&state, &key)
    }

    fn remove(state: &FakeNode, key: &str) -> Response {
        if state.data.lock().remove(key).is_some() {
            Json(json!({ "status": "deleted", "key": key, "node_id": state.node_id })).into_response()
        } else {
            (axum::http::StatusCode::NOT_FOUND, Json(json!({ "error": "Key not found" }))).into_response()
        }
    }

    #[derive(serde::Deserialize)]
    struct KeyRequestOwned {
        key: String,
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("127.0.0.1:{}", addr.port())
    }

    async fn spawn_gateway(owner: &str) -> String {
        let owner = owner.to_string();
        let router = Router::new().route(
            "/nodes/:key",
            get(move |Path(_key): Path<String>| {
                let owner = owner.clone();
                async move {
                    let (address, port) = owner.split_once(':').unwrap();
                    Json(json!({
                        "key": "irrelevant",
                        "node": { "node_id": "fake", "address": address, "port": port.parse::<u16>().unwrap() },
                    }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn put_then_get_round_trips_via_body_form() {
        let (node_router, _state) = fake_node_router("n1");
        let node_addr = spawn(node_router).await;
        let gateway_url = spawn_gateway(&node_addr).await;

        let client = Client::new(gateway_url);
        client.put("user:1001", json!({"name": "Alice"})).await.unwrap();
        let value = client.get("user:1001").await.unwrap();
        assert_eq!(value, json!({"name": "Alice"}));
    }

    #[tokio::test]
    async fn get_missing_key_is_not_found() {
        let (node_router, _state) = fake_node_router("n1");
        let node_addr = spawn(node_router).await;
        let gateway_url = spawn_gateway(&node_addr).await;

        let client = Client::new(gateway_url);
        let err = client.get("nope").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (node_router, _state) = fake_node_router("n1");
        let node_addr = spawn(node_router).await;
        let gateway_url = spawn_gateway(&node_addr).await;

        let client = Client::new(gateway_url);
        client.put("k", json!("v")).await.unwrap();
        client.delete("k").await.unwrap();
        assert!(matches!(client.get("k").await.unwrap_err(), ClientError::NotFound));
    }

    #[tokio::test]
    async fn special_characters_round_trip_through_body_form() {
        let (node_router, _state) = fake_node_router("n1");
        let node_addr = spawn(node_router).await;
        let gateway_url = spawn_gateway(&node_addr).await;

        let client = Client::new(gateway_url);
        for key in ["key with spaces", "key/with/slashes", "\u{1F511}_emoji_key"] {
            client.put(key, json!("x")).await.unwrap();
            assert_eq!(client.get(key).await.unwrap(), json!("x"));
        }
    }

    #[tokio::test]
    async fn owner_of_on_unreachable_gateway_fails() {
        let client = Client::new("http://127.0.0.1:1".to_string());
        assert!(client.owner_of("any").await.is_err());
    }
}
