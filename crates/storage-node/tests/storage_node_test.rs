//! Integration tests for the storage node's HTTP surface, run against an
//! in-process server bound to a loopback ephemeral port (no real process
//! orchestration, per the spec's exclusion of that from scope).

use serde_json::{json, Value};
use std::sync::Arc;
use storage_node::store::Store;
use storage_node::StorageNodeState;

async fn spawn_node(node_id: &str) -> (String, Arc<StorageNodeState>) {
    let state = Arc::new(StorageNodeState::new(
        node_id.to_string(),
        "127.0.0.1".to_string(),
        0,
        "http://127.0.0.1:1".to_string(),
    ));
    let app = storage_node::http::router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), state)
}

#[tokio::test]
async fn put_then_get_by_path_round_trips() {
    let (base, _state) = spawn_node("kvstore-A").await;
    let client = reqwest::Client::new();

    let resp: Value = client
        .post(format!("{base}/put"))
        .json(&json!({ "key": "user:1001", "value": {"name": "Alice", "age": 25} }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "stored");
    assert_eq!(resp["node_id"], "kvstore-A");

    let got: Value = client
        .get(format!("{base}/get/user:1001"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(got["value"], json!({"name": "Alice", "age": 25}));
}

#[tokio::test]
async fn put_missing_key_is_400() {
    let (base, _state) = spawn_node("kvstore-A").await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/put"))
        .json(&json!({ "value": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn get_missing_key_is_404_on_both_forms() {
    let (base, _state) = spawn_node("kvstore-A").await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/get/nope")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .post(format!("{base}/get"))
        .json(&json!({ "key": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let (base, _state) = spawn_node("kvstore-A").await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/put"))
        .json(&json!({ "key": "k", "value": "v" }))
        .send()
        .await
        .unwrap();

    let resp: Value = client
        .delete(format!("{base}/delete/k"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "deleted");

    let resp = client.get(format!("{base}/get/k")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    // Deleting again is also a 404, not a repeated success.
    let resp = client.delete(format!("{base}/delete/k")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn body_form_round_trips_special_characters() {
    let (base, _state) = spawn_node("kvstore-A").await;
    let client = reqwest::Client::new();

    for key in ["key with spaces", "key/with/slashes", "\u{1F511}_emoji_key"] {
        client
            .post(format!("{base}/put"))
            .json(&json!({ "key": key, "value": "x" }))
            .send()
            .await
            .unwrap();

        let got: Value = client
            .post(format!("{base}/get"))
            .json(&json!({ "key": key }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(got["value"], json!("x"), "body-form get should round-trip {key:?}");

        let resp = client
            .post(format!("{base}/delete"))
            .json(&json!({ "key": key }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
}

#[tokio::test]
async fn keys_and_stats_report_counts() {
    let (base, state) = spawn_node("kvstore-A").await;
    let client = reqwest::Client::new();

    for key in ["a", "b", "c"] {
        client
            .post(format!("{base}/put"))
            .json(&json!({ "key": key, "value": 1 }))
            .send()
            .await
            .unwrap();
    }

    let keys: Value = client.get(format!("{base}/keys")).send().await.unwrap().json().await.unwrap();
    assert_eq!(keys["count"], 3);
    assert_eq!(keys["node_id"], "kvstore-A");

    let stats: Value = client.get(format!("{base}/stats")).send().await.unwrap().json().await.unwrap();
    assert_eq!(stats["node_id"], "kvstore-A");
    assert_eq!(stats["key_count"], 3);
    assert_eq!(stats["registered"], false);

    assert_eq!(state.store.size(), 3);
}

#[tokio::test]
async fn health_is_healthy_until_explicit_shutdown() {
    let (base, state) = spawn_node("kvstore-A").await;
    let client = reqwest::Client::new();

    let resp: Value = client.get(format!("{base}/health")).send().await.unwrap().json().await.unwrap();
    assert_eq!(resp["status"], "healthy");

    let resp = client.post(format!("{base}/admin/shutdown")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(state.is_stopping());

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 503);
}
