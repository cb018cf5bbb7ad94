//! Integration test for `GossipSender`'s best-effort concurrent fan-out
//! (§4.2, §5).

use gossip::{GossipSender, HeartbeatData, Message};
use parking_lot::Mutex;
use std::sync::Arc;

async fn spawn_gossip_sink() -> (String, Arc<Mutex<Vec<Message>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let received_clone = received.clone();
    let app = axum::Router::new().route(
        "/gossip",
        axum::routing::post(move |axum::Json(msg): axum::Json<Message>| {
            let received = received_clone.clone();
            async move {
                received.lock().push(msg);
                axum::Json(serde_json::json!({ "status": "gossip_received" }))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr.to_string(), received)
}

#[tokio::test]
async fn broadcast_reaches_every_reachable_peer() {
    let (peer_a, received_a) = spawn_gossip_sink().await;
    let (peer_b, received_b) = spawn_gossip_sink().await;

    let sender = GossipSender::new();
    let msg = Message::heartbeat(
        "gw-1",
        HeartbeatData {
            node_id: corelib::node::NodeId::from("kvstore-A"),
            address: "127.0.0.1".to_string(),
            port: 8080,
            timestamp: 1.0,
        },
        1.0,
    );

    sender.broadcast(&[peer_a, peer_b], &msg).await;

    assert_eq!(received_a.lock().len(), 1);
    assert_eq!(received_b.lock().len(), 1);
    assert_eq!(received_a.lock()[0], msg);
}

#[tokio::test]
async fn broadcast_tolerates_an_unreachable_peer() {
    let (peer_a, received_a) = spawn_gossip_sink().await;
    let unreachable = "127.0.0.1:1".to_string();

    let sender = GossipSender::new();
    let msg = Message::heartbeat(
        "gw-1",
        HeartbeatData {
            node_id: corelib::node::NodeId::from("kvstore-B"),
            address: "127.0.0.1".to_string(),
            port: 8081,
            timestamp: 2.0,
        },
        2.0,
    );

    // Best-effort: a dead peer must not stop delivery to the reachable one.
    sender.broadcast(&[unreachable, peer_a], &msg).await;
    assert_eq!(received_a.lock().len(), 1);
}
