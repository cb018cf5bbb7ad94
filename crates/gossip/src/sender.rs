//! Outbound gossip fan-out (§4.2, §5: "bounded worker pool for outbound
//! gossip, max ≈ 10 workers; one task per peer per message").
//!
//! Delivery is best-effort and concurrent across peers: one `tokio` task
//! per peer, all racing, bounded by a semaphore so a large peer list can't
//! spawn unbounded concurrent connections. A peer that times out or
//! refuses the connection is logged and otherwise ignored — gossip never
//! retries (§7: "background loops never propagate errors").

use crate::message::Message;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Outbound gossip timeout per peer (§6).
pub const PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum number of concurrent outbound gossip deliveries.
pub const MAX_CONCURRENT_PEERS: usize = 10;

/// Fans a gossip message out to a gateway's peer list.
#[derive(Clone)]
pub struct GossipSender {
    client: reqwest::Client,
    concurrency: Arc<Semaphore>,
}

impl GossipSender {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(PEER_TIMEOUT)
            .build()
            .expect("reqwest client configuration is static and known-valid");
        Self {
            client,
            concurrency: Arc::new(Semaphore::new(MAX_CONCURRENT_PEERS)),
        }
    }

    /// Send `message` to every peer in `peers` (each a `host:port` string),
    /// concurrently. Returns once all deliveries have been attempted;
    /// individual failures are logged, never propagated.
    pub async fn broadcast(&self, peers: &[String], message: &Message) {
        let mut tasks = Vec::with_capacity(peers.len());
        for peer in peers {
            let client = self.client.clone();
            let concurrency = self.concurrency.clone();
            let peer = peer.clone();
            let message = message.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = concurrency.acquire().await;
                let url = format!("http://{}/gossip", peer);
                match client.post(&url).json(&message).send().await {
                    Ok(resp) if resp.status().is_success() => {
                        tracing::debug!(peer = %peer, "gossip delivered");
                    }
                    Ok(resp) => {
                        tracing::warn!(peer = %peer, status = %resp.status(), "gossip rejected");
                    }
                    Err(err) => {
                        tracing::warn!(peer = %peer, error = %err, "gossip delivery failed");
                    }
                }
            }));
        }
        for task in tasks {
            let _ = task.await;
        }
    }
}

impl Default for GossipSender {
    fn default() -> Self {
        Self::new()
    }
}
