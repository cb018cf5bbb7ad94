//! Shared gateway state: node descriptor table, ring, and gossip
//! dedup set, plus the heartbeat-apply logic both the HTTP heartbeat
//! handler and the gossip handler funnel through (§4.2).

use crate::descriptor::{NodeDescriptor, Status};
use corelib::node::{Node, NodeId};
use corelib::ring::HashRing;
use gossip::{GossipSender, HeartbeatData, Message, SeenSet};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default virtual nodes per storage node (§6).
pub const DEFAULT_VNODES: usize = 150;
/// Virtual nodes per storage node after `admin_clear_nodes` (§3: "reduced
/// to 100 on admin-clear").
pub const ADMIN_CLEAR_VNODES: usize = 100;
/// Default heartbeat timeout before a node is evicted (§6).
pub const DEFAULT_HEARTBEAT_TIMEOUT_SECS: f64 = 30.0;
/// Default health-checker tick (§6).
pub const DEFAULT_HEALTH_CHECK_INTERVAL_SECS: u64 = 10;
/// Default direct-probe timeout (§6).
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;

pub fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is after the epoch")
        .as_secs_f64()
}

pub struct GatewayState {
    pub gateway_id: String,
    vnodes: AtomicUsize,
    pub heartbeat_timeout: f64,
    pub peers: Vec<String>,
    pub ring: HashRing,
    pub nodes: Mutex<HashMap<NodeId, NodeDescriptor>>,
    pub seen: Mutex<SeenSet>,
    pub gossip: GossipSender,
}

impl GatewayState {
    pub fn new(gateway_id: String, peers: Vec<String>, vnodes: usize, heartbeat_timeout: f64) -> Self {
        Self {
            gateway_id,
            vnodes: AtomicUsize::new(vnodes),
            heartbeat_timeout,
            peers,
            ring: HashRing::new(),
            nodes: Mutex::new(HashMap::new()),
            seen: Mutex::new(SeenSet::default()),
            gossip: GossipSender::new(),
        }
    }

    /// Insert the node into the ring if it isn't already a member. A no-op
    /// when the node is already present and alive in the ring — which
    /// means calling this unconditionally on every accepted heartbeat is
    /// safe, and it's exactly what's needed to re-add a node whose
    /// descriptor survived an eviction but whose ring position didn't
    /// (§4.2's "dead → active" state transition).
    fn ensure_in_ring(&self, node_id: &NodeId) {
        let vnodes = self.vnodes.load(Ordering::SeqCst);
        self.ring.add_node(Node::new(node_id.clone(), node_id.to_string()), vnodes);
    }

    /// Apply a direct heartbeat from a storage node (`POST /heartbeat`).
    ///
    /// Always touches `last_heartbeat` to "now" and sets `status = active`,
    /// regardless of whether the node was known before — a direct
    /// heartbeat is locally authoritative. Returns whether the node_id was
    /// previously unknown, purely for the caller's logging.
    pub fn record_direct_heartbeat(&self, node_id: NodeId, address: String, port: u16) -> bool {
        let timestamp = now_secs();
        let is_new = {
            let mut nodes = self.nodes.lock();
            match nodes.get_mut(&node_id) {
                Some(existing) => {
                    existing.address = address;
                    existing.port = port;
                    existing.last_heartbeat = timestamp;
                    existing.status = Status::Active;
                    false
                }
                None => {
                    nodes.insert(
                        node_id.clone(),
                        NodeDescriptor::new(node_id.clone(), address, port, timestamp),
                    );
                    true
                }
            }
        };
        self.ensure_in_ring(&node_id);
        is_new
    }

    /// Apply a gossiped `HEARTBEAT` observation (§4.2, §9's fixed inbound
    /// behaviour). Returns `true` if the descriptor was created or its
    /// `last_heartbeat` advanced — the caller re-broadcasts only in that
    /// case combined with the sender not being this gateway.
    pub fn apply_gossip_heartbeat(&self, data: &HeartbeatData) -> bool {
        let applied = {
            let mut nodes = self.nodes.lock();
            match nodes.get_mut(&data.node_id) {
                Some(existing) => {
                    if data.timestamp > existing.last_heartbeat {
                        existing.address = data.address.clone();
                        existing.port = data.port;
                        existing.last_heartbeat = data.timestamp;
                        existing.status = Status::Active;
                        true
                    } else {
                        false
                    }
                }
                None => {
                    nodes.insert(
                        data.node_id.clone(),
                        NodeDescriptor::new(
                            data.node_id.clone(),
                            data.address.clone(),
                            data.port,
                            data.timestamp,
                        ),
                    );
                    true
                }
            }
        };
        if applied {
            self.ensure_in_ring(&data.node_id);
        }
        applied
    }

    /// Intake a peer-originated gossip message: dedup by `message_id`,
    /// apply if fresh, and report whether it should be re-broadcast
    /// (never back to its own sender, §4.2).
    pub fn handle_inbound_gossip(&self, message: &Message) -> bool {
        let fresh = self.seen.lock().insert(message.message_id());
        if !fresh {
            return false;
        }
        if let Some(data) = message.heartbeat_data() {
            self.apply_gossip_heartbeat(data);
        }
        message.sender_id() != self.gateway_id
    }

    /// Build and fan out a `HEARTBEAT` gossip message for a locally
    /// accepted heartbeat (§4.2).
    pub async fn gossip_heartbeat(&self, node_id: NodeId, address: String, port: u16) {
        if self.peers.is_empty() {
            return;
        }
        let timestamp = now_secs();
        let message = Message::heartbeat(
            self.gateway_id.clone(),
            HeartbeatData {
                node_id,
                address,
                port,
                timestamp,
            },
            timestamp,
        );
        // The message we just produced is our own; record it so an
        // identical echo bouncing back through a peer is suppressed.
        self.seen.lock().insert(message.message_id());
        self.gossip.broadcast(&self.peers, &message).await;
    }

    pub async fn rebroadcast(&self, message: Message) {
        if self.peers.is_empty() {
            return;
        }
        self.gossip.broadcast(&self.peers, &message).await;
    }

    pub fn get_node(&self, node_id: &NodeId) -> Option<NodeDescriptor> {
        self.nodes.lock().get(node_id).cloned()
    }

    pub fn list_nodes(&self) -> HashMap<String, NodeDescriptor> {
        self.nodes
            .lock()
            .values()
            .map(|d| (d.node_id.to_string(), d.clone()))
            .collect()
    }

    /// Snapshot of descriptors for the health checker to walk — taken
    /// under one brief lock so the background task never holds it across
    /// a network probe (§5).
    pub fn snapshot_descriptors(&self) -> Vec<NodeDescriptor> {
        self.nodes.lock().values().cloned().collect()
    }

    pub fn mark_dead(&self, node_id: &NodeId) {
        let mut nodes = self.nodes.lock();
        if let Some(entry) = nodes.get_mut(node_id) {
            entry.status = Status::Dead;
        }
        drop(nodes);
        self.ring.remove_node(node_id);
    }

    /// Mark a descriptor active again after a successful direct probe.
    ///
    /// A descriptor can be `Dead` but still within `heartbeat_timeout` (its
    /// `last_heartbeat` was advanced by gossip after eviction, without a
    /// direct heartbeat re-adding it to the ring). Re-inserting here too —
    /// not just in `record_direct_heartbeat`/`apply_gossip_heartbeat` —
    /// keeps the invariant that an `Active` descriptor is always routable.
    pub fn mark_active(&self, node_id: &NodeId) {
        let mut nodes = self.nodes.lock();
        if let Some(entry) = nodes.get_mut(node_id) {
            entry.status = Status::Active;
        }
        drop(nodes);
        self.ensure_in_ring(node_id);
    }

    pub fn owner_of(&self, key: &str) -> Option<NodeDescriptor> {
        let node_id = self.ring.lookup(key.as_bytes())?;
        self.get_node(&node_id)
    }

    /// Test-only reset (`POST /admin/clear_nodes`): wipe the node table
    /// and swap in a fresh, empty ring with `ADMIN_CLEAR_VNODES` positions
    /// per future node (§3: "reduced to 100 on admin-clear"). Returns the
    /// number of node descriptors that were cleared.
    pub fn admin_clear(&self) -> usize {
        let mut nodes = self.nodes.lock();
        let cleared = nodes.len();
        let ids: Vec<NodeId> = nodes.keys().cloned().collect();
        nodes.clear();
        drop(nodes);
        for id in ids {
            self.ring.remove_node(&id);
        }
        self.vnodes.store(ADMIN_CLEAR_VNODES, Ordering::SeqCst);
        cleared
    }

    pub fn active_count(&self) -> usize {
        self.nodes
            .lock()
            .values()
            .filter(|d| d.status == Status::Active)
            .count()
    }
}
