//! The gossip message envelope (§6's wire schema, §9's "duck-typed gossip
//! payloads").
//!
//! The three message types are a small closed set, encoded as a tagged
//! enum whose `data` shape depends on `message_type`. Only `HEARTBEAT` is
//! ever constructed or processed today; `NODE_UPDATE` and `RING_SYNC` are
//! forward-compatibility reservations carried so the wire format has a slot
//! for them without anything downstream needing to change.

use corelib::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The liveness observation carried by a `HEARTBEAT` message: everything a
/// receiving gateway needs to create or refresh a node descriptor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HeartbeatData {
    pub node_id: NodeId,
    pub address: String,
    pub port: u16,
    /// Seconds since the epoch; wall-clock is acceptable (§6).
    pub timestamp: f64,
}

/// A gossip message exchanged between gateway peers.
///
/// Serializes with an internally-tagged `message_type` field so the JSON
/// shape matches §6 exactly:
///
/// ```json
/// { "message_id": "...", "message_type": "HEARTBEAT", "sender_id": "...",
///   "data": { "node_id": "...", "address": "...", "port": 0, "timestamp": 0.0 },
///   "timestamp": 0.0 }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "message_type")]
pub enum Message {
    #[serde(rename = "HEARTBEAT")]
    Heartbeat {
        message_id: Uuid,
        sender_id: String,
        data: HeartbeatData,
        timestamp: f64,
    },
    /// Reserved: no producer or consumer exists yet (§9).
    #[serde(rename = "NODE_UPDATE")]
    NodeUpdate {
        message_id: Uuid,
        sender_id: String,
        timestamp: f64,
    },
    /// Reserved: no producer or consumer exists yet (§9).
    #[serde(rename = "RING_SYNC")]
    RingSync {
        message_id: Uuid,
        sender_id: String,
        timestamp: f64,
    },
}

impl Message {
    /// Build a fresh `HEARTBEAT` message, as emitted by a gateway that just
    /// accepted a heartbeat or registration (§4.2).
    pub fn heartbeat(sender_id: impl Into<String>, data: HeartbeatData, timestamp: f64) -> Self {
        Message::Heartbeat {
            message_id: Uuid::new_v4(),
            sender_id: sender_id.into(),
            data,
            timestamp,
        }
    }

    pub fn message_id(&self) -> Uuid {
        match self {
            Message::Heartbeat { message_id, .. }
            | Message::NodeUpdate { message_id, .. }
            | Message::RingSync { message_id, .. } => *message_id,
        }
    }

    pub fn sender_id(&self) -> &str {
        match self {
            Message::Heartbeat { sender_id, .. }
            | Message::NodeUpdate { sender_id, .. }
            | Message::RingSync { sender_id, .. } => sender_id,
        }
    }

    /// The heartbeat payload, if this message carries one.
    pub fn heartbeat_data(&self) -> Option<&HeartbeatData> {
        match self {
            Message::Heartbeat { data, .. } => Some(data),
            _ => None,
        }
    }
}
