//! The node descriptor table (§3's "Node descriptor", §4.2's registration
//! and health-checker logic).

use corelib::node::NodeId;
use serde::{Deserialize, Serialize};

/// Liveness status of a tracked storage node.
///
/// `inactive` is named in the design notes but never set by any code path
/// (§9: "Ambiguous status `inactive`... treat as unused") — it is omitted
/// here rather than modeled as a variant nothing ever constructs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Dead,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Dead => "dead",
        }
    }
}

/// `(node_id, address, port, last_heartbeat, status)` — §3's data model,
/// verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub node_id: NodeId,
    pub address: String,
    pub port: u16,
    /// Seconds since the epoch; updated on every accepted heartbeat or
    /// peer-gossip observation with a newer timestamp.
    pub last_heartbeat: f64,
    pub status: Status,
}

impl NodeDescriptor {
    pub fn new(node_id: NodeId, address: String, port: u16, last_heartbeat: f64) -> Self {
        Self {
            node_id,
            address,
            port,
            last_heartbeat,
            status: Status::Active,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.address, self.port)
    }
}
