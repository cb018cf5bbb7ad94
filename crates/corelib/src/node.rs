//! Node abstractions for the consistent hash ring.
//!
//! Nodes represent logical participants in the ring. They are identified by
//! an externally supplied, opaque `NodeId` string — unique within one ring,
//! but otherwise meaningless to the ring itself. Using the caller's own
//! identifier (rather than re-hashing it into a compact integer) keeps the
//! virtual-node derivation in `vnode::VirtualNode::from_index` reproducible
//! across independent implementations: two gateways that agree on a
//! `node_id` string agree on every virtual-node position it produces.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier for a node in the cluster.
///
/// Newtype over `String` so it can't be confused with an ordinary key or
/// address at the type level, while still round-tripping byte-for-byte
/// through JSON and through the virtual-node hash input.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Logical node participating in the ring.
///
/// Keep this struct small and cheap to clone; heavy mutable state
/// (connection pools, heartbeat timestamps, health status) belongs to the
/// caller — see `gateway::NodeDescriptor`, which wraps one of these plus the
/// membership bookkeeping the ring itself doesn't need.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    /// Human-readable name or hostname.
    pub name: String,
    /// Optional data center label for topology-aware replication.
    pub datacenter: Option<String>,
    /// Optional rack label for rack-aware replication.
    pub rack: Option<String>,
}

impl Node {
    /// Construct a new node with basic metadata.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            datacenter: None,
            rack: None,
        }
    }

    pub fn with_topology(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        datacenter: impl Into<Option<String>>,
        rack: impl Into<Option<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            datacenter: datacenter.into(),
            rack: rack.into(),
        }
    }
}
