//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Virtual nodes are a technique to improve load distribution in consistent hashing.
//! Instead of each physical node having a single token on the ring, each node has
//! multiple tokens (virtual nodes). This provides:
//!
//! 1. **Better Load Distribution**: More tokens = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When nodes join/leave, only a fraction of keys move
//! 3. **Fault Tolerance**: Failure of one node affects fewer keys (distributed across vnodes)
//!
//! # Typical Configuration
//!
//! The default is `V = 150` virtual nodes per physical node, reduced to 100
//! after an `admin_clear_nodes` reset and down to 10-50 in tests.

use crate::node::NodeId;
use crate::token::md5::Md5Token;
use crate::token::Token;

/// A virtual node on the hash ring.
///
/// Represents a single token position owned by a physical node. Each
/// physical node has `V` virtual nodes distributed around the ring.
///
/// # Invariants
///
/// - Every `VirtualNode` belongs to exactly one physical node.
/// - Tokens are ordered (can be sorted/compared).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Token position on the ring.
    pub token: Md5Token,
    /// The physical node that owns this virtual node.
    pub node_id: NodeId,
}

impl VirtualNode {
    /// Create a new virtual node.
    #[inline]
    pub fn new(token: Md5Token, node_id: NodeId) -> Self {
        Self { token, node_id }
    }

    /// Create a virtual node from a node ID and vnode index.
    ///
    /// The key hashed is `"{node_id}:{index}"` — the separator and decimal
    /// formatting of `index` are part of the wire contract: two
    /// independently implemented gateways must derive the same position for
    /// the same `(node_id, index)` pair or routing disagrees.
    pub fn from_index(node_id: NodeId, vnode_index: usize) -> Self {
        let vnode_key = format!("{}:{}", node_id, vnode_index);
        let token = Md5Token::from_key(&vnode_key);
        Self::new(token, node_id)
    }

    #[inline]
    pub fn token(&self) -> Md5Token {
        self.token
    }

    #[inline]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Clockwise distance to another virtual node.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> Md5Token {
        self.token.distance_to(&other.token)
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(token={}, node={})", self.token, self.node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vnode_from_index() {
        let vnode0 = VirtualNode::from_index(NodeId::from("node1"), 0);
        let vnode1 = VirtualNode::from_index(NodeId::from("node1"), 1);

        assert_ne!(vnode0.token(), vnode1.token());
        assert_eq!(vnode0.node_id(), &NodeId::from("node1"));
        assert_eq!(vnode1.node_id(), &NodeId::from("node1"));
    }

    #[test]
    fn test_vnode_ordering() {
        let vnode1 = VirtualNode::new(Md5Token(100), NodeId::from("a"));
        let vnode2 = VirtualNode::new(Md5Token(200), NodeId::from("b"));
        assert!(vnode1 < vnode2);
    }
}
