//! Simple replication strategy.
//!
//! Places N replicas sequentially around the ring (clockwise from the primary).
//! This is the simplest replication strategy and works well for:
//!
//! - Small clusters (< 10 nodes)
//! - Single data center deployments
//! - When network topology doesn't matter
//!
//! # Algorithm
//!
//! 1. Find primary node (clockwise search from key's token)
//! 2. Continue clockwise to find N-1 more unique nodes
//! 3. Return list of node IDs (primary first)
//!
//! # Performance
//!
//! - **Time**: O(r * log n) where r = replica count, n = tokens
//!   - Each node lookup is O(log n)
//!   - We do r lookups
//! - **Space**: O(r) - returns Vec of node IDs
//!
//! # Limitations
//!
//! - Doesn't consider data center/rack placement
//! - May place replicas on nodes in the same failure domain
//! - Not optimal for multi-DC deployments

use crate::strategy::ReplicationStrategy;
use corelib::node::NodeId;
use corelib::ring::HashRing;

/// Simple replication strategy: N replicas placed sequentially around the ring.
///
/// This strategy finds the primary node (first node clockwise from the key's token),
/// then continues clockwise to find N-1 more unique nodes for replicas.
///
/// # Example
///
/// ```rust
/// use replication::SimpleStrategy;
/// use corelib::ring::HashRing;
///
/// let strategy = SimpleStrategy::new(3); // 3 replicas
/// let ring = HashRing::new();
/// // ... add nodes ...
///
/// let replicas = strategy.replicas_for_key(&ring, b"my-key");
/// // Returns [node1, node2, node3] as NodeIds - primary + 2 replicas
/// ```
#[derive(Debug, Clone)]
pub struct SimpleStrategy {
    /// Number of replicas to create (including primary).
    replication_factor: usize,
}

impl SimpleStrategy {
    /// Create a new simple strategy with the given replication factor.
    ///
    /// # Arguments
    /// * `replication_factor` - Number of replicas (typically 1-5)
    ///   - 1: No replication (single copy)
    ///   - 3: Standard (primary + 2 replicas)
    ///   - 5: High availability (primary + 4 replicas)
    ///
    /// # Performance
    /// - **Time**: O(1) - just stores the factor
    /// - **Space**: O(1)
    ///
    /// # Example
    /// ```rust
    /// let strategy = SimpleStrategy::new(3);
    /// ```
    pub fn new(replication_factor: usize) -> Self {
        Self {
            replication_factor,
        }
    }

    /// Get the default strategy (3 replicas).
    ///
    /// # Returns
    /// SimpleStrategy with replication_factor = 3
    pub fn default() -> Self {
        Self::new(3)
    }
}

impl ReplicationStrategy for SimpleStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replicas_for_key(&self, ring: &HashRing, key: &[u8]) -> Vec<NodeId> {
        // `HashRing::lookup_n` already performs the clockwise walk with
        // duplicate-node suppression (§4.1's `owners`); this strategy is a
        // thin, named policy over it.
        ring.lookup_n(key, self.replication_factor)
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::node::Node;

    #[test]
    fn test_simple_strategy_replication_factor() {
        let strategy = SimpleStrategy::new(3);
        assert_eq!(strategy.replication_factor(), 3);
    }

    #[test]
    fn test_simple_strategy_replicas() {
        let ring = HashRing::new();
        ring.add_node(Node::new(NodeId::from("node1"), "node1"), 4);
        ring.add_node(Node::new(NodeId::from("node2"), "node2"), 4);
        ring.add_node(Node::new(NodeId::from("node3"), "node3"), 4);

        let strategy = SimpleStrategy::new(3);
        let replicas = strategy.replicas_for_key(&ring, b"test-key");

        assert_eq!(replicas.len(), 3);
        // Should have unique nodes
        let unique: std::collections::HashSet<_> = replicas.iter().collect();
        assert_eq!(unique.len(), 3);
    }
}
