//! Hash ring data structure.
//!
//! Holds the sorted virtual-node position table and the live node set, and
//! answers `owner(key)` / `owners(key, count)` lookups.
//!
//! # Concurrency
//!
//! The ring is read on every routing lookup and written on every membership
//! change (§5 of the spec this implements: "single writer, many readers").
//! The sorted position vector and the node metadata map are wrapped
//! together in one `Arc<Snapshot>`, guarded by a `parking_lot::RwLock`.
//! Writers build a new `Snapshot` and swap the `Arc` under the write lock;
//! readers take the read lock only long enough to clone the `Arc` (a cheap
//! refcount bump), then binary-search the immutable snapshot without
//! holding any lock. This is the copy-on-write pattern the design notes
//! recommend for a lock-free read path.

use crate::node::{Node, NodeId};
use crate::partitioner::md5::Md5Partitioner;
use crate::partitioner::Partitioner;
use crate::token::md5::Md5Token;
use crate::token::Token;
use crate::vnode::VirtualNode;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Default virtual nodes per physical node.
pub const DEFAULT_VNODES: usize = 150;

#[derive(Clone)]
struct NodeEntry {
    node: Node,
    vnodes: usize,
}

struct Snapshot {
    /// Virtual-node positions, sorted by token. Binary search finds the
    /// least position >= a key's token; wraps to index 0 if none.
    positions: Vec<VirtualNode>,
    nodes: HashMap<NodeId, NodeEntry>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            positions: Vec::new(),
            nodes: HashMap::new(),
        }
    }
}

/// Consistent hash ring: maps keys to the node that owns them.
///
/// Cheap to clone (an `Arc` around shared, lock-guarded state) — cloning a
/// `HashRing` gives another handle to the same ring, not a copy of it.
#[derive(Clone)]
pub struct HashRing {
    partitioner: Arc<Md5Partitioner>,
    inner: Arc<RwLock<Arc<Snapshot>>>,
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("node_count", &self.node_count())
            .field("token_count", &self.token_count())
            .finish()
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new()
    }
}

impl HashRing {
    /// Create an empty ring.
    pub fn new() -> Self {
        Self {
            partitioner: Arc::new(Md5Partitioner),
            inner: Arc::new(RwLock::new(Arc::new(Snapshot::empty()))),
        }
    }

    /// Current read-only snapshot (cheap: one Arc clone, one brief read lock).
    fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.read().clone()
    }

    /// Add a node to the ring with `vnodes` virtual positions.
    ///
    /// Idempotent: if `node.id` is already present, this returns `false`
    /// without mutating the ring.
    pub fn add_node(&self, node: Node, vnodes: usize) -> bool {
        let mut guard = self.inner.write();
        if guard.nodes.contains_key(&node.id) {
            return false;
        }

        let mut next = (**guard).clone_shallow();
        let new_positions = (0..vnodes)
            .map(|i| VirtualNode::from_index(node.id.clone(), i));
        next.positions.extend(new_positions);
        // Later insertion wins on a position collision: stable sort
        // preserves the relative order of equal keys, and we always append
        // new positions after existing ones.
        next.positions.sort_by_key(|v| v.token);
        next.nodes.insert(
            node.id.clone(),
            NodeEntry {
                node,
                vnodes,
            },
        );

        *guard = Arc::new(next);
        true
    }

    /// Remove a node and all of its virtual positions from the ring.
    ///
    /// Idempotent: returns `false` if the node wasn't present.
    pub fn remove_node(&self, node_id: &NodeId) -> bool {
        let mut guard = self.inner.write();
        if !guard.nodes.contains_key(node_id) {
            return false;
        }

        let mut next = (**guard).clone_shallow();
        next.positions.retain(|v| &v.node_id != node_id);
        next.nodes.remove(node_id);

        *guard = Arc::new(next);
        true
    }

    /// Hash a key into its ring position using this ring's partitioner.
    pub fn token_for(&self, key: &[u8]) -> Md5Token {
        self.partitioner.partition(key)
    }

    /// Find the owner of a key: the node at the least position >= the key's
    /// token, wrapping to the first position if none is found.
    pub fn lookup(&self, key: &[u8]) -> Option<NodeId> {
        let snap = self.snapshot();
        Self::owner_in(&snap, self.token_for(key)).map(|v| v.node_id.clone())
    }

    /// Like [`Self::lookup`], but returns the full node descriptor.
    pub fn lookup_node(&self, key: &[u8]) -> Option<Node> {
        let snap = self.snapshot();
        let node_id = Self::owner_in(&snap, self.token_for(key))?.node_id.clone();
        snap.nodes.get(&node_id).map(|e| e.node.clone())
    }

    /// Walk clockwise from a key's position, returning up to `count`
    /// distinct node ids. The first element equals `lookup(key)`. Used for
    /// future replication placement; current clients consume only
    /// `lookup`.
    pub fn lookup_n(&self, key: &[u8], count: usize) -> Vec<NodeId> {
        let snap = self.snapshot();
        if count == 0 || snap.positions.is_empty() {
            return Vec::new();
        }

        let token = self.token_for(key);
        let start = Self::position_index(&snap, token);

        let mut result = Vec::with_capacity(count);
        let mut seen = std::collections::HashSet::new();
        for i in 0..snap.positions.len() {
            let idx = (start + i) % snap.positions.len();
            let node_id = &snap.positions[idx].node_id;
            if seen.insert(node_id.clone()) {
                result.push(node_id.clone());
                if result.len() >= count {
                    break;
                }
            }
        }
        result
    }

    /// Binary-search index of the least position >= `token`, wrapping to 0.
    fn position_index(snap: &Snapshot, token: Md5Token) -> usize {
        match snap.positions.binary_search_by(|v| v.token.cmp(&token)) {
            Ok(idx) => idx,
            Err(idx) if idx < snap.positions.len() => idx,
            Err(_) => 0,
        }
    }

    fn owner_in(snap: &Snapshot, token: Md5Token) -> Option<&VirtualNode> {
        if snap.positions.is_empty() {
            return None;
        }
        let idx = Self::position_index(snap, token);
        Some(&snap.positions[idx])
    }

    /// All node ids currently in the ring.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.snapshot().nodes.keys().cloned().collect()
    }

    /// All node descriptors currently in the ring.
    pub fn nodes(&self) -> Vec<Node> {
        self.snapshot().nodes.values().map(|e| e.node.clone()).collect()
    }

    /// Look up a node's descriptor by id, regardless of ring position.
    pub fn get_node(&self, node_id: &NodeId) -> Option<Node> {
        self.snapshot().nodes.get(node_id).map(|e| e.node.clone())
    }

    /// Number of distinct physical nodes in the ring.
    pub fn node_count(&self) -> usize {
        self.snapshot().nodes.len()
    }

    /// Total number of virtual-node positions in the ring.
    pub fn token_count(&self) -> usize {
        self.snapshot().positions.len()
    }

    /// Whether the ring has no nodes.
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// All `(token, node_id)` pairs currently on the ring, sorted by token.
    pub fn tokens(&self) -> Vec<(Md5Token, NodeId)> {
        self.snapshot()
            .positions
            .iter()
            .map(|v| (v.token, v.node_id.clone()))
            .collect()
    }

    /// Name of the partitioner backing this ring.
    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }
}

impl Snapshot {
    /// Shallow clone: copies the position vector and node map so the caller
    /// can mutate the copy without disturbing readers still holding the old
    /// `Arc<Snapshot>`.
    fn clone_shallow(&self) -> Self {
        Self {
            positions: self.positions.clone(),
            nodes: self.nodes.clone(),
        }
    }
}

/// Builder for constructing a [`HashRing`] with a set of initial nodes.
///
/// ```rust
/// use corelib::node::Node;
/// use corelib::ring::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_vnodes(32)
///     .add_node(Node::new("node-a", "node-a"))
///     .add_node(Node::new("node-b", "node-b"))
///     .build();
/// assert_eq!(ring.node_count(), 2);
/// ```
pub struct RingBuilder {
    default_vnodes: usize,
    pending: Vec<(Node, usize)>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            default_vnodes: DEFAULT_VNODES,
            pending: Vec::new(),
        }
    }

    /// Set the default vnode count used by `add_node`.
    pub fn with_vnodes(mut self, vnodes: usize) -> Self {
        self.default_vnodes = vnodes;
        self
    }

    /// Queue a node using the builder's default vnode count.
    pub fn add_node(mut self, node: Node) -> Self {
        self.pending.push((node, self.default_vnodes));
        self
    }

    /// Queue a node with an explicit vnode count, overriding the default.
    pub fn add_node_with_vnodes(mut self, node: Node, vnodes: usize) -> Self {
        self.pending.push((node, vnodes));
        self
    }

    /// Build the ring, inserting queued nodes in order.
    pub fn build(self) -> HashRing {
        let ring = HashRing::new();
        for (node, vnodes) in self.pending {
            ring.add_node(node, vnodes);
        }
        ring
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ring_has_no_owner() {
        let ring = HashRing::new();
        assert_eq!(ring.lookup(b"anything"), None);
    }

    #[test]
    fn single_node_owns_everything() {
        let ring = HashRing::new();
        ring.add_node(Node::new("a", "a"), 8);
        for key in [b"k1".as_slice(), b"k2", b"a-much-longer-key"] {
            assert_eq!(ring.lookup(key), Some(NodeId::from("a")));
        }
    }

    #[test]
    fn add_is_idempotent() {
        let ring = HashRing::new();
        ring.add_node(Node::new("a", "a"), 8);
        assert_eq!(ring.token_count(), 8);
        ring.add_node(Node::new("a", "a"), 8);
        assert_eq!(ring.token_count(), 8, "re-adding a present node must not mutate the ring");
        assert_eq!(ring.node_count(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let ring = HashRing::new();
        ring.add_node(Node::new("a", "a"), 8);
        assert!(ring.remove_node(&NodeId::from("a")));
        assert!(!ring.remove_node(&NodeId::from("a")));
        assert_eq!(ring.node_count(), 0);
    }

    #[test]
    fn add_remove_add_restores_initial_state() {
        let ring = HashRing::new();
        ring.add_node(Node::new("a", "a"), 8);
        ring.remove_node(&NodeId::from("a"));
        assert_eq!(ring.node_count(), 0);
        assert_eq!(ring.token_count(), 0);
        ring.add_node(Node::new("a", "a"), 8);
        assert_eq!(ring.node_count(), 1);
        assert_eq!(ring.token_count(), 8);
    }

    #[test]
    fn lookup_is_deterministic() {
        let ring = HashRing::new();
        ring.add_node(Node::new("a", "a"), 16);
        ring.add_node(Node::new("b", "b"), 16);
        let first = ring.lookup(b"stable-key");
        for _ in 0..10 {
            assert_eq!(ring.lookup(b"stable-key"), first);
        }
    }

    #[test]
    fn lookup_n_starts_with_owner_and_has_no_duplicates() {
        let ring = HashRing::new();
        ring.add_node(Node::new("a", "a"), 16);
        ring.add_node(Node::new("b", "b"), 16);
        ring.add_node(Node::new("c", "c"), 16);

        let owner = ring.lookup(b"key").unwrap();
        let owners = ring.lookup_n(b"key", 3);

        assert_eq!(owners[0], owner);
        assert_eq!(owners.len(), 3);
        let unique: std::collections::HashSet<_> = owners.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn ring_size_equals_vnodes_times_nodes() {
        let ring = HashRing::new();
        ring.add_node(Node::new("a", "a"), 50);
        ring.add_node(Node::new("b", "b"), 50);
        ring.add_node(Node::new("c", "c"), 50);
        assert_eq!(ring.token_count(), 150);
    }

    #[test]
    fn builder_mixed_vnodes() {
        let ring = RingBuilder::new()
            .with_vnodes(4)
            .add_node(Node::new("a", "a"))
            .add_node_with_vnodes(Node::new("b", "b"), 8)
            .build();
        assert_eq!(ring.node_count(), 2);
        assert_eq!(ring.token_count(), 12);
    }
}
