//! Duplicate suppression for inbound gossip (§4.2, §8 "gossip dedup").
//!
//! The reference design keeps every `message_id` ever seen, which grows
//! without bound (§9). This implementation caps it with an insertion-order
//! ring buffer: once `capacity` ids are recorded, inserting a new one
//! evicts the oldest. Eviction is by insertion order, not access order —
//! sufficient because a `message_id` is only ever looked up once, at the
//! moment a duplicate would be suppressed.

use std::collections::{HashSet, VecDeque};
use uuid::Uuid;

/// Default capacity, large enough to cover the in-flight gossip horizon of
/// a small-to-medium gateway fleet under normal churn.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// Bounded set of previously-seen gossip `message_id`s.
pub struct SeenSet {
    capacity: usize,
    members: HashSet<Uuid>,
    order: VecDeque<Uuid>,
}

impl SeenSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            members: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    /// Record `id` as seen.
    ///
    /// Returns `true` if this is the first time `id` has been observed
    /// (the caller should apply and re-broadcast the message), `false` if
    /// it is a duplicate (the caller should discard it silently).
    pub fn insert(&mut self, id: Uuid) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push_back(id);
        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
        true
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Default for SeenSet {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_reports_fresh() {
        let mut seen = SeenSet::default();
        let id = Uuid::new_v4();
        assert!(seen.insert(id));
    }

    #[test]
    fn replaying_same_id_is_suppressed() {
        let mut seen = SeenSet::default();
        let id = Uuid::new_v4();
        assert!(seen.insert(id));
        assert!(!seen.insert(id));
        assert!(!seen.insert(id));
    }

    #[test]
    fn eviction_bounds_memory() {
        let mut seen = SeenSet::new(4);
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            assert!(seen.insert(*id));
        }
        assert_eq!(seen.len(), 4);

        // Inserting a 5th evicts the oldest, so it can be seen again.
        let fifth = Uuid::new_v4();
        assert!(seen.insert(fifth));
        assert_eq!(seen.len(), 4);
        assert!(!seen.contains(&ids[0]));
        assert!(seen.insert(ids[0]));
    }
}
