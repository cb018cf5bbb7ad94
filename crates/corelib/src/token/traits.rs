//! Core token trait definition.

use std::fmt::Debug;
use std::hash::Hash;

/// Represents a position token on the hash ring.
///
/// Tokens are immutable values that represent positions in the 128-bit
/// token space. They must be:
/// - **Comparable**: to determine ordering on the ring
/// - **Hashable**: for efficient lookups and storage
/// - **Thread-safe**: for concurrent access patterns
///
/// Tokens are meant to be stable, owned values that can safely live anywhere
/// (in maps, across threads) without lifetime headaches.
pub trait Token: Copy + Clone + Debug + Eq + Ord + Hash + Send + Sync + 'static {
    /// The minimum token value (position zero).
    fn zero() -> Self;

    /// The maximum representable token value.
    fn max() -> Self;

    /// Whether this token is the minimum value.
    fn is_zero(&self) -> bool;

    /// Whether this token is the maximum value.
    fn is_max(&self) -> bool;

    /// Clockwise distance from `self` to `other`, wrapping past `max()`.
    fn distance_to(&self, other: &Self) -> Self;
}
