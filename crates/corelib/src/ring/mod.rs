//! Consistent hash ring implementation.
//!
//! The ring manages virtual-node positions and provides efficient lookup
//! operations for finding nodes responsible for keys. See `crate::topology`
//! for a read-only inspection view built on top of a ring.

pub mod ring;

pub use ring::{HashRing, RingBuilder};

/// Alias for the main ring type (used by lib.rs).
pub type Ring = HashRing;
