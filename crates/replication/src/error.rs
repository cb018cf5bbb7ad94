//! Error type for the replication crate.

use thiserror::Error;

/// Errors surfaced while computing a replica placement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplicationError {
    /// `replicas_for_key` was asked for a placement against an empty ring.
    #[error("no nodes in the ring")]
    EmptyRing,
}
