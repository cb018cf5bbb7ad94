//! Error type for the two-hop routed client (§4.4, §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The gateway lookup (`owner_of`) failed outright: transport error or
    /// a non-2xx/404 status other than ring-empty.
    #[error("gateway lookup failed: {0}")]
    Lookup(String),

    /// `owner_of` returned 404 because the ring has no live nodes (§7.3).
    #[error("ring is empty")]
    RingEmpty,

    /// The storage node reported the key absent (§7.2: a *possible* miss,
    /// not a guaranteed one, during churn).
    #[error("key not found")]
    NotFound,

    /// A transport-level failure talking to the storage node directly.
    #[error("storage node request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The storage node responded with a status this client doesn't treat
    /// as success or not-found (§7: "a 500 from a storage node SHOULD be
    /// treated by the client as a failure without retry").
    #[error("storage node returned status {0}")]
    StorageNode(reqwest::StatusCode),
}
