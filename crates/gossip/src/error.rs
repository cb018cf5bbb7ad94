//! Error type for the gossip crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GossipError {
    /// A peer's `/gossip` endpoint could not be reached within the
    /// outbound timeout, or responded with a non-2xx status.
    #[error("gossip delivery to {peer} failed: {source}")]
    Delivery {
        peer: String,
        #[source]
        source: reqwest::Error,
    },
}
