//! The gossip protocol that propagates heartbeat observations between peer
//! gateways (§4.2, §6, §9).
//!
//! This crate is transport-agnostic plumbing plus one HTTP delivery helper:
//! the [`Message`] envelope, a bounded [`SeenSet`] for duplicate
//! suppression, and a [`GossipSender`] for best-effort concurrent fan-out
//! to a peer list. The gateway crate owns the inbound HTTP handler and the
//! decision of whether to add a gossiped node to the ring.

pub mod error;
pub mod message;
pub mod seen_set;
pub mod sender;

pub use error::GossipError;
pub use message::{HeartbeatData, Message};
pub use seen_set::SeenSet;
pub use sender::GossipSender;
