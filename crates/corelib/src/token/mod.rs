//! Token abstraction module for consistent hashing.
//!
//! Tokens represent positions on the hash ring and must be comparable,
//! hashable, and thread-safe. The ring ships a single concrete token type,
//! [`md5::Md5Token`], because the wire contract (§3 of the spec this crate
//! implements) pins the hash function: two independently implemented
//! gateways must derive the same ring from the same node set, which only
//! holds if every participant hashes keys and virtual-node identifiers the
//! same way.

pub mod md5;
pub mod traits;

pub use md5::Md5Token;
pub use traits::Token;
