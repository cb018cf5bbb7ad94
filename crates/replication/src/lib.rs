//! The multi-owner walk used to place replicas on the hash ring.
//!
//! This crate implements §4.1's `owners(key, count)` operation: given a key
//! and a replica count, walk clockwise from the key's ring position and
//! return up to `count` distinct node ids, primary first. No data is
//! actually replicated by this workspace (a non-goal of the system this
//! crate is part of) — this is placement math only, kept separate from
//! `corelib` because it is a policy layered on top of the ring rather than
//! part of the ring's own contract.

pub mod error;
pub mod strategy;

pub use error::ReplicationError;
pub use strategy::{ReplicationStrategy, SimpleStrategy};
