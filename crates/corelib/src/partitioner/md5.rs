//! MD5 partitioner implementation — the only partitioner this ring uses.
//!
//! The spec pins the hash function as part of the wire contract between
//! independently implemented gateways (same key, same virtual-node input,
//! must land on the same 128-bit position everywhere). Offering pluggable
//! alternatives the way a single-process system like Cassandra can would
//! silently break cross-gateway ring agreement, so only one partitioner is
//! provided.

use crate::partitioner::traits::Partitioner;
use crate::token::md5::Md5Token;
use crate::token::Token;

/// MD5 partitioner: `position = big_endian_u128(md5(key))`.
#[derive(Clone, Debug, Default)]
pub struct Md5Partitioner;

impl Partitioner for Md5Partitioner {
    type TokenType = Md5Token;

    fn partition(&self, key: &[u8]) -> Self::TokenType {
        Md5Token::from_bytes(key)
    }

    fn min_token(&self) -> Self::TokenType {
        Md5Token::zero()
    }

    fn max_token(&self) -> Self::TokenType {
        <Md5Token as Token>::max()
    }

    fn name(&self) -> &'static str {
        "Md5Partitioner"
    }
}
