//! MD5-derived 128-bit ring token.
//!
//! MD5 is used for distribution uniformity, not as a security primitive: the
//! contract that matters is that keys and virtual-node identifiers are
//! hashed with the *same* function into the *same* 128-bit position space,
//! so that two independently implemented gateways compute the same ring for
//! the same node set.

use super::traits::Token;
use std::fmt;

/// A 128-bit position on the hash ring, derived from the first 16 bytes of
/// an MD5 digest interpreted as a big-endian unsigned integer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Md5Token(pub u128);

impl Token for Md5Token {
    fn zero() -> Self {
        Md5Token(0)
    }

    fn max() -> Self {
        Md5Token(u128::MAX)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn is_max(&self) -> bool {
        self.0 == u128::MAX
    }

    fn distance_to(&self, other: &Self) -> Self {
        if other.0 >= self.0 {
            Md5Token(other.0 - self.0)
        } else {
            Md5Token((u128::MAX - self.0) + other.0 + 1)
        }
    }
}

impl Md5Token {
    /// Hashes an arbitrary byte slice into a ring position.
    pub fn from_bytes(data: &[u8]) -> Self {
        let digest = md5::compute(data);
        Md5Token(u128::from_be_bytes(*digest))
    }

    /// Hashes a UTF-8 key into a ring position.
    pub fn from_key(key: &str) -> Self {
        Self::from_bytes(key.as_bytes())
    }
}

impl fmt::Display for Md5Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_token() {
        assert_eq!(Md5Token::from_key("hello"), Md5Token::from_key("hello"));
    }

    #[test]
    fn different_keys_usually_differ() {
        assert_ne!(Md5Token::from_key("hello"), Md5Token::from_key("world"));
    }

    #[test]
    fn virtual_node_separator_matters() {
        // "node:1" must not collide with "node1" or "node:10"'s prefix.
        assert_ne!(Md5Token::from_key("node:1"), Md5Token::from_key("node1"));
        assert_ne!(Md5Token::from_key("node:1"), Md5Token::from_key("node:10"));
    }

    #[test]
    fn distance_wraps() {
        let a = Md5Token(u128::MAX - 5);
        let b = Md5Token(5);
        // 6 to reach max, then 6 more (0..=5) = 11
        assert_eq!(a.distance_to(&b), Md5Token(11));
    }
}
