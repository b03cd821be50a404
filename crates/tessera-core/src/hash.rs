//! # Evidence Hash — Validated Content-Hash Newtype
//!
//! The canonical identifier of an evidence record: a `0x`-prefixed,
//! 64-character hex string (a 32-byte content hash). Validation happens
//! once, at construction; everything past this type operates on a hash
//! known to be well-formed.
//!
//! ## Security Invariant
//!
//! A malformed hash must never reach the ledger. `EvidenceHash::new()` is
//! the single gate: operations that accept caller-supplied hash strings
//! construct an `EvidenceHash` first and convert failure into
//! `ErrorKind::IllegalInput` before any network call.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Required prefix for a hash string.
pub const HASH_PREFIX: &str = "0x";

/// Number of hex characters in the hash body (32 bytes).
pub const HASH_HEX_LEN: usize = 64;

/// A validated, lowercase-normalized evidence content hash.
///
/// Equality is case-insensitive by construction: the hex body is
/// lowercased in `new()`, so two hashes differing only in case compare
/// equal once both pass through the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceHash(String);

impl EvidenceHash {
    /// Validate and normalize a hash string.
    ///
    /// Accepts exactly `0x` followed by 64 hex characters of either case.
    /// Anything else is rejected with `CoreError::InvalidHash`.
    pub fn new(value: &str) -> Result<Self, CoreError> {
        if !Self::is_valid(value) {
            return Err(CoreError::InvalidHash {
                value: value.to_string(),
            });
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// The canonical-format check: `0x` + 64 hex characters.
    ///
    /// Malformed prefix, wrong length, and non-hex characters each
    /// independently fail.
    pub fn is_valid(value: &str) -> bool {
        let Some(body) = value.strip_prefix(HASH_PREFIX) else {
            return false;
        };
        body.len() == HASH_HEX_LEN && body.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// The normalized hash string, including the `0x` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the hex body into the raw 32-byte hash.
    pub fn to_bytes(&self) -> [u8; 32] {
        let body = self.0.as_bytes();
        let mut out = [0u8; 32];
        for (i, slot) in out.iter_mut().enumerate() {
            // Construction guarantees 2 + 64 ASCII hex characters.
            let hi = hex_val(body[2 + i * 2]);
            let lo = hex_val(body[3 + i * 2]);
            *slot = (hi << 4) | lo;
        }
        out
    }

    /// Re-encode raw 32 bytes into the canonical `0x`-hex string form.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let mut s = String::with_capacity(2 + HASH_HEX_LEN);
        s.push_str(HASH_PREFIX);
        for b in bytes {
            s.push_str(&format!("{b:02x}"));
        }
        Self(s)
    }
}

fn hex_val(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        // Uppercase never survives construction, but decode it anyway.
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

impl std::fmt::Display for EvidenceHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for EvidenceHash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GOOD: &str = "0xa02f2c6e43d3c2d8a0a2e1a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6";

    #[test]
    fn accepts_canonical_hash() {
        let h = EvidenceHash::new(GOOD).unwrap();
        assert_eq!(h.as_str(), GOOD);
    }

    #[test]
    fn normalizes_uppercase_hex() {
        let upper = GOOD.to_ascii_uppercase().replace("0X", "0x");
        let h = EvidenceHash::new(&upper).unwrap();
        assert_eq!(h, EvidenceHash::new(GOOD).unwrap());
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(!EvidenceHash::is_valid(&GOOD[2..]));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!EvidenceHash::is_valid(&GOOD[..GOOD.len() - 1]));
        assert!(!EvidenceHash::is_valid(&format!("{GOOD}ab")));
    }

    #[test]
    fn rejects_non_hex_character() {
        let bad = format!("0xzz{}", &GOOD[4..]);
        assert!(!EvidenceHash::is_valid(&bad));
    }

    #[test]
    fn rejects_empty() {
        assert!(!EvidenceHash::is_valid(""));
        assert!(!EvidenceHash::is_valid("0x"));
    }

    #[test]
    fn round_trips_through_bytes() {
        let h = EvidenceHash::new(GOOD).unwrap();
        assert_eq!(EvidenceHash::from_bytes(&h.to_bytes()), h);
    }

    proptest! {
        #[test]
        fn valid_iff_exact_format(s in "\\PC*") {
            let expected = s.len() == 66
                && s.starts_with("0x")
                && s[2..].bytes().all(|b| b.is_ascii_hexdigit());
            prop_assert_eq!(EvidenceHash::is_valid(&s), expected);
        }

        #[test]
        fn any_valid_hex_body_accepted(body in "[0-9a-fA-F]{64}") {
            let candidate = format!("0x{}", body);
            prop_assert!(EvidenceHash::is_valid(&candidate));
        }
    }
}
