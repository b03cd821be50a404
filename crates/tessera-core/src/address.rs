//! # Signer Address — Ledger Account Newtype
//!
//! The on-ledger address derived from a signing key. Identifies who
//! produced an attestation. Addresses compare case-insensitively on
//! chain; the newtype lowercases at construction so plain `==` carries
//! that semantic.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of hex characters in an address body (20 bytes).
pub const ADDRESS_HEX_LEN: usize = 40;

/// A validated, lowercase-normalized ledger address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignerAddress(String);

impl SignerAddress {
    /// Validate and normalize an address string: `0x` + 40 hex characters.
    pub fn new(value: &str) -> Result<Self, CoreError> {
        let body = value.strip_prefix("0x").ok_or_else(|| CoreError::InvalidAddress {
            value: value.to_string(),
        })?;
        if body.len() != ADDRESS_HEX_LEN || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidAddress {
                value: value.to_string(),
            });
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// The normalized address string, including the `0x` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SignerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_normalizes() {
        let a = SignerAddress::new("0xAB03211ce587c675c099eba4Cac25B046e59e1a0").unwrap();
        assert_eq!(a.as_str(), "0xab03211ce587c675c099eba4cac25b046e59e1a0");
    }

    #[test]
    fn case_insensitive_equality() {
        let a = SignerAddress::new("0xab03211ce587c675c099eba4cac25b046e59e1a0").unwrap();
        let b = SignerAddress::new("0xAB03211CE587C675C099EBA4CAC25B046E59E1A0").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_malformed() {
        assert!(SignerAddress::new("").is_err());
        assert!(SignerAddress::new("0x123").is_err());
        assert!(SignerAddress::new("ab03211ce587c675c099eba4cac25b046e59e1a0").is_err());
    }
}
