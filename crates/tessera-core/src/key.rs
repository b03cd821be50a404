//! # Custom Key — Evidence Alias Newtype
//!
//! A human-chosen alias bound once, immutably, to an evidence hash at
//! creation time. The ledger maintains the key-to-hash index; this type
//! only enforces the client-side shape: non-empty, non-blank text.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A validated evidence alias.
///
/// Rust strings are always valid UTF-8, so the only client-side check is
/// that the key carries visible content. Whitespace-only keys are
/// rejected: they would be indistinguishable from "no key" in the ledger
/// index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomKey(String);

impl CustomKey {
    /// Validate an alias string.
    pub fn new(value: &str) -> Result<Self, CoreError> {
        if value.trim().is_empty() {
            return Err(CoreError::InvalidKey {
                reason: "custom key must not be empty or blank".to_string(),
            });
        }
        Ok(Self(value.to_string()))
    }

    /// The alias text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
