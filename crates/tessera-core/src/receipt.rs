//! # Receipt Metadata
//!
//! The ledger's confirmation record for a submitted transaction, passed
//! through to callers uninterpreted for audit logging. This layer never
//! branches on receipt contents beyond the execution status; outcome
//! detection is event-driven.

use serde::{Deserialize, Serialize};

/// Opaque receipt metadata attached to write outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptInfo {
    /// Ledger transaction hash.
    pub tx_hash: String,
    /// Block the transaction was committed in, when known.
    pub block_number: Option<u64>,
    /// Position of the transaction within its block, when known.
    pub tx_index: Option<u64>,
}

impl ReceiptInfo {
    /// Receipt metadata carrying only a transaction hash.
    pub fn from_tx_hash(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            block_number: None,
            tx_index: None,
        }
    }
}
