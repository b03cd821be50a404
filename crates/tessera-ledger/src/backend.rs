//! # EvidenceBackend Capability
//!
//! The create/append/revoke/read operations against the ledger's
//! evidence contract, version-dialect hidden behind one trait.
//!
//! ## Outcome Detection Contract
//!
//! Write methods return the decoded event list alongside the receipt.
//! The evidence layer derives the outcome from the events, never from
//! receipt status alone:
//!
//! - `Err(BackendError::EventDecode)` — the receipt carried no decodable
//!   event list at all (ledger error);
//! - `Ok` with an empty event list — the contract filtered the call
//!   (create collided, or a mutation referenced a missing record);
//! - `Ok` with events — success, subject to signer/signature matching.
//!
//! Implementations must be `Send + Sync` so a handle can be shared
//! behind an `Arc` and swapped wholesale on reload.

use serde::{Deserialize, Serialize};

use tessera_core::{CustomKey, EvidenceHash, ReceiptInfo, SignerAddress};
use tessera_crypto::LedgerKeyPair;

use crate::error::BackendError;

/// One creation event emitted by the evidence contract.
///
/// The hash travels as the raw string decoded from the event so batch
/// reconciliation can compare it case-insensitively against the
/// submitted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationEvent {
    /// Hash of the record the contract created.
    pub hash: String,
    /// Signer recorded for the creation.
    pub signer: SignerAddress,
    /// Signature recorded for the creation.
    pub signature: String,
}

/// One attribute-change event (log append or extra attribute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEvent {
    /// Signer whose attestation changed.
    pub signer: SignerAddress,
}

/// One revocation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeEvent {
    /// Signer whose revoked flag was set.
    pub signer: SignerAddress,
    /// The stage the flag was set to.
    pub stage: bool,
}

/// Decoded events plus the receipt they were decoded from.
#[derive(Debug, Clone)]
pub struct TxEvents<E> {
    /// Events emitted by the transaction, in emission order.
    pub events: Vec<E>,
    /// Receipt metadata, passed through uninterpreted.
    pub receipt: ReceiptInfo,
}

/// A create submission: parallel sequences, one index per evidence item.
///
/// The writer guarantees all sequences have equal length before this
/// reaches a backend; `custom_keys`, when present, matches too.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    /// Content hashes to create records for.
    pub hashes: Vec<EvidenceHash>,
    /// Signer address per item.
    pub signers: Vec<SignerAddress>,
    /// Signature per item.
    pub signatures: Vec<String>,
    /// Initial log entry per item (may be empty strings).
    pub logs: Vec<String>,
    /// Timestamp per item, integer seconds.
    pub timestamps: Vec<i64>,
    /// Alias per item, for the with-key variant.
    pub custom_keys: Option<Vec<String>>,
}

impl CreateRequest {
    /// Number of items in the request.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Whether the request carries no items.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// One row of the flat per-event read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    /// Signer the event belongs to.
    pub signer: SignerAddress,
    /// Signature recorded by the event (may be empty).
    pub signature: String,
    /// Log entry recorded by the event (may be empty).
    pub log: String,
    /// Event timestamp, integer seconds.
    pub timestamp: i64,
    /// Revoked flag carried by the event, unset for non-revocation rows.
    pub revoked: Option<bool>,
}

/// The read response: five equal-length parallel sequences, one row per
/// historical event (not per signer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceLog {
    /// Signer per event row.
    pub signers: Vec<SignerAddress>,
    /// Signature per event row.
    pub signatures: Vec<String>,
    /// Log entry per event row.
    pub logs: Vec<String>,
    /// Timestamp per event row.
    pub timestamps: Vec<i64>,
    /// Revoked flag per event row.
    pub revocations: Vec<Option<bool>>,
}

impl EvidenceLog {
    /// Number of event rows.
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// Whether the log holds no rows (the hash has no record).
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Whether all five sequences have equal length.
    pub fn is_rectangular(&self) -> bool {
        let n = self.signers.len();
        self.signatures.len() == n
            && self.logs.len() == n
            && self.timestamps.len() == n
            && self.revocations.len() == n
    }

    /// Iterate rows in ledger order.
    ///
    /// Precondition: `is_rectangular()`. The iterator stops at the
    /// shortest sequence otherwise.
    pub fn rows(&self) -> impl Iterator<Item = LogRow> + '_ {
        self.signers
            .iter()
            .zip(&self.signatures)
            .zip(&self.logs)
            .zip(&self.timestamps)
            .zip(&self.revocations)
            .map(|((((signer, signature), log), timestamp), revoked)| LogRow {
                signer: signer.clone(),
                signature: signature.clone(),
                log: log.clone(),
                timestamp: *timestamp,
                revoked: *revoked,
            })
    }

    /// Append one row, keeping the sequences parallel.
    pub fn push(&mut self, row: LogRow) {
        self.signers.push(row.signer);
        self.signatures.push(row.signature);
        self.logs.push(row.log);
        self.timestamps.push(row.timestamp);
        self.revocations.push(row.revoked);
    }
}

/// The ledger's evidence contract, dialect-hidden.
pub trait EvidenceBackend: Send + Sync {
    /// Submit a create transaction for one or more items.
    ///
    /// The contract emits one creation event per item it actually
    /// created, in submission order; items whose hash (or alias) already
    /// exists are filtered silently.
    fn create(
        &self,
        request: &CreateRequest,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<CreationEvent>, BackendError>;

    /// Append a signature/log sample onto an existing record.
    ///
    /// Empty event list means the record does not exist; append never
    /// creates.
    fn append_log(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        signature: &str,
        log: &str,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<AttributeEvent>, BackendError>;

    /// Append a signature/log sample, addressing the record through its
    /// bound alias as well as its hash.
    #[allow(clippy::too_many_arguments)]
    fn append_log_with_key(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        signature: &str,
        log: &str,
        timestamp: i64,
        custom_key: &CustomKey,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<AttributeEvent>, BackendError>;

    /// Record a free-form key/value attribute sample scoped to a signer.
    #[allow(clippy::too_many_arguments)]
    fn set_attribute(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        key: &str,
        value: &str,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<AttributeEvent>, BackendError>;

    /// Set (not toggle) the signer's revoked flag to `stage`.
    fn revoke(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        stage: bool,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<RevokeEvent>, BackendError>;

    /// Read the full event log for a hash.
    fn read(&self, hash: &EvidenceHash) -> Result<EvidenceLog, BackendError>;

    /// Resolve a bound alias to its hash, if any.
    fn resolve_key(&self, key: &CustomKey) -> Result<Option<EvidenceHash>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> SignerAddress {
        SignerAddress::new(&format!("0x{:040x}", n)).unwrap()
    }

    #[test]
    fn log_push_keeps_rows_parallel() {
        let mut log = EvidenceLog::default();
        log.push(LogRow {
            signer: addr(1),
            signature: "sig".into(),
            log: "entry".into(),
            timestamp: 100,
            revoked: None,
        });
        log.push(LogRow {
            signer: addr(1),
            signature: String::new(),
            log: String::new(),
            timestamp: 200,
            revoked: Some(true),
        });
        assert_eq!(log.len(), 2);
        assert!(log.is_rectangular());
        let rows: Vec<_> = log.rows().collect();
        assert_eq!(rows[1].revoked, Some(true));
        assert_eq!(rows[0].timestamp, 100);
    }

    #[test]
    fn ragged_log_detected() {
        let mut log = EvidenceLog::default();
        log.signers.push(addr(1));
        assert!(!log.is_rectangular());
    }
}
