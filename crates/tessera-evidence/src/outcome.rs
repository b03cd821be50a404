//! # Write Outcomes
//!
//! Every write operation answers with a value, an [`ErrorKind`], and the
//! receipt metadata of the transaction that produced the answer. Receipts
//! are passed through uninterpreted for caller-side audit logging; the
//! kind is derived from the emitted events, never from receipt status
//! alone.

use serde::Serialize;

use tessera_core::{ErrorKind, ReceiptInfo};
use tessera_ledger::BackendError;

use crate::error::backend_kind;

/// Result of one write operation.
#[derive(Debug, Clone, Serialize)]
pub struct TxOutcome<T> {
    /// The operation's value, present only on success.
    pub value: Option<T>,
    /// Outcome bucket derived from the emitted events.
    pub kind: ErrorKind,
    /// Receipt of the transaction, when one was submitted.
    pub receipt: Option<ReceiptInfo>,
}

impl<T> TxOutcome<T> {
    /// A successful outcome carrying its value and receipt.
    pub fn success(value: T, receipt: ReceiptInfo) -> Self {
        Self {
            value: Some(value),
            kind: ErrorKind::Success,
            receipt: Some(receipt),
        }
    }

    /// A failed outcome with no value.
    pub fn failed(kind: ErrorKind, receipt: Option<ReceiptInfo>) -> Self {
        Self {
            value: None,
            kind,
            receipt,
        }
    }

    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        self.kind == ErrorKind::Success
    }
}

/// Result of one batch create: per-item booleans plus a whole-call status.
///
/// The status says whether the transaction executed at all; per-item
/// outcomes live in `results`, always the length of the submitted input.
/// Callers must inspect both.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// One flag per submitted item, in submission order.
    pub results: Vec<bool>,
    /// Whole-call status.
    pub status: ErrorKind,
    /// Receipt of the batch transaction, when one was submitted.
    pub receipt: Option<ReceiptInfo>,
}

impl BatchOutcome {
    /// An all-false outcome for `len` items that never reached the ledger
    /// or produced nothing on it.
    pub fn none_created(len: usize, status: ErrorKind, receipt: Option<ReceiptInfo>) -> Self {
        Self {
            results: vec![false; len],
            status,
            receipt,
        }
    }
}

/// Split a backend fault into its outcome kind and the receipt it
/// carries, if any.
pub(crate) fn failure_parts(e: &BackendError) -> (ErrorKind, Option<ReceiptInfo>) {
    let receipt = match e {
        BackendError::TransactionFailed { receipt, .. } => Some(receipt.clone()),
        _ => None,
    };
    (backend_kind(e), receipt)
}

/// Fold a backend fault into a failed outcome, keeping the receipt when
/// the fault carries one.
pub(crate) fn failed_from_backend<T>(e: &BackendError) -> TxOutcome<T> {
    let (kind, receipt) = failure_parts(e);
    TxOutcome::failed(kind, receipt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_failure_keeps_its_receipt() {
        let e = BackendError::TransactionFailed {
            status: "0x1a".into(),
            receipt: ReceiptInfo::from_tx_hash("0xfe"),
        };
        let out: TxOutcome<()> = failed_from_backend(&e);
        assert_eq!(out.kind, ErrorKind::TransactionExecution);
        assert_eq!(out.receipt.unwrap().tx_hash, "0xfe");
    }

    #[test]
    fn transport_failure_has_no_receipt() {
        let e = BackendError::Submit {
            reason: "x".into(),
        };
        let out: TxOutcome<()> = failed_from_backend(&e);
        assert_eq!(out.kind, ErrorKind::BaseError);
        assert!(out.receipt.is_none());
    }
}
