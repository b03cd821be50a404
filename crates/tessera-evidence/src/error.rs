//! # Evidence Error Taxonomy
//!
//! Public operations never let a backend or codec fault escape untyped:
//! inputs are rejected before any network call as [`EvidenceError::IllegalInput`],
//! read-path misses surface as [`EvidenceError::NotExist`], and everything
//! the backend reports is either folded into an outcome kind (write path)
//! or carried through [`EvidenceError::Backend`] (read path).

use tessera_core::{CoreError, ErrorKind};
use tessera_ledger::BackendError;

/// Faults surfaced by public evidence operations.
#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    /// The input failed validation before any transaction was built.
    #[error("illegal input: {reason}")]
    IllegalInput {
        /// What was malformed.
        reason: String,
    },

    /// The referenced record or alias has no prior creation.
    #[error("no evidence record for {target}")]
    NotExist {
        /// The hash or alias that failed to resolve.
        target: String,
    },

    /// The backend faulted on a read or key resolution.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl EvidenceError {
    /// The taxonomy bucket this fault maps to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IllegalInput { .. } => ErrorKind::IllegalInput,
            Self::NotExist { .. } => ErrorKind::NotExist,
            Self::Backend(e) => backend_kind(e),
        }
    }
}

impl From<CoreError> for EvidenceError {
    fn from(e: CoreError) -> Self {
        Self::IllegalInput {
            reason: e.to_string(),
        }
    }
}

/// Map a backend fault into the taxonomy.
///
/// Receipt-level failures and poll exhaustion are execution errors; an
/// undecodable event list and every transport-shaped fault are ledger
/// errors.
pub(crate) fn backend_kind(e: &BackendError) -> ErrorKind {
    match e {
        BackendError::TransactionFailed { .. } | BackendError::ReceiptTimeout { .. } => {
            ErrorKind::TransactionExecution
        }
        BackendError::EventDecode { .. }
        | BackendError::Submit { .. }
        | BackendError::Transport { .. }
        | BackendError::Gateway { .. }
        | BackendError::MalformedResponse { .. }
        | BackendError::Resolver(_) => ErrorKind::BaseError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::ReceiptInfo;

    #[test]
    fn illegal_input_kind() {
        let e = EvidenceError::IllegalInput {
            reason: "bad hash".into(),
        };
        assert_eq!(e.kind(), ErrorKind::IllegalInput);
    }

    #[test]
    fn receipt_failures_are_execution_errors() {
        let e = BackendError::TransactionFailed {
            status: "0x16".into(),
            receipt: ReceiptInfo::from_tx_hash("0xab"),
        };
        assert_eq!(backend_kind(&e), ErrorKind::TransactionExecution);
        let e = BackendError::ReceiptTimeout {
            tx_hash: "0xab".into(),
            attempts: 30,
            waited_ms: 45_000,
        };
        assert_eq!(backend_kind(&e), ErrorKind::TransactionExecution);
    }

    #[test]
    fn undecodable_events_are_ledger_errors() {
        let e = BackendError::EventDecode {
            reason: "no events".into(),
        };
        assert_eq!(backend_kind(&e), ErrorKind::BaseError);
    }
}
