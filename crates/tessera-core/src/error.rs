//! # Error Taxonomy
//!
//! Defines `CoreError` for validation failures in this crate and the
//! uniform `ErrorKind` taxonomy that every evidence operation maps its
//! outcome onto. All errors use `thiserror` for derive-based `Display`
//! and `Error` implementations.
//!
//! ## Taxonomy
//!
//! | Kind                     | Meaning                                          |
//! |--------------------------|--------------------------------------------------|
//! | `Success`                | Operation committed and its event was observed.  |
//! | `IllegalInput`           | Malformed hash or empty key, caught pre-network. |
//! | `AlreadyExists`          | Create collided: empty creation-event list.      |
//! | `NotExist`               | Mutation targeted a record never created.        |
//! | `BaseError`              | Event list undecodable or unexpected fault.      |
//! | `TransactionExecution`   | Receipt failed or polling exceeded its bound.    |
//! | `Unknown`                | Events present but none matched the submission.  |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures for the core newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The hash string is not `0x` + 64 hex characters.
    #[error("invalid evidence hash: {value:?}")]
    InvalidHash {
        /// The rejected input.
        value: String,
    },

    /// The custom key is empty or whitespace-only.
    #[error("invalid custom key: {reason}")]
    InvalidKey {
        /// Why the key was rejected.
        reason: String,
    },

    /// The address string is not `0x` + 40 hex characters.
    #[error("invalid signer address: {value:?}")]
    InvalidAddress {
        /// The rejected input.
        value: String,
    },
}

/// The uniform outcome classification for evidence operations.
///
/// Expected ledger outcomes (duplicates, missing records) are kinds here,
/// not panics. Batch operations additionally carry a per-item boolean
/// vector; the kind reports the whole-call outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The transaction executed and the expected event was emitted.
    Success,
    /// Input rejected before any network call.
    IllegalInput,
    /// A create call collided with an existing record or bound key.
    AlreadyExists,
    /// A mutation referenced a hash with no prior creation.
    NotExist,
    /// Ledger-side fault: no decodable event list, or an unexpected
    /// failure while building or submitting the call.
    BaseError,
    /// The receipt reported failure, or receipt polling exhausted its
    /// attempt bound.
    TransactionExecution,
    /// None of the emitted events matched the submitted signer and
    /// signature.
    Unknown,
}

impl ErrorKind {
    /// Whether this kind represents a committed, observed success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Success => "SUCCESS",
            Self::IllegalInput => "ILLEGAL_INPUT",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::NotExist => "NOT_EXIST",
            Self::BaseError => "BASE_ERROR",
            Self::TransactionExecution => "TRANSACTION_EXECUTION_ERROR",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
