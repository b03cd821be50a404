//! # Backend and Resolver Errors
//!
//! Faults raised below the evidence layer. The evidence crate maps these
//! onto the uniform `ErrorKind` taxonomy at its operation boundary; this
//! crate only distinguishes the failure shapes.

use thiserror::Error;

use tessera_core::ReceiptInfo;

/// Faults from a ledger backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Building or submitting the transaction failed before a receipt
    /// could exist.
    #[error("transaction submission failed: {reason}")]
    Submit {
        /// Description of the submission failure.
        reason: String,
    },

    /// HTTP transport failure while talking to the gateway.
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        /// The gateway endpoint that failed.
        endpoint: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The gateway answered with a non-success HTTP status.
    #[error("gateway {endpoint} returned {status}: {body}")]
    Gateway {
        /// The gateway endpoint.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The receipt reports that execution failed on chain.
    #[error("transaction {} executed with failure status {status}", receipt.tx_hash)]
    TransactionFailed {
        /// Ledger-reported status value.
        status: String,
        /// The receipt of the failed transaction.
        receipt: ReceiptInfo,
    },

    /// Receipt polling exhausted its attempt bound.
    #[error("no receipt for {tx_hash} after {attempts} attempts ({waited_ms}ms)")]
    ReceiptTimeout {
        /// The transaction that never produced a receipt.
        tx_hash: String,
        /// Number of poll attempts made.
        attempts: u32,
        /// Total time spent waiting, in milliseconds.
        waited_ms: u64,
    },

    /// The receipt carried no decodable event list.
    #[error("event log undecodable: {reason}")]
    EventDecode {
        /// Why decoding failed.
        reason: String,
    },

    /// A gateway response did not have the expected shape.
    #[error("malformed gateway response: {reason}")]
    MalformedResponse {
        /// What was wrong with the response.
        reason: String,
    },

    /// Contract-location resolution failed.
    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

/// Faults from the address resolver capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// No location is registered under the requested name.
    #[error("no contract registered under {name:?}")]
    NotFound {
        /// The logical contract name that failed to resolve.
        name: String,
    },

    /// The lookup itself failed.
    #[error("contract lookup failed for {name:?}: {reason}")]
    Lookup {
        /// The logical contract name.
        name: String,
        /// Description of the lookup failure.
        reason: String,
    },
}
