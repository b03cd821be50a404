//! # tessera-evidence — Evidence Ledger Core
//!
//! Client-side notarization over an append-only ledger: record, extend,
//! alias, and revoke tamper-evident attestations keyed by content hash.
//!
//! - [`writer::EvidenceWriter`] — write-path orchestration; outcomes are
//!   derived from emitted events, never from receipt status alone.
//! - [`reconcile`] — order-preserving attribution of batch creation
//!   events back to the caller's original positions.
//! - [`reader::EvidenceReader`] — one read call, one fold: the flat
//!   per-event log becomes a per-signer [`record::EvidenceRecord`].
//! - [`service::EvidenceService`] — owns the backend snapshot and the
//!   wholesale-swap `reload`.
//!
//! Expected ledger outcomes (duplicate creates, missing records) are
//! [`tessera_core::ErrorKind`] values, not errors; `Err` is reserved for
//! rejected input and read-path faults.

pub mod error;
pub mod outcome;
pub mod reader;
pub mod reconcile;
pub mod record;
pub mod service;
pub mod writer;

pub use error::EvidenceError;
pub use outcome::{BatchOutcome, TxOutcome};
pub use reader::EvidenceReader;
pub use reconcile::reconcile;
pub use record::{Attestation, EvidenceRecord, RevocationMergePolicy};
pub use service::EvidenceService;
pub use writer::EvidenceWriter;
