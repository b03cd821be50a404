//! # tessera-core — Foundational Types for the Tessera Evidence Ledger
//!
//! This crate is the leaf of the workspace DAG. It defines the validated
//! newtypes and the uniform error-kind taxonomy every other crate builds on.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `EvidenceHash`,
//!    `CustomKey`, `SignerAddress` — all newtypes with validated
//!    constructors. No bare strings for identifiers past the crate
//!    boundary: a malformed hash is rejected before any transaction is
//!    built, so zero gas is ever spent on bad input.
//!
//! 2. **Case normalization at construction.** Ledger hashes and addresses
//!    compare case-insensitively on chain; both newtypes lowercase their
//!    hex at the boundary so `==` is the case-insensitive comparison.
//!
//! 3. **One `ErrorKind` taxonomy.** Every backend fault, duplicate
//!    collision, and missing record maps onto the same small enum, so
//!    callers switch on outcome kind rather than on error string contents.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tessera-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod error;
pub mod hash;
pub mod key;
pub mod receipt;

pub use address::SignerAddress;
pub use error::{CoreError, ErrorKind};
pub use hash::EvidenceHash;
pub use key::CustomKey;
pub use receipt::ReceiptInfo;
