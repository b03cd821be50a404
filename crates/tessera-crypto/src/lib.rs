//! # tessera-crypto — Signing Primitives
//!
//! The narrow cryptographic interface the evidence layer consumes:
//! an Ed25519 key wrapper, deterministic signer-address derivation, and
//! detached signature production. Key derivation schemes, DID documents,
//! and credential proofs live outside this workspace.
//!
//! ## Security Invariant
//!
//! - Private key material is never serialized or logged. `LedgerKeyPair`
//!   does not implement `Serialize` or `Debug`-print its seed.
//! - Seed buffers are zeroized on drop.

pub mod signing;

pub use signing::{CryptoError, LedgerKeyPair};
