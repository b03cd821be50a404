//! # tessera-cli — Evidence Ledger Command-Line Interface
//!
//! ## Subcommands
//!
//! - `create` — Notarize a content hash, optionally binding an alias
//! - `get` — Read and fold a record, by hash or alias
//! - `add-log` — Append a signature/log sample to a record
//! - `set-attribute` — Record a key/value sample for the signer
//! - `revoke` — Set or clear the signer's revoked flag
//! - `resolve-key` — Resolve an alias to its bound hash
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to `tessera-evidence` — no ledger logic here.
//! - All results print as JSON on stdout; diagnostics go to stderr
//!   through `tracing`.

pub mod attribute;
pub mod context;
pub mod create;
pub mod log;
pub mod read;
pub mod revoke;
