//! # EvidenceService — Backend Snapshot Ownership
//!
//! The only shared mutable client-side state in this layer is the
//! resolved backend handle. The service owns it behind a lock and hands
//! out writers and readers bound to the snapshot current at that moment.
//!
//! `reload` swaps the handle wholesale, never in place: in-flight calls
//! keep the handle they captured, and only operations started after the
//! swap see the re-resolved contract location.

use std::sync::Arc;

use parking_lot::RwLock;

use tessera_ledger::{open_backend, AddressResolver, EvidenceBackend, LedgerConfig};

use crate::error::EvidenceError;
use crate::reader::EvidenceReader;
use crate::record::RevocationMergePolicy;
use crate::writer::EvidenceWriter;

/// Owner of the current backend snapshot.
pub struct EvidenceService {
    config: LedgerConfig,
    resolver: Arc<dyn AddressResolver>,
    backend: RwLock<Arc<dyn EvidenceBackend>>,
    policy: RevocationMergePolicy,
}

impl EvidenceService {
    /// Resolve the contract location and open the configured backend.
    pub fn open(
        config: LedgerConfig,
        resolver: Arc<dyn AddressResolver>,
    ) -> Result<Self, EvidenceError> {
        let backend = open_backend(&config, resolver.as_ref())?;
        Ok(Self {
            config,
            resolver,
            backend: RwLock::new(backend),
            policy: RevocationMergePolicy::default(),
        })
    }

    /// A service over an already-built backend handle. Reload re-opens
    /// from the held configuration, so this is mostly for tests and
    /// embedded setups.
    pub fn from_backend(
        config: LedgerConfig,
        resolver: Arc<dyn AddressResolver>,
        backend: Arc<dyn EvidenceBackend>,
    ) -> Self {
        Self {
            config,
            resolver,
            backend: RwLock::new(backend),
            policy: RevocationMergePolicy::default(),
        }
    }

    /// Use the given revocation merge policy for readers handed out from
    /// now on.
    pub fn with_revocation_policy(mut self, policy: RevocationMergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The current backend snapshot.
    pub fn backend(&self) -> Arc<dyn EvidenceBackend> {
        self.backend.read().clone()
    }

    /// A writer bound to the current snapshot.
    pub fn writer(&self) -> EvidenceWriter {
        EvidenceWriter::new(self.backend())
    }

    /// A reader bound to the current snapshot.
    pub fn reader(&self) -> EvidenceReader {
        EvidenceReader::with_policy(self.backend(), self.policy)
    }

    /// Invalidate the resolver cache, re-resolve, and swap the backend
    /// handle. Fails without touching the current handle if the reopen
    /// fails.
    pub fn reload(&self) -> Result<(), EvidenceError> {
        self.resolver.invalidate();
        let fresh = open_backend(&self.config, self.resolver.as_ref())?;
        *self.backend.write() = fresh;
        tracing::info!(group = %self.config.group, "evidence backend reloaded");
        Ok(())
    }
}
