//! # EvidenceReader — Read-Path Aggregation
//!
//! Every read re-queries the ledger and re-folds from current state;
//! there is no client-side cache. Successive reads may therefore observe
//! different snapshots as transactions land, but each individual read is
//! a consistent one.

use std::sync::Arc;

use tessera_core::{CustomKey, EvidenceHash};
use tessera_ledger::{BackendError, EvidenceBackend};

use crate::error::EvidenceError;
use crate::record::{EvidenceRecord, RevocationMergePolicy};

/// Read-side handle over one backend snapshot.
#[derive(Clone)]
pub struct EvidenceReader {
    backend: Arc<dyn EvidenceBackend>,
    policy: RevocationMergePolicy,
}

impl EvidenceReader {
    /// A reader with the default first-seen revocation merge policy.
    pub fn new(backend: Arc<dyn EvidenceBackend>) -> Self {
        Self::with_policy(backend, RevocationMergePolicy::default())
    }

    /// A reader with an explicit revocation merge policy.
    pub fn with_policy(backend: Arc<dyn EvidenceBackend>, policy: RevocationMergePolicy) -> Self {
        Self { backend, policy }
    }

    /// Read and fold the record for `hash`.
    ///
    /// An empty event log means the hash was never created and is
    /// reported as [`EvidenceError::NotExist`].
    pub fn get_info(&self, hash: &str) -> Result<EvidenceRecord, EvidenceError> {
        let hash = EvidenceHash::new(hash)?;
        self.fold_hash(hash)
    }

    /// Resolve `key` to its bound hash, then read and fold that record.
    pub fn get_info_by_custom_key(&self, key: &str) -> Result<EvidenceRecord, EvidenceError> {
        let hash = self.resolve(key)?;
        self.fold_hash(hash)
    }

    /// Expose the alias resolution directly.
    pub fn get_hash_by_custom_key(&self, key: &str) -> Result<EvidenceHash, EvidenceError> {
        self.resolve(key)
    }

    fn resolve(&self, key: &str) -> Result<EvidenceHash, EvidenceError> {
        let key = CustomKey::new(key)?;
        self.backend
            .resolve_key(&key)?
            .ok_or_else(|| EvidenceError::NotExist {
                target: key.as_str().to_string(),
            })
    }

    fn fold_hash(&self, hash: EvidenceHash) -> Result<EvidenceRecord, EvidenceError> {
        let log = self.backend.read(&hash)?;
        if log.is_empty() {
            return Err(EvidenceError::NotExist {
                target: hash.as_str().to_string(),
            });
        }
        if !log.is_rectangular() {
            return Err(BackendError::MalformedResponse {
                reason: "read tuple sequences have unequal lengths".to_string(),
            }
            .into());
        }
        Ok(EvidenceRecord::fold(hash, &log, self.policy))
    }
}
