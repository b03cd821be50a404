//! # EvidenceRecord — Per-Signer Fold
//!
//! The ledger's read response is one row per historical event, not per
//! signer. [`EvidenceRecord::fold`] left-folds those rows in ledger order
//! into a per-signer aggregate, preserving first-seen signer order.
//!
//! ## Merge Rules
//!
//! For a signer already present in the map, a row:
//! - overwrites the stored signature only when the row's signature is
//!   non-empty (last-write-wins);
//! - appends its log entry when non-empty (logs only grow, never reorder);
//! - always overwrites the stored timestamp;
//! - touches the revoked flag only per the active
//!   [`RevocationMergePolicy`].
//!
//! A first-seen signer seeds a fresh attestation from the row as-is.

use serde::Serialize;

use tessera_core::{EvidenceHash, SignerAddress};
use tessera_ledger::{EvidenceLog, LogRow};

/// How revoke rows merge into an already-seen signer's attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevocationMergePolicy {
    /// Only the first-seen row for a signer seeds the revoked flag; later
    /// rows never change it.
    #[default]
    FirstSeen,
    /// Every row carrying a revoked value overwrites the flag, so the
    /// latest revoke event wins.
    LatestEvent,
}

/// One signer's merged attestation state for one hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attestation {
    /// Latest non-empty signature seen for the signer.
    pub signature: String,
    /// Every non-empty log entry, in ledger order.
    pub logs: Vec<String>,
    /// Timestamp of the signer's latest event, integer seconds.
    pub timestamp: i64,
    /// Revoked flag, unset when no merged row carried one.
    pub revoked: Option<bool>,
}

/// The per-signer aggregate snapshot for one evidence hash.
///
/// Signers keep first-seen order, which is ledger commit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceRecord {
    /// The content hash the record is keyed by.
    pub hash: EvidenceHash,
    attestations: Vec<(SignerAddress, Attestation)>,
}

impl EvidenceRecord {
    /// Fold a flat event log into a per-signer record.
    pub fn fold(hash: EvidenceHash, log: &EvidenceLog, policy: RevocationMergePolicy) -> Self {
        let mut record = Self {
            hash,
            attestations: Vec::new(),
        };
        for row in log.rows() {
            record.merge(row, policy);
        }
        record
    }

    fn merge(&mut self, row: LogRow, policy: RevocationMergePolicy) {
        match self
            .attestations
            .iter_mut()
            .find(|(signer, _)| *signer == row.signer)
        {
            Some((_, at)) => {
                if !row.signature.is_empty() {
                    at.signature = row.signature;
                }
                if !row.log.is_empty() {
                    at.logs.push(row.log);
                }
                at.timestamp = row.timestamp;
                if policy == RevocationMergePolicy::LatestEvent {
                    if let Some(stage) = row.revoked {
                        at.revoked = Some(stage);
                    }
                }
            }
            None => {
                let logs = if row.log.is_empty() {
                    Vec::new()
                } else {
                    vec![row.log]
                };
                self.attestations.push((
                    row.signer,
                    Attestation {
                        signature: row.signature,
                        logs,
                        timestamp: row.timestamp,
                        revoked: row.revoked,
                    },
                ));
            }
        }
    }

    /// The merged attestation for a signer, if any.
    pub fn attestation(&self, signer: &SignerAddress) -> Option<&Attestation> {
        self.attestations
            .iter()
            .find(|(s, _)| s == signer)
            .map(|(_, at)| at)
    }

    /// Signers in first-seen order.
    pub fn signers(&self) -> impl Iterator<Item = &SignerAddress> {
        self.attestations.iter().map(|(s, _)| s)
    }

    /// Iterate all attestations in first-seen signer order.
    pub fn iter(&self) -> impl Iterator<Item = (&SignerAddress, &Attestation)> {
        self.attestations.iter().map(|(s, at)| (s, at))
    }

    /// Number of distinct signers.
    pub fn len(&self) -> usize {
        self.attestations.len()
    }

    /// Whether no signer has attested.
    pub fn is_empty(&self) -> bool {
        self.attestations.is_empty()
    }
}
