//! # EvidenceWriter — Write-Path Orchestration
//!
//! Validates inputs before any transaction is built, submits through the
//! backend handle it captured at construction, and derives every outcome
//! from the emitted events rather than receipt status.
//!
//! ## Outcome Detection
//!
//! - backend fault while submitting, polling, or decoding — folded into
//!   the outcome kind, never an `Err`;
//! - empty event list — the contract filtered the call (`AlreadyExists`
//!   for creates, `NotExist` for mutations);
//! - an event matching the derived signer (and, for creates, the
//!   submitted signature) — `Success`;
//! - events present but none matching — `Unknown`.
//!
//! `Err` is reserved for inputs rejected before the network is touched.

use std::sync::Arc;

use tessera_core::{CustomKey, ErrorKind, EvidenceHash, SignerAddress};
use tessera_crypto::LedgerKeyPair;
use tessera_ledger::{CreateRequest, EvidenceBackend};

use crate::error::EvidenceError;
use crate::outcome::{failed_from_backend, failure_parts, BatchOutcome, TxOutcome};
use crate::reconcile::reconcile;

/// Write-side handle over one backend snapshot.
#[derive(Clone)]
pub struct EvidenceWriter {
    backend: Arc<dyn EvidenceBackend>,
}

impl EvidenceWriter {
    /// A writer over the given backend handle.
    pub fn new(backend: Arc<dyn EvidenceBackend>) -> Self {
        Self { backend }
    }

    /// Create an evidence record for `hash`, signed by `signing`.
    pub fn create_evidence(
        &self,
        hash: &str,
        signature: &str,
        log: &str,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxOutcome<EvidenceHash>, EvidenceError> {
        self.create_one(hash, None, signature, log, timestamp, signing)
    }

    /// Create an evidence record and bind `custom_key` as its immutable
    /// alias. The same empty-event path signals the key or hash already
    /// in use.
    pub fn create_evidence_with_custom_key(
        &self,
        hash: &str,
        custom_key: &str,
        signature: &str,
        log: &str,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxOutcome<EvidenceHash>, EvidenceError> {
        let key = CustomKey::new(custom_key)?;
        self.create_one(hash, Some(key), signature, log, timestamp, signing)
    }

    fn create_one(
        &self,
        hash: &str,
        custom_key: Option<CustomKey>,
        signature: &str,
        log: &str,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxOutcome<EvidenceHash>, EvidenceError> {
        let hash = EvidenceHash::new(hash)?;
        let signer = signing.signer_address();
        let request = CreateRequest {
            hashes: vec![hash.clone()],
            signers: vec![signer.clone()],
            signatures: vec![signature.to_string()],
            logs: vec![log.to_string()],
            timestamps: vec![timestamp],
            custom_keys: custom_key.map(|k| vec![k.as_str().to_string()]),
        };
        let tx = match self.backend.create(&request, signing) {
            Ok(tx) => tx,
            Err(e) => return Ok(failed_from_backend(&e)),
        };
        if tx.events.is_empty() {
            tracing::debug!(hash = %hash, "create filtered: record or alias already exists");
            return Ok(TxOutcome::failed(
                ErrorKind::AlreadyExists,
                Some(tx.receipt),
            ));
        }
        let matched = tx
            .events
            .iter()
            .any(|ev| ev.signer == signer && ev.signature == signature);
        if matched {
            Ok(TxOutcome::success(hash, tx.receipt))
        } else {
            tracing::warn!(hash = %hash, "creation events matched neither signer nor signature");
            Ok(TxOutcome::failed(ErrorKind::Unknown, Some(tx.receipt)))
        }
    }

    /// Create records for a whole batch in one transaction.
    ///
    /// All input slices must have equal length; the result vector always
    /// does too. Indices whose hash fails validation are withheld from
    /// the transaction but keep their (false) position in the result.
    pub fn batch_create_evidence(
        &self,
        hashes: &[String],
        signers: &[SignerAddress],
        signatures: &[String],
        logs: &[String],
        timestamps: &[i64],
        signing: &LedgerKeyPair,
    ) -> Result<BatchOutcome, EvidenceError> {
        self.batch_create(hashes, signers, signatures, logs, timestamps, None, signing)
    }

    /// Batch create with one alias bound per item.
    #[allow(clippy::too_many_arguments)]
    pub fn batch_create_evidence_with_custom_key(
        &self,
        hashes: &[String],
        signers: &[SignerAddress],
        signatures: &[String],
        logs: &[String],
        timestamps: &[i64],
        custom_keys: &[String],
        signing: &LedgerKeyPair,
    ) -> Result<BatchOutcome, EvidenceError> {
        self.batch_create(
            hashes,
            signers,
            signatures,
            logs,
            timestamps,
            Some(custom_keys),
            signing,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn batch_create(
        &self,
        hashes: &[String],
        signers: &[SignerAddress],
        signatures: &[String],
        logs: &[String],
        timestamps: &[i64],
        custom_keys: Option<&[String]>,
        signing: &LedgerKeyPair,
    ) -> Result<BatchOutcome, EvidenceError> {
        let n = hashes.len();
        let rectangular = signers.len() == n
            && signatures.len() == n
            && logs.len() == n
            && timestamps.len() == n
            && custom_keys.map_or(true, |k| k.len() == n);
        if !rectangular {
            return Err(EvidenceError::IllegalInput {
                reason: "batch input sequences have unequal lengths".to_string(),
            });
        }

        // Reserve every original position; submit only the valid ones.
        let mut original: Vec<Option<EvidenceHash>> = Vec::with_capacity(n);
        let mut request = CreateRequest::default();
        if custom_keys.is_some() {
            request.custom_keys = Some(Vec::new());
        }
        for i in 0..n {
            match EvidenceHash::new(&hashes[i]) {
                Ok(hash) => {
                    request.hashes.push(hash.clone());
                    request.signers.push(signers[i].clone());
                    request.signatures.push(signatures[i].clone());
                    request.logs.push(logs[i].clone());
                    request.timestamps.push(timestamps[i]);
                    if let (Some(out), Some(keys)) = (&mut request.custom_keys, custom_keys) {
                        out.push(keys[i].clone());
                    }
                    original.push(Some(hash));
                }
                Err(_) => {
                    tracing::debug!(index = i, "batch item withheld: malformed hash");
                    original.push(None);
                }
            }
        }
        if request.is_empty() {
            return Ok(BatchOutcome::none_created(n, ErrorKind::IllegalInput, None));
        }

        let tx = match self.backend.create(&request, signing) {
            Ok(tx) => tx,
            Err(e) => {
                let (kind, receipt) = failure_parts(&e);
                return Ok(BatchOutcome::none_created(n, kind, receipt));
            }
        };
        if tx.events.is_empty() {
            // Nothing committed, or everything already existed; the
            // per-item vector cannot tell those apart.
            return Ok(BatchOutcome::none_created(
                n,
                ErrorKind::BaseError,
                Some(tx.receipt),
            ));
        }
        Ok(BatchOutcome {
            results: reconcile(&original, &tx.events),
            status: ErrorKind::Success,
            receipt: Some(tx.receipt),
        })
    }

    /// Append one signature/log sample onto an existing record. Never
    /// creates: an empty change-event list is `NotExist`.
    pub fn add_log(
        &self,
        hash: &str,
        signature: &str,
        log: &str,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxOutcome<()>, EvidenceError> {
        let hash = EvidenceHash::new(hash)?;
        let signer = signing.signer_address();
        let tx = match self
            .backend
            .append_log(&hash, &signer, signature, log, timestamp, signing)
        {
            Ok(tx) => tx,
            Err(e) => return Ok(failed_from_backend(&e)),
        };
        Ok(attribute_outcome(tx, &signer))
    }

    /// Append a signature/log sample addressing the record through its
    /// bound alias.
    pub fn add_log_by_custom_key(
        &self,
        custom_key: &str,
        signature: &str,
        log: &str,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxOutcome<()>, EvidenceError> {
        let key = CustomKey::new(custom_key)?;
        let hash = match self.backend.resolve_key(&key) {
            Ok(Some(hash)) => hash,
            Ok(None) => return Ok(TxOutcome::failed(ErrorKind::NotExist, None)),
            Err(e) => return Ok(failed_from_backend(&e)),
        };
        let signer = signing.signer_address();
        let tx = match self.backend.append_log_with_key(
            &hash, &signer, signature, log, timestamp, &key, signing,
        ) {
            Ok(tx) => tx,
            Err(e) => return Ok(failed_from_backend(&e)),
        };
        Ok(attribute_outcome(tx, &signer))
    }

    /// Record a free-form key/value attribute sample for the signer, an
    /// independent channel from logs.
    pub fn set_attribute(
        &self,
        hash: &str,
        key: &str,
        value: &str,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxOutcome<()>, EvidenceError> {
        if key.trim().is_empty() {
            return Err(EvidenceError::IllegalInput {
                reason: "attribute key is empty".to_string(),
            });
        }
        let hash = EvidenceHash::new(hash)?;
        let signer = signing.signer_address();
        let tx = match self
            .backend
            .set_attribute(&hash, &signer, key, value, timestamp, signing)
        {
            Ok(tx) => tx,
            Err(e) => return Ok(failed_from_backend(&e)),
        };
        Ok(attribute_outcome(tx, &signer))
    }

    /// Set (not toggle) the signer's revoked flag to `stage`. Repeated
    /// calls with the same stage are each accepted independently.
    pub fn revoke(
        &self,
        hash: &str,
        stage: bool,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxOutcome<()>, EvidenceError> {
        let hash = EvidenceHash::new(hash)?;
        let signer = signing.signer_address();
        let tx = match self
            .backend
            .revoke(&hash, &signer, stage, timestamp, signing)
        {
            Ok(tx) => tx,
            Err(e) => return Ok(failed_from_backend(&e)),
        };
        if tx.events.is_empty() {
            return Ok(TxOutcome::failed(ErrorKind::NotExist, Some(tx.receipt)));
        }
        let matched = tx
            .events
            .iter()
            .any(|ev| ev.signer == signer && ev.stage == stage);
        if matched {
            Ok(TxOutcome::success((), tx.receipt))
        } else {
            Ok(TxOutcome::failed(ErrorKind::Unknown, Some(tx.receipt)))
        }
    }
}

fn attribute_outcome(
    tx: tessera_ledger::TxEvents<tessera_ledger::AttributeEvent>,
    signer: &SignerAddress,
) -> TxOutcome<()> {
    if tx.events.is_empty() {
        return TxOutcome::failed(ErrorKind::NotExist, Some(tx.receipt));
    }
    if tx.events.iter().any(|ev| &ev.signer == signer) {
        TxOutcome::success((), tx.receipt)
    } else {
        TxOutcome::failed(ErrorKind::Unknown, Some(tx.receipt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_ledger::MemoryBackend;

    fn writer() -> (EvidenceWriter, LedgerKeyPair) {
        (
            EvidenceWriter::new(Arc::new(MemoryBackend::default())),
            LedgerKeyPair::generate(),
        )
    }

    fn hash(n: u8) -> String {
        format!("0x{:064x}", n)
    }

    #[test]
    fn create_then_duplicate() {
        let (w, key) = writer();
        let first = w.create_evidence(&hash(1), "sig", "log", 100, &key).unwrap();
        assert_eq!(first.kind, ErrorKind::Success);
        assert_eq!(first.value.unwrap().as_str(), hash(1));
        assert!(first.receipt.is_some());

        let second = w.create_evidence(&hash(1), "sig", "log", 200, &key).unwrap();
        assert_eq!(second.kind, ErrorKind::AlreadyExists);
        assert!(second.value.is_none());
    }

    #[test]
    fn malformed_hash_rejected_before_submit() {
        let (w, key) = writer();
        let err = w.create_evidence("0xzz", "sig", "", 1, &key).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalInput);
    }

    #[test]
    fn add_log_on_missing_record_is_not_exist() {
        let (w, key) = writer();
        let out = w.add_log(&hash(9), "sig", "log", 1, &key).unwrap();
        assert_eq!(out.kind, ErrorKind::NotExist);
    }

    #[test]
    fn revoke_both_stages_succeed_independently() {
        let (w, key) = writer();
        w.create_evidence(&hash(2), "sig", "", 1, &key).unwrap();
        let on = w.revoke(&hash(2), true, 10, &key).unwrap();
        let off = w.revoke(&hash(2), false, 20, &key).unwrap();
        assert_eq!(on.kind, ErrorKind::Success);
        assert_eq!(off.kind, ErrorKind::Success);
    }

    #[test]
    fn batch_length_mismatch_is_an_error() {
        let (w, key) = writer();
        let signer = key.signer_address();
        let err = w
            .batch_create_evidence(
                &[hash(1), hash(2)],
                &[signer],
                &["s".into(), "s".into()],
                &["".into(), "".into()],
                &[1, 2],
                &key,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalInput);
    }

    #[test]
    fn batch_reserves_invalid_and_duplicate_positions() {
        let (w, key) = writer();
        let signer = key.signer_address();
        let hashes = vec![hash(1), "not-a-hash".to_string(), hash(3), hash(1)];
        let signers = vec![signer.clone(), signer.clone(), signer.clone(), signer];
        let sigs = vec!["s".to_string(); 4];
        let logs = vec![String::new(); 4];
        let ts = vec![1, 2, 3, 4];
        let out = w
            .batch_create_evidence(&hashes, &signers, &sigs, &logs, &ts, &key)
            .unwrap();
        assert_eq!(out.results, vec![true, false, true, false]);
        assert_eq!(out.status, ErrorKind::Success);
        assert!(out.receipt.is_some());
    }

    #[test]
    fn batch_of_only_invalid_hashes_never_submits() {
        let (w, key) = writer();
        let signer = key.signer_address();
        let out = w
            .batch_create_evidence(
                &["nope".to_string()],
                &[signer],
                &["s".to_string()],
                &[String::new()],
                &[1],
                &key,
            )
            .unwrap();
        assert_eq!(out.results, vec![false]);
        assert_eq!(out.status, ErrorKind::IllegalInput);
        assert!(out.receipt.is_none());
    }

    #[test]
    fn custom_key_alias_reaches_the_record() {
        let (w, key) = writer();
        let created = w
            .create_evidence_with_custom_key(&hash(5), "invoice-77", "sig", "", 1, &key)
            .unwrap();
        assert_eq!(created.kind, ErrorKind::Success);

        let appended = w
            .add_log_by_custom_key("invoice-77", "sig2", "paid", 2, &key)
            .unwrap();
        assert_eq!(appended.kind, ErrorKind::Success);

        let missing = w
            .add_log_by_custom_key("no-such-key", "sig", "x", 3, &key)
            .unwrap();
        assert_eq!(missing.kind, ErrorKind::NotExist);
    }
}
