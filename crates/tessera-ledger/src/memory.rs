//! # In-Memory Reference Ledger
//!
//! A full rendition of the evidence contract's observable semantics,
//! backed by process memory. Tests and local development run against
//! this backend; it emits exactly the events the contract would.
//!
//! ## Fidelity Notes
//!
//! - Create filters existing hashes and already-bound aliases silently:
//!   no event is emitted for a filtered item. An empty event list on a
//!   non-empty submission is therefore how duplicates are observed.
//! - A record's log grows by one row per mutation in commit order;
//!   `read` returns the raw rows, never a per-signer aggregate.
//! - Revocation rows carry the stage; create and append rows leave the
//!   revoked flag unset.
//! - The ledger is append-only: no operation removes a record.

use std::collections::HashMap;

use parking_lot::Mutex;

use tessera_core::{CustomKey, EvidenceHash, ReceiptInfo, SignerAddress};
use tessera_crypto::LedgerKeyPair;

use crate::backend::{
    AttributeEvent, CreateRequest, CreationEvent, EvidenceBackend, EvidenceLog, LogRow,
    RevokeEvent, TxEvents,
};
use crate::error::BackendError;

/// One recorded extra-attribute sample (separate channel from logs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttribute {
    /// Record the attribute is scoped to.
    pub hash: EvidenceHash,
    /// Signer the attribute is scoped to.
    pub signer: SignerAddress,
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: String,
    /// Sample timestamp.
    pub timestamp: i64,
}

#[derive(Default)]
struct LedgerState {
    records: HashMap<EvidenceHash, EvidenceLog>,
    aliases: HashMap<String, EvidenceHash>,
    attributes: Vec<StoredAttribute>,
    committed: u64,
}

/// The in-memory evidence ledger.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<LedgerState>,
}

impl MemoryBackend {
    /// A fresh, empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded extra-attribute samples, in commit order.
    ///
    /// The contract exposes these through a channel the read tuple does
    /// not carry; tests use this accessor to observe them.
    pub fn attributes(&self) -> Vec<StoredAttribute> {
        self.state.lock().attributes.clone()
    }

    fn next_receipt(state: &mut LedgerState) -> ReceiptInfo {
        state.committed += 1;
        ReceiptInfo {
            tx_hash: format!("0x{:064x}", state.committed),
            block_number: Some(state.committed),
            tx_index: Some(0),
        }
    }
}

impl EvidenceBackend for MemoryBackend {
    fn create(
        &self,
        request: &CreateRequest,
        _signing: &LedgerKeyPair,
    ) -> Result<TxEvents<CreationEvent>, BackendError> {
        let mut state = self.state.lock();
        let mut events = Vec::new();
        for (i, hash) in request.hashes.iter().enumerate() {
            if state.records.contains_key(hash) {
                continue;
            }
            if let Some(keys) = &request.custom_keys {
                let alias = &keys[i];
                if !alias.is_empty() && state.aliases.contains_key(alias) {
                    continue;
                }
            }
            let mut log = EvidenceLog::default();
            log.push(LogRow {
                signer: request.signers[i].clone(),
                signature: request.signatures[i].clone(),
                log: request.logs[i].clone(),
                timestamp: request.timestamps[i],
                revoked: None,
            });
            state.records.insert(hash.clone(), log);
            if let Some(keys) = &request.custom_keys {
                let alias = &keys[i];
                if !alias.is_empty() {
                    state.aliases.insert(alias.clone(), hash.clone());
                }
            }
            events.push(CreationEvent {
                hash: hash.as_str().to_string(),
                signer: request.signers[i].clone(),
                signature: request.signatures[i].clone(),
            });
        }
        let receipt = Self::next_receipt(&mut state);
        Ok(TxEvents { events, receipt })
    }

    fn append_log(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        signature: &str,
        log: &str,
        timestamp: i64,
        _signing: &LedgerKeyPair,
    ) -> Result<TxEvents<AttributeEvent>, BackendError> {
        let mut state = self.state.lock();
        let mut events = Vec::new();
        if let Some(record) = state.records.get_mut(hash) {
            record.push(LogRow {
                signer: signer.clone(),
                signature: signature.to_string(),
                log: log.to_string(),
                timestamp,
                revoked: None,
            });
            events.push(AttributeEvent {
                signer: signer.clone(),
            });
        }
        let receipt = Self::next_receipt(&mut state);
        Ok(TxEvents { events, receipt })
    }

    fn append_log_with_key(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        signature: &str,
        log: &str,
        timestamp: i64,
        _custom_key: &CustomKey,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<AttributeEvent>, BackendError> {
        // The alias is resolution sugar; the stored row is identical.
        self.append_log(hash, signer, signature, log, timestamp, signing)
    }

    fn set_attribute(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        key: &str,
        value: &str,
        timestamp: i64,
        _signing: &LedgerKeyPair,
    ) -> Result<TxEvents<AttributeEvent>, BackendError> {
        let mut state = self.state.lock();
        let mut events = Vec::new();
        if state.records.contains_key(hash) {
            state.attributes.push(StoredAttribute {
                hash: hash.clone(),
                signer: signer.clone(),
                key: key.to_string(),
                value: value.to_string(),
                timestamp,
            });
            events.push(AttributeEvent {
                signer: signer.clone(),
            });
        }
        let receipt = Self::next_receipt(&mut state);
        Ok(TxEvents { events, receipt })
    }

    fn revoke(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        stage: bool,
        timestamp: i64,
        _signing: &LedgerKeyPair,
    ) -> Result<TxEvents<RevokeEvent>, BackendError> {
        let mut state = self.state.lock();
        let mut events = Vec::new();
        if let Some(record) = state.records.get_mut(hash) {
            record.push(LogRow {
                signer: signer.clone(),
                signature: String::new(),
                log: String::new(),
                timestamp,
                revoked: Some(stage),
            });
            // Repeated calls with the same stage each produce an event.
            events.push(RevokeEvent {
                signer: signer.clone(),
                stage,
            });
        }
        let receipt = Self::next_receipt(&mut state);
        Ok(TxEvents { events, receipt })
    }

    fn read(&self, hash: &EvidenceHash) -> Result<EvidenceLog, BackendError> {
        let state = self.state.lock();
        Ok(state.records.get(hash).cloned().unwrap_or_default())
    }

    fn resolve_key(&self, key: &CustomKey) -> Result<Option<EvidenceHash>, BackendError> {
        let state = self.state.lock();
        Ok(state.aliases.get(key.as_str()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(n: u8) -> EvidenceHash {
        EvidenceHash::new(&format!("0x{:064x}", n)).unwrap()
    }

    fn addr(n: u8) -> SignerAddress {
        SignerAddress::new(&format!("0x{:040x}", n)).unwrap()
    }

    fn single_create(h: &EvidenceHash, signer: &SignerAddress) -> CreateRequest {
        CreateRequest {
            hashes: vec![h.clone()],
            signers: vec![signer.clone()],
            signatures: vec!["sig".to_string()],
            logs: vec!["log".to_string()],
            timestamps: vec![100],
            custom_keys: None,
        }
    }

    #[test]
    fn create_emits_event_then_filters_duplicate() {
        let backend = MemoryBackend::new();
        let kp = LedgerKeyPair::generate();
        let h = hash(1);
        let first = backend.create(&single_create(&h, &addr(1)), &kp).unwrap();
        assert_eq!(first.events.len(), 1);
        let second = backend.create(&single_create(&h, &addr(1)), &kp).unwrap();
        assert!(second.events.is_empty());
    }

    #[test]
    fn bound_alias_blocks_second_binding() {
        let backend = MemoryBackend::new();
        let kp = LedgerKeyPair::generate();
        let mut req = single_create(&hash(1), &addr(1));
        req.custom_keys = Some(vec!["alias-1".to_string()]);
        assert_eq!(backend.create(&req, &kp).unwrap().events.len(), 1);

        let mut clash = single_create(&hash(2), &addr(1));
        clash.custom_keys = Some(vec!["alias-1".to_string()]);
        assert!(backend.create(&clash, &kp).unwrap().events.is_empty());

        let key = CustomKey::new("alias-1").unwrap();
        assert_eq!(backend.resolve_key(&key).unwrap(), Some(hash(1)));
    }

    #[test]
    fn append_on_missing_record_emits_nothing() {
        let backend = MemoryBackend::new();
        let kp = LedgerKeyPair::generate();
        let out = backend
            .append_log(&hash(9), &addr(1), "s", "l", 1, &kp)
            .unwrap();
        assert!(out.events.is_empty());
    }

    #[test]
    fn rows_accumulate_in_commit_order() {
        let backend = MemoryBackend::new();
        let kp = LedgerKeyPair::generate();
        let h = hash(1);
        backend.create(&single_create(&h, &addr(1)), &kp).unwrap();
        backend.append_log(&h, &addr(1), "s2", "l2", 200, &kp).unwrap();
        backend.revoke(&h, &addr(1), true, 300, &kp).unwrap();
        let log = backend.read(&h).unwrap();
        assert_eq!(log.len(), 3);
        assert!(log.is_rectangular());
        assert_eq!(log.revocations, vec![None, None, Some(true)]);
        assert_eq!(log.timestamps, vec![100, 200, 300]);
    }

    #[test]
    fn attributes_live_on_a_separate_channel() {
        let backend = MemoryBackend::new();
        let kp = LedgerKeyPair::generate();
        let h = hash(1);
        backend.create(&single_create(&h, &addr(1)), &kp).unwrap();
        let out = backend
            .set_attribute(&h, &addr(1), "purpose", "audit", 150, &kp)
            .unwrap();
        assert_eq!(out.events.len(), 1);
        // The read tuple is unchanged; the sample lives off to the side.
        assert_eq!(backend.read(&h).unwrap().len(), 1);
        assert_eq!(backend.attributes().len(), 1);
        assert_eq!(backend.attributes()[0].key, "purpose");
    }

    #[test]
    fn read_of_unknown_hash_is_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.read(&hash(42)).unwrap().is_empty());
    }
}
