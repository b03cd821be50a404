//! # Legacy (v2) Gateway Dialect
//!
//! The v2 gateway keeps transactions and read-only calls on separate
//! top-level routes, reports receipt status as a hex string (`"0x0"` is
//! success), and emits events as named objects under `"events"`.

use std::time::Duration;

use serde_json::{json, Value};

use tessera_core::{CustomKey, EvidenceHash, ReceiptInfo, SignerAddress};
use tessera_crypto::LedgerKeyPair;

use crate::backend::{
    AttributeEvent, CreateRequest, CreationEvent, EvidenceBackend, EvidenceLog, RevokeEvent,
    TxEvents,
};
use crate::config::LedgerConfig;
use crate::error::BackendError;
use crate::resolver::ContractLocation;
use crate::rpc::{field_array, field_str, field_u64, poll::poll_receipt, GatewayClient};

const STATUS_OK: &str = "0x0";

/// `EvidenceBackend` over the v2 gateway wire shape.
pub struct RpcBackendV2 {
    gateway: GatewayClient,
    contract: String,
    group: String,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl RpcBackendV2 {
    /// Connect to a v2 gateway for the given contract location.
    pub fn new(config: &LedgerConfig, location: ContractLocation) -> Result<Self, BackendError> {
        Ok(Self {
            gateway: GatewayClient::new(config)?,
            contract: location.address,
            group: config.group.clone(),
            poll_attempts: config.poll_attempts,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    /// Submit a signed call envelope and block until its receipt lands.
    fn submit(
        &self,
        method: &str,
        params: Value,
        signing: &LedgerKeyPair,
    ) -> Result<(Value, ReceiptInfo), BackendError> {
        let call = json!({
            "group": self.group,
            "contract": self.contract,
            "method": method,
            "params": params,
        });
        let payload = serde_json::to_string(&call).map_err(|e| BackendError::Submit {
            reason: format!("serializing call envelope: {e}"),
        })?;
        let envelope = json!({
            "group": self.group,
            "contract": self.contract,
            "method": method,
            "params": call["params"],
            "from": signing.signer_address().as_str(),
            "signature": signing.sign_hex(payload.as_bytes()),
        });

        let submitted = self.gateway.post("rpc/v2/transactions", &envelope)?;
        let tx_hash = field_str(&submitted, "txHash")?;
        tracing::debug!(method, tx_hash, "transaction submitted, polling receipt");

        let receipt_path = format!("rpc/v2/receipts/{tx_hash}?group={}", self.group);
        let receipt = poll_receipt(&tx_hash, self.poll_attempts, self.poll_interval, || {
            self.gateway.get_optional(&receipt_path)
        })?;

        let info = ReceiptInfo {
            tx_hash,
            block_number: field_u64(&receipt, "blockNumber"),
            tx_index: field_u64(&receipt, "transactionIndex"),
        };
        let status = field_str(&receipt, "status")?;
        if status != STATUS_OK {
            return Err(BackendError::TransactionFailed {
                status,
                receipt: info,
            });
        }
        Ok((receipt, info))
    }

    /// Issue a read-only call.
    fn call(&self, method: &str, params: Value) -> Result<Value, BackendError> {
        let body = json!({
            "group": self.group,
            "contract": self.contract,
            "method": method,
            "params": params,
        });
        let response = self.gateway.post("rpc/v2/calls", &body)?;
        response
            .get("output")
            .cloned()
            .ok_or_else(|| BackendError::MalformedResponse {
                reason: "read call response missing output".to_string(),
            })
    }
}

// ── Event decoding ───────────────────────────────────────────────────
//
// Absence of the "events" field is the undecodable-event-list case and
// distinct from an empty array, which is a legitimate filtered outcome.

fn decode_named_events<'r>(
    receipt: &'r Value,
    name: &str,
) -> Result<impl Iterator<Item = &'r Value>, BackendError> {
    let events = field_array(receipt, "events").ok_or_else(|| BackendError::EventDecode {
        reason: "receipt carries no event list".to_string(),
    })?;
    let wanted = name.to_string();
    Ok(events
        .iter()
        .filter(move |ev| ev.get("name").and_then(Value::as_str) == Some(wanted.as_str())))
}

fn decode_creation_events(receipt: &Value) -> Result<Vec<CreationEvent>, BackendError> {
    decode_named_events(receipt, "CreateEvidence")?
        .map(|ev| {
            Ok(CreationEvent {
                hash: field_str(ev, "hash")?,
                signer: parse_signer(ev)?,
                signature: field_str(ev, "sig")?,
            })
        })
        .collect()
}

fn decode_attribute_events(receipt: &Value, name: &str) -> Result<Vec<AttributeEvent>, BackendError> {
    decode_named_events(receipt, name)?
        .map(|ev| Ok(AttributeEvent { signer: parse_signer(ev)? }))
        .collect()
}

fn decode_revoke_events(receipt: &Value) -> Result<Vec<RevokeEvent>, BackendError> {
    decode_named_events(receipt, "Revoked")?
        .map(|ev| {
            Ok(RevokeEvent {
                signer: parse_signer(ev)?,
                stage: ev
                    .get("revoked")
                    .and_then(Value::as_bool)
                    .ok_or_else(|| BackendError::MalformedResponse {
                        reason: "revoke event missing revoked flag".to_string(),
                    })?,
            })
        })
        .collect()
}

fn parse_signer(ev: &Value) -> Result<SignerAddress, BackendError> {
    let raw = field_str(ev, "signer")?;
    SignerAddress::new(&raw).map_err(|e| BackendError::MalformedResponse {
        reason: e.to_string(),
    })
}

/// Parse the named-array read output into an `EvidenceLog`.
fn parse_log_output(output: &Value) -> Result<EvidenceLog, BackendError> {
    let mut log = EvidenceLog::default();
    let signers = field_array(output, "signers").ok_or_else(malformed_read)?;
    let signatures = field_array(output, "signatures").ok_or_else(malformed_read)?;
    let logs = field_array(output, "logs").ok_or_else(malformed_read)?;
    let timestamps = field_array(output, "timestamps").ok_or_else(malformed_read)?;
    let revocations = field_array(output, "revocations").ok_or_else(malformed_read)?;
    for raw in signers {
        let s = raw.as_str().ok_or_else(malformed_read)?;
        log.signers
            .push(SignerAddress::new(s).map_err(|e| BackendError::MalformedResponse {
                reason: e.to_string(),
            })?);
    }
    for raw in signatures {
        log.signatures
            .push(raw.as_str().ok_or_else(malformed_read)?.to_string());
    }
    for raw in logs {
        log.logs.push(raw.as_str().ok_or_else(malformed_read)?.to_string());
    }
    for raw in timestamps {
        log.timestamps.push(raw.as_i64().ok_or_else(malformed_read)?);
    }
    for raw in revocations {
        if raw.is_null() {
            log.revocations.push(None);
        } else {
            log.revocations
                .push(Some(raw.as_bool().ok_or_else(malformed_read)?));
        }
    }
    Ok(log)
}

fn malformed_read() -> BackendError {
    BackendError::MalformedResponse {
        reason: "read output missing or mistyped parallel sequence".to_string(),
    }
}

fn create_params(request: &CreateRequest) -> Value {
    let hashes: Vec<&str> = request.hashes.iter().map(EvidenceHash::as_str).collect();
    let signers: Vec<&str> = request.signers.iter().map(SignerAddress::as_str).collect();
    let mut params = json!({
        "hashes": hashes,
        "signers": signers,
        "signatures": request.signatures,
        "logs": request.logs,
        "timestamps": request.timestamps,
    });
    if let Some(keys) = &request.custom_keys {
        params["customKeys"] = json!(keys);
    }
    params
}

impl EvidenceBackend for RpcBackendV2 {
    fn create(
        &self,
        request: &CreateRequest,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<CreationEvent>, BackendError> {
        let method = if request.custom_keys.is_some() {
            "createEvidenceWithExtraKey"
        } else {
            "createEvidence"
        };
        let (receipt, info) = self.submit(method, create_params(request), signing)?;
        Ok(TxEvents {
            events: decode_creation_events(&receipt)?,
            receipt: info,
        })
    }

    fn append_log(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        signature: &str,
        log: &str,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<AttributeEvent>, BackendError> {
        let params = json!({
            "hashes": [hash.as_str()],
            "signers": [signer.as_str()],
            "signatures": [signature],
            "logs": [log],
            "timestamps": [timestamp],
        });
        let (receipt, info) = self.submit("addSignatureAndLogs", params, signing)?;
        Ok(TxEvents {
            events: decode_attribute_events(&receipt, "EvidenceAttributeChanged")?,
            receipt: info,
        })
    }

    fn append_log_with_key(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        signature: &str,
        log: &str,
        timestamp: i64,
        custom_key: &CustomKey,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<AttributeEvent>, BackendError> {
        let params = json!({
            "hashes": [hash.as_str()],
            "signers": [signer.as_str()],
            "signatures": [signature],
            "logs": [log],
            "timestamps": [timestamp],
            "customKeys": [custom_key.as_str()],
        });
        let (receipt, info) = self.submit("addSignatureAndLogsWithExtraKey", params, signing)?;
        Ok(TxEvents {
            events: decode_attribute_events(&receipt, "EvidenceAttributeChanged")?,
            receipt: info,
        })
    }

    fn set_attribute(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        key: &str,
        value: &str,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<AttributeEvent>, BackendError> {
        let params = json!({
            "hashes": [hash.as_str()],
            "signers": [signer.as_str()],
            "keys": [key],
            "values": [value],
            "timestamps": [timestamp],
        });
        let (receipt, info) = self.submit("setAttribute", params, signing)?;
        Ok(TxEvents {
            events: decode_attribute_events(&receipt, "EvidenceExtraAttributeChanged")?,
            receipt: info,
        })
    }

    fn revoke(
        &self,
        hash: &EvidenceHash,
        signer: &SignerAddress,
        stage: bool,
        timestamp: i64,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<RevokeEvent>, BackendError> {
        let params = json!({
            "hash": hash.as_str(),
            "signer": signer.as_str(),
            "revoked": stage,
            "timestamp": timestamp,
        });
        let (receipt, info) = self.submit("revoke", params, signing)?;
        Ok(TxEvents {
            events: decode_revoke_events(&receipt)?,
            receipt: info,
        })
    }

    fn read(&self, hash: &EvidenceHash) -> Result<EvidenceLog, BackendError> {
        let output = self.call("getEvidence", json!({"hash": hash.as_str()}))?;
        parse_log_output(&output)
    }

    fn resolve_key(&self, key: &CustomKey) -> Result<Option<EvidenceHash>, BackendError> {
        let output = self.call("getHashByExtraKey", json!({"extraKey": key.as_str()}))?;
        let raw = field_str(&output, "hash")?;
        if raw.is_empty() || raw.trim_end_matches('0') == "0x" {
            return Ok(None);
        }
        EvidenceHash::new(&raw)
            .map(Some)
            .map_err(|e| BackendError::MalformedResponse {
                reason: e.to_string(),
            })
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

    #[test]
    fn create_params_carry_parallel_sequences() {
        let req = CreateRequest {
            hashes: vec![hash(1), hash(2)],
            signers: vec![addr(1), addr(2)],
            signatures: vec!["s1".into(), "s2".into()],
            logs: vec!["l1".into(), "l2".into()],
            timestamps: vec![10, 20],
            custom_keys: Some(vec!["k1".into(), "k2".into()]),
        };
        let params = create_params(&req);
        assert_eq!(params["hashes"].as_array().unwrap().len(), 2);
        assert_eq!(params["customKeys"][1], "k2");
        assert_eq!(params["timestamps"][0], 10);
    }

    #[test]
    fn missing_event_list_is_undecodable() {
        let receipt = serde_json::json!({"status": "0x0"});
        assert!(matches!(
            decode_creation_events(&receipt),
            Err(BackendError::EventDecode { .. })
        ));
    }

    #[test]
    fn empty_event_list_decodes_to_no_events() {
        let receipt = serde_json::json!({"status": "0x0", "events": []});
        assert!(decode_creation_events(&receipt).unwrap().is_empty());
    }

    #[test]
    fn unrelated_events_are_filtered_out() {
        let receipt = serde_json::json!({
            "events": [
                {"name": "Other", "signer": addr(1).as_str()},
                {"name": "CreateEvidence", "hash": hash(3).as_str(),
                 "signer": addr(1).as_str(), "sig": "s"},
            ]
        });
        let events = decode_creation_events(&receipt).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].hash, hash(3).as_str());
    }

    #[test]
    fn log_output_parses_rectangular_sequences() {
        let output = serde_json::json!({
            "signers": [addr(1).as_str(), addr(1).as_str()],
            "signatures": ["s1", ""],
            "logs": ["l1", "l2"],
            "timestamps": [100, 200],
            "revocations": [null, true],
        });
        let log = parse_log_output(&output).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.revocations, vec![None, Some(true)]);
    }

    #[test]
    fn mistyped_revocation_value_is_malformed() {
        let output = serde_json::json!({
            "signers": [addr(1).as_str()],
            "signatures": ["s"],
            "logs": ["l"],
            "timestamps": [100],
            "revocations": ["true"],
        });
        assert!(matches!(
            parse_log_output(&output),
            Err(BackendError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn log_output_missing_sequence_is_malformed() {
        let output = serde_json::json!({"signers": []});
        assert!(matches!(
            parse_log_output(&output),
            Err(BackendError::MalformedResponse { .. })
        ));
    }
}
