//! # Current (v3) Gateway Dialect
//!
//! The v3 gateway scopes all contract traffic under per-contract routes,
//! reports receipt status numerically (`0` is success), wraps events as
//! `{"event", "data"}` pairs under `"logs"`, and returns read output as
//! a positional tuple.

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

/// `EvidenceBackend` over the v3 gateway wire shape.
pub struct RpcBackendV3 {
    gateway: GatewayClient,
    contract: String,
    group: String,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl RpcBackendV3 {
    /// Connect to a v3 gateway for the given contract location.
    pub fn new(config: &LedgerConfig, location: ContractLocation) -> Result<Self, BackendError> {
        Ok(Self {
            gateway: GatewayClient::new(config)?,
            contract: location.address,
            group: config.group.clone(),
            poll_attempts: config.poll_attempts,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    fn submit(
        &self,
        function: &str,
        args: Value,
        signing: &LedgerKeyPair,
    ) -> Result<(Value, ReceiptInfo), BackendError> {
        let call = json!({
            "groupId": self.group,
            "fn": function,
            "args": args,
        });
        let payload = serde_json::to_string(&call).map_err(|e| BackendError::Submit {
            reason: format!("serializing call envelope: {e}"),
        })?;
        let envelope = json!({
            "groupId": self.group,
            "fn": function,
            "args": call["args"],
            "sender": signing.signer_address().as_str(),
            "signature": signing.sign_hex(payload.as_bytes()),
        });

        let invoke_path = format!("api/v3/contracts/{}/invoke", self.contract);
        let submitted = self.gateway.post(&invoke_path, &envelope)?;
        let tx_hash = field_str(&submitted, "transactionHash")?;
        tracing::debug!(function, tx_hash, "transaction submitted, polling receipt");

        let receipt_path = format!("api/v3/receipts/{tx_hash}?groupId={}", self.group);
        let receipt = poll_receipt(&tx_hash, self.poll_attempts, self.poll_interval, || {
            self.gateway.get_optional(&receipt_path)
        })?;

        let info = ReceiptInfo {
            tx_hash,
            block_number: field_u64(&receipt, "blockNumber"),
            tx_index: field_u64(&receipt, "transactionIndex"),
        };
        let status = receipt
            .get("status")
            .and_then(Value::as_i64)
            .ok_or_else(|| BackendError::MalformedResponse {
                reason: "receipt missing numeric status".to_string(),
            })?;
        if status != 0 {
            return Err(BackendError::TransactionFailed {
                status: status.to_string(),
                receipt: info,
            });
        }
        Ok((receipt, info))
    }

    fn call(&self, function: &str, args: Value) -> Result<Value, BackendError> {
        let call_path = format!("api/v3/contracts/{}/call", self.contract);
        let body = json!({
            "groupId": self.group,
            "fn": function,
            "args": args,
        });
        let response = self.gateway.post(&call_path, &body)?;
        response
            .get("result")
            .cloned()
            .ok_or_else(|| BackendError::MalformedResponse {
                reason: "read call response missing result".to_string(),
            })
    }
}

// ── Event decoding ───────────────────────────────────────────────────

fn decode_logged_events<'r>(
    receipt: &'r Value,
    name: &str,
) -> Result<Vec<&'r Value>, BackendError> {
    let logs = field_array(receipt, "logs").ok_or_else(|| BackendError::EventDecode {
        reason: "receipt carries no event log".to_string(),
    })?;
    Ok(logs
        .iter()
        .filter(|entry| entry.get("event").and_then(Value::as_str) == Some(name))
        .filter_map(|entry| entry.get("data"))
        .collect())
}

fn decode_creation_events(receipt: &Value) -> Result<Vec<CreationEvent>, BackendError> {
    decode_logged_events(receipt, "CreateEvidence")?
        .into_iter()
        .map(|data| {
            Ok(CreationEvent {
                hash: field_str(data, "hash")?,
                signer: parse_signer(data)?,
                signature: field_str(data, "signature")?,
            })
        })
        .collect()
}

fn decode_attribute_events(receipt: &Value, name: &str) -> Result<Vec<AttributeEvent>, BackendError> {
    decode_logged_events(receipt, name)?
        .into_iter()
        .map(|data| Ok(AttributeEvent { signer: parse_signer(data)? }))
        .collect()
}

fn decode_revoke_events(receipt: &Value) -> Result<Vec<RevokeEvent>, BackendError> {
    decode_logged_events(receipt, "Revoked")?
        .into_iter()
        .map(|data| {
            Ok(RevokeEvent {
                signer: parse_signer(data)?,
                stage: data
                    .get("stage")
                    .and_then(Value::as_bool)
                    .ok_or_else(|| BackendError::MalformedResponse {
                        reason: "revoke event missing stage".to_string(),
                    })?,
            })
        })
        .collect()
}

fn parse_signer(data: &Value) -> Result<SignerAddress, BackendError> {
    let raw = field_str(data, "signer")?;
    SignerAddress::new(&raw).map_err(|e| BackendError::MalformedResponse {
        reason: e.to_string(),
    })
}

/// Parse the positional five-tuple read result into an `EvidenceLog`.
fn parse_log_result(result: &Value) -> Result<EvidenceLog, BackendError> {
    let tuple = result.as_array().filter(|t| t.len() == 5).ok_or_else(|| {
        BackendError::MalformedResponse {
            reason: "read result is not a five-element tuple".to_string(),
        }
    })?;
    let mut log = EvidenceLog::default();
    for raw in expect_seq(&tuple[0])? {
        let s = raw.as_str().ok_or_else(mistyped)?;
        log.signers
            .push(SignerAddress::new(s).map_err(|e| BackendError::MalformedResponse {
                reason: e.to_string(),
            })?);
    }
    for raw in expect_seq(&tuple[1])? {
        log.signatures.push(raw.as_str().ok_or_else(mistyped)?.to_string());
    }
    for raw in expect_seq(&tuple[2])? {
        log.logs.push(raw.as_str().ok_or_else(mistyped)?.to_string());
    }
    for raw in expect_seq(&tuple[3])? {
        log.timestamps.push(raw.as_i64().ok_or_else(mistyped)?);
    }
    for raw in expect_seq(&tuple[4])? {
        if raw.is_null() {
            log.revocations.push(None);
        } else {
            log.revocations.push(Some(raw.as_bool().ok_or_else(mistyped)?));
        }
    }
    Ok(log)
}

fn expect_seq(value: &Value) -> Result<&Vec<Value>, BackendError> {
    value.as_array().ok_or_else(mistyped)
}

fn mistyped() -> BackendError {
    BackendError::MalformedResponse {
        reason: "read result sequence mistyped".to_string(),
    }
}

fn create_args(request: &CreateRequest) -> Value {
    let hashes: Vec<&str> = request.hashes.iter().map(EvidenceHash::as_str).collect();
    let signers: Vec<&str> = request.signers.iter().map(SignerAddress::as_str).collect();
    let mut args = json!({
        "hashes": hashes,
        "signers": signers,
        "signatures": request.signatures,
        "logs": request.logs,
        "timestamps": request.timestamps,
    });
    if let Some(keys) = &request.custom_keys {
        args["extraKeys"] = json!(keys);
    }
    args
}

impl EvidenceBackend for RpcBackendV3 {
    fn create(
        &self,
        request: &CreateRequest,
        signing: &LedgerKeyPair,
    ) -> Result<TxEvents<CreationEvent>, BackendError> {
        let function = if request.custom_keys.is_some() {
            "createEvidenceWithExtraKey"
        } else {
            "createEvidence"
        };
        let (receipt, info) = self.submit(function, create_args(request), signing)?;
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
        let args = json!({
            "hashes": [hash.as_str()],
            "signers": [signer.as_str()],
            "signatures": [signature],
            "logs": [log],
            "timestamps": [timestamp],
        });
        let (receipt, info) = self.submit("addSignatureAndLogs", args, signing)?;
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
        let args = json!({
            "hashes": [hash.as_str()],
            "signers": [signer.as_str()],
            "signatures": [signature],
            "logs": [log],
            "timestamps": [timestamp],
            "extraKeys": [custom_key.as_str()],
        });
        let (receipt, info) = self.submit("addSignatureAndLogsWithExtraKey", args, signing)?;
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
        let args = json!({
            "hashes": [hash.as_str()],
            "signers": [signer.as_str()],
            "keys": [key],
            "values": [value],
            "timestamps": [timestamp],
        });
        let (receipt, info) = self.submit("setAttribute", args, signing)?;
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
        let args = json!({
            "hash": hash.as_str(),
            "signer": signer.as_str(),
            "stage": stage,
            "timestamp": timestamp,
        });
        let (receipt, info) = self.submit("revoke", args, signing)?;
        Ok(TxEvents {
            events: decode_revoke_events(&receipt)?,
            receipt: info,
        })
    }

    fn read(&self, hash: &EvidenceHash) -> Result<EvidenceLog, BackendError> {
        let result = self.call("getEvidence", json!({"hash": hash.as_str()}))?;
        parse_log_result(&result)
    }

    fn resolve_key(&self, key: &CustomKey) -> Result<Option<EvidenceHash>, BackendError> {
        let result = self.call("getHashByExtraKey", json!({"extraKey": key.as_str()}))?;
        let raw = result
            .as_str()
            .ok_or_else(|| BackendError::MalformedResponse {
                reason: "key resolution result is not a string".to_string(),
            })?;
        if raw.is_empty() || raw.trim_end_matches('0') == "0x" {
            return Ok(None);
        }
        EvidenceHash::new(raw)
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
    fn logged_events_unwrap_their_data() {
        let receipt = serde_json::json!({
            "status": 0,
            "logs": [
                {"event": "CreateEvidence", "data": {
                    "hash": hash(4).as_str(), "signer": addr(2).as_str(), "signature": "sg"
                }},
                {"event": "Irrelevant", "data": {}},
            ]
        });
        let events = decode_creation_events(&receipt).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].signature, "sg");
    }

    #[test]
    fn missing_logs_field_is_undecodable() {
        let receipt = serde_json::json!({"status": 0});
        assert!(matches!(
            decode_creation_events(&receipt),
            Err(BackendError::EventDecode { .. })
        ));
    }

    #[test]
    fn positional_tuple_parses() {
        let result = serde_json::json!([
            [addr(1).as_str()],
            ["s1"],
            ["l1"],
            [100],
            [null],
        ]);
        let log = parse_log_result(&result).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.revocations, vec![None]);
    }

    #[test]
    fn mistyped_revocation_value_is_malformed() {
        let result = serde_json::json!([
            [addr(1).as_str()],
            ["s1"],
            ["l1"],
            [100],
            ["true"],
        ]);
        assert!(matches!(
            parse_log_result(&result),
            Err(BackendError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn short_tuple_is_malformed() {
        let result = serde_json::json!([[], [], []]);
        assert!(parse_log_result(&result).is_err());
    }

    #[test]
    fn create_args_use_extra_keys_field() {
        let req = CreateRequest {
            hashes: vec![hash(1)],
            signers: vec![addr(1)],
            signatures: vec!["s".into()],
            logs: vec!["l".into()],
            timestamps: vec![1],
            custom_keys: Some(vec!["k".into()]),
        };
        let args = create_args(&req);
        assert_eq!(args["extraKeys"][0], "k");
    }
}
