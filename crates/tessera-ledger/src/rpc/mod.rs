//! # Gateway RPC Backends
//!
//! The two concrete `EvidenceBackend` implementations that talk to a
//! contract-execution gateway over HTTP. The gateway speaks one of two
//! wire dialects; which one is decided by configuration at
//! [`crate::open_backend`] and never re-checked per call.
//!
//! Submission is a two-step, fully blocking round trip: POST the signed
//! call envelope, then poll for the receipt with a bounded number of
//! attempts at a fixed interval ([`poll`]). A poll timeout only stops
//! waiting; the submitted transaction may still commit.

mod poll;
mod v2;
mod v3;

pub use v2::RpcBackendV2;
pub use v3::RpcBackendV3;

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::LedgerConfig;
use crate::error::BackendError;

/// Thin blocking HTTP transport shared by both dialects.
pub(crate) struct GatewayClient {
    http: reqwest::blocking::Client,
    base: Url,
}

impl GatewayClient {
    pub(crate) fn new(config: &LedgerConfig) -> Result<Self, BackendError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Submit {
                reason: format!("building http client: {e}"),
            })?;
        Ok(Self {
            http,
            base: config.gateway_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path)
            .map_err(|e| BackendError::Submit {
                reason: format!("joining gateway path {path:?}: {e}"),
            })
    }

    /// POST a JSON body, expecting a JSON response.
    pub(crate) fn post(&self, path: &str, body: &Value) -> Result<Value, BackendError> {
        let url = self.endpoint(path)?;
        let resp = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .map_err(|source| BackendError::Transport {
                endpoint: path.to_string(),
                source,
            })?;
        Self::into_json(path, resp)
    }

    /// GET a JSON resource. `Ok(None)` for 404: the resource does not
    /// exist yet (a receipt still pending, for example).
    pub(crate) fn get_optional(&self, path: &str) -> Result<Option<Value>, BackendError> {
        let url = self.endpoint(path)?;
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|source| BackendError::Transport {
                endpoint: path.to_string(),
                source,
            })?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::into_json(path, resp).map(Some)
    }

    fn into_json(path: &str, resp: reqwest::blocking::Response) -> Result<Value, BackendError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(BackendError::Gateway {
                endpoint: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        resp.json().map_err(|source| BackendError::Transport {
            endpoint: path.to_string(),
            source,
        })
    }
}

// ── JSON field helpers ───────────────────────────────────────────────

pub(crate) fn field_str(value: &Value, key: &str) -> Result<String, BackendError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| BackendError::MalformedResponse {
            reason: format!("missing string field {key:?}"),
        })
}

pub(crate) fn field_u64(value: &Value, key: &str) -> Option<u64> {
    value.get(key).and_then(Value::as_u64)
}

pub(crate) fn field_array<'v>(value: &'v Value, key: &str) -> Option<&'v Vec<Value>> {
    value.get(key).and_then(Value::as_array)
}
