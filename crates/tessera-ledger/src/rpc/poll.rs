//! Bounded receipt polling with a fixed inter-attempt delay.
//!
//! The calling thread blocks for the whole round trip. Exceeding the
//! attempt bound is fatal for the call; there is no layer-level retry
//! and no way to withdraw the submitted transaction.

use std::time::Duration;

use serde_json::Value;

use crate::error::BackendError;

/// Poll `fetch` until it yields a receipt, up to `attempts` tries with
/// `interval` between them.
pub(crate) fn poll_receipt<F>(
    tx_hash: &str,
    attempts: u32,
    interval: Duration,
    mut fetch: F,
) -> Result<Value, BackendError>
where
    F: FnMut() -> Result<Option<Value>, BackendError>,
{
    let mut waited_ms = 0u64;
    for attempt in 0..attempts {
        if let Some(receipt) = fetch()? {
            return Ok(receipt);
        }
        tracing::trace!(tx_hash, attempt = attempt + 1, attempts, "receipt not yet available");
        std::thread::sleep(interval);
        waited_ms += interval.as_millis() as u64;
    }
    tracing::warn!(tx_hash, attempts, waited_ms, "receipt polling exhausted");
    Err(BackendError::ReceiptTimeout {
        tx_hash: tx_hash.to_string(),
        attempts,
        waited_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn returns_first_available_receipt() {
        let mut calls = 0;
        let receipt = poll_receipt("0xabc", 5, Duration::ZERO, || {
            calls += 1;
            if calls < 3 {
                Ok(None)
            } else {
                Ok(Some(json!({"status": 0})))
            }
        })
        .unwrap();
        assert_eq!(calls, 3);
        assert_eq!(receipt["status"], 0);
    }

    #[test]
    fn exhausting_attempts_is_a_timeout() {
        let err = poll_receipt("0xabc", 4, Duration::ZERO, || Ok(None)).unwrap_err();
        assert!(matches!(
            err,
            BackendError::ReceiptTimeout { attempts: 4, .. }
        ));
    }

    #[test]
    fn fetch_errors_propagate_immediately() {
        let mut calls = 0;
        let err = poll_receipt("0xabc", 5, Duration::ZERO, || {
            calls += 1;
            Err(BackendError::Submit {
                reason: "boom".into(),
            })
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, BackendError::Submit { .. }));
    }
}
