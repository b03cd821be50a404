//! # Ledger Configuration
//!
//! Env-driven configuration for the backend connection. The dialect is
//! decided here, once, at load time; nothing downstream re-reads it.
//!
//! ## Environment Variables
//!
//! | Variable                    | Default                  |
//! |-----------------------------|--------------------------|
//! | `TESSERA_LEDGER_DIALECT`    | `v3`                     |
//! | `TESSERA_GATEWAY_URL`       | (required)               |
//! | `TESSERA_GROUP`             | `1`                      |
//! | `TESSERA_MASTER_GROUP`      | `1`                      |
//! | `TESSERA_EVIDENCE_ADDRESS`  | (none)                   |
//! | `TESSERA_POLL_ATTEMPTS`     | `30`                     |
//! | `TESSERA_POLL_INTERVAL_MS`  | `1500`                   |
//! | `TESSERA_TIMEOUT_SECS`      | `10`                     |

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default number of receipt poll attempts.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 30;

/// Default fixed delay between poll attempts, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1500;

/// Default HTTP timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is missing.
    #[error("missing environment variable {name}")]
    Missing {
        /// The variable name.
        name: String,
    },

    /// A variable is present but unparseable.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// The variable name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// The gateway dialect spoken by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Legacy gateway wire shape.
    V2,
    /// Current gateway wire shape.
    V3,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V2 => f.write_str("v2"),
            Self::V3 => f.write_str("v3"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2" => Ok(Self::V2),
            "v3" => Ok(Self::V3),
            other => Err(ConfigError::Invalid {
                name: "TESSERA_LEDGER_DIALECT".to_string(),
                reason: format!("expected v2 or v3, got {other:?}"),
            }),
        }
    }
}

/// Connection settings for the evidence ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Gateway dialect.
    pub dialect: Dialect,
    /// Base URL of the contract-execution gateway.
    pub gateway_url: Url,
    /// Ledger group this client writes to.
    pub group: String,
    /// The master group, whose evidence address comes from configuration
    /// rather than the registry.
    pub master_group: String,
    /// Configured evidence contract address, used for the master group.
    pub evidence_address: Option<String>,
    /// Bounded number of receipt poll attempts.
    pub poll_attempts: u32,
    /// Fixed delay between poll attempts, in milliseconds.
    pub poll_interval_ms: u64,
    /// HTTP timeout per gateway call, in seconds.
    pub timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::V3,
            gateway_url: Url::parse("http://127.0.0.1:8545").expect("static url"),
            group: "1".to_string(),
            master_group: "1".to_string(),
            evidence_address: None,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from `TESSERA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gateway_raw =
            std::env::var("TESSERA_GATEWAY_URL").map_err(|_| ConfigError::Missing {
                name: "TESSERA_GATEWAY_URL".to_string(),
            })?;
        let gateway_url = Url::parse(&gateway_raw).map_err(|e| ConfigError::Invalid {
            name: "TESSERA_GATEWAY_URL".to_string(),
            reason: e.to_string(),
        })?;

        let dialect = match std::env::var("TESSERA_LEDGER_DIALECT") {
            Ok(v) => v.parse()?,
            Err(_) => Dialect::V3,
        };

        Ok(Self {
            dialect,
            gateway_url,
            group: env_or("TESSERA_GROUP", "1"),
            master_group: env_or("TESSERA_MASTER_GROUP", "1"),
            evidence_address: std::env::var("TESSERA_EVIDENCE_ADDRESS").ok(),
            poll_attempts: env_parsed("TESSERA_POLL_ATTEMPTS", DEFAULT_POLL_ATTEMPTS)?,
            poll_interval_ms: env_parsed("TESSERA_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?,
            timeout_secs: env_parsed("TESSERA_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_parses_case_insensitively() {
        assert_eq!("V2".parse::<Dialect>().unwrap(), Dialect::V2);
        assert_eq!(" v3 ".parse::<Dialect>().unwrap(), Dialect::V3);
        assert!("v4".parse::<Dialect>().is_err());
    }

    #[test]
    fn default_poll_bounds() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.poll_attempts, 30);
        assert_eq!(cfg.poll_interval_ms, 1500);
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = LedgerConfig {
            evidence_address: Some("0xabcd".to_string()),
            ..LedgerConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: LedgerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.gateway_url, cfg.gateway_url);
        assert_eq!(back.dialect, cfg.dialect);
        assert_eq!(back.evidence_address, cfg.evidence_address);
    }
}
