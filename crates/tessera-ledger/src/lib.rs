//! # tessera-ledger — Ledger Backend Capability
//!
//! The narrow interface between the evidence layer and the transactional
//! ledger, version-dialect hidden behind one trait. Concrete backends:
//!
//! - [`rpc::RpcBackendV2`] / [`rpc::RpcBackendV3`] — the two gateway
//!   dialects, selected once from configuration at process start. No call
//!   site branches on dialect after construction.
//! - [`memory::MemoryBackend`] — a full in-memory rendition of the
//!   evidence contract's observable semantics, used by tests and local
//!   development.
//!
//! The crate also owns the [`resolver::AddressResolver`] capability
//! (contract-location lookup with explicit cache invalidation) and the
//! env-driven [`config::LedgerConfig`].
//!
//! ## Concurrency Model
//!
//! All write operations are synchronous and blocking: one transaction is
//! submitted, then the receipt is polled with a bounded number of
//! attempts at a fixed interval. There is no cancellation; a local
//! timeout only stops waiting, never the underlying commit.

pub mod backend;
pub mod config;
pub mod error;
pub mod memory;
pub mod resolver;
pub mod rpc;

use std::sync::Arc;

pub use backend::{
    AttributeEvent, CreateRequest, CreationEvent, EvidenceBackend, EvidenceLog, LogRow,
    RevokeEvent, TxEvents,
};
pub use config::{ConfigError, Dialect, LedgerConfig};
pub use error::{BackendError, ResolverError};
pub use memory::MemoryBackend;
pub use resolver::{AddressResolver, CachingResolver, ContractLocation, StaticResolver};

/// Open the backend selected by configuration.
///
/// The evidence contract location comes from configuration when the
/// configured group is the master group, and from the address resolver
/// (key `evidence/<group>`) for any other group. Dialect selection
/// happens here, exactly once; the returned handle never re-checks it.
pub fn open_backend(
    config: &LedgerConfig,
    resolver: &dyn AddressResolver,
) -> Result<Arc<dyn EvidenceBackend>, BackendError> {
    let location = contract_location(config, resolver)?;
    tracing::info!(
        dialect = %config.dialect,
        group = %config.group,
        address = %location.address,
        "opening evidence backend"
    );
    let backend: Arc<dyn EvidenceBackend> = match config.dialect {
        Dialect::V2 => Arc::new(rpc::RpcBackendV2::new(config, location)?),
        Dialect::V3 => Arc::new(rpc::RpcBackendV3::new(config, location)?),
    };
    Ok(backend)
}

fn contract_location(
    config: &LedgerConfig,
    resolver: &dyn AddressResolver,
) -> Result<ContractLocation, BackendError> {
    if config.group == config.master_group {
        if let Some(address) = &config.evidence_address {
            return Ok(ContractLocation {
                address: address.clone(),
            });
        }
    }
    let name = format!("evidence/{}", config.group);
    Ok(resolver.resolve(&name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> LedgerConfig {
        LedgerConfig {
            evidence_address: Some("0x00af".to_string()),
            ..LedgerConfig::default()
        }
    }

    #[test]
    fn master_group_uses_configured_address() {
        let cfg = config();
        let resolver = StaticResolver::new(HashMap::new());
        let loc = contract_location(&cfg, &resolver).unwrap();
        assert_eq!(loc.address, "0x00af");
    }

    #[test]
    fn other_group_consults_resolver() {
        let mut cfg = config();
        cfg.group = "7".to_string();
        let mut entries = HashMap::new();
        entries.insert("evidence/7".to_string(), "0xbeef".to_string());
        let resolver = StaticResolver::new(entries);
        let loc = contract_location(&cfg, &resolver).unwrap();
        assert_eq!(loc.address, "0xbeef");
    }

    #[test]
    fn unresolved_group_is_an_error() {
        let mut cfg = config();
        cfg.group = "9".to_string();
        let resolver = StaticResolver::new(HashMap::new());
        assert!(contract_location(&cfg, &resolver).is_err());
    }
}
