//! # Shared CLI Context
//!
//! Builds the evidence service from environment configuration and loads
//! the signing key. Handler modules take these instead of constructing
//! their own.

use std::collections::HashMap;
use std::sync::Arc;

use clap::Args;

use tessera_crypto::LedgerKeyPair;
use tessera_evidence::EvidenceService;
use tessera_ledger::{CachingResolver, LedgerConfig, StaticResolver};

/// Signing key material shared by all write subcommands.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Hex-encoded 32-byte signing key seed.
    #[arg(long, env = "TESSERA_KEY_SEED", hide_env_values = true)]
    pub key_seed: String,
}

impl KeyArgs {
    /// Load the signing key pair from the seed.
    pub fn signing_key(&self) -> anyhow::Result<LedgerKeyPair> {
        Ok(LedgerKeyPair::from_seed_hex(&self.key_seed)?)
    }
}

/// Open the evidence service from `TESSERA_*` environment configuration.
///
/// When `TESSERA_EVIDENCE_ADDRESS` is set, it also seeds the resolver for
/// the configured group, so single-contract deployments need no external
/// registry.
pub fn open_service() -> anyhow::Result<EvidenceService> {
    let config = LedgerConfig::from_env()?;
    let mut entries = HashMap::new();
    if let Some(address) = &config.evidence_address {
        entries.insert(format!("evidence/{}", config.group), address.clone());
    }
    let resolver = Arc::new(CachingResolver::new(Box::new(StaticResolver::new(entries))));
    Ok(EvidenceService::open(config, resolver)?)
}

/// Print a serializable result as pretty JSON on stdout.
pub fn emit<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
