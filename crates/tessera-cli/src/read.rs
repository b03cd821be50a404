//! # Get / Resolve Subcommands
//!
//! Reads and folds evidence records, by hash or through a bound alias.

use clap::Args;

use tessera_evidence::RevocationMergePolicy;

use crate::context::{emit, open_service};

/// Arguments for the get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Content hash to read, or an alias with `--by-key`.
    pub target: String,

    /// Treat the target as a custom key instead of a hash.
    #[arg(long)]
    pub by_key: bool,

    /// Let the latest revoke event win instead of the first-seen row.
    #[arg(long)]
    pub latest_revocation: bool,
}

pub fn run(args: GetArgs) -> anyhow::Result<()> {
    let policy = if args.latest_revocation {
        RevocationMergePolicy::LatestEvent
    } else {
        RevocationMergePolicy::FirstSeen
    };
    let service = open_service()?.with_revocation_policy(policy);
    let record = if args.by_key {
        service.reader().get_info_by_custom_key(&args.target)?
    } else {
        service.reader().get_info(&args.target)?
    };
    emit(&record)
}

/// Arguments for the resolve-key subcommand.
#[derive(Args, Debug)]
pub struct ResolveKeyArgs {
    /// Custom key to resolve.
    pub custom_key: String,
}

pub fn run_resolve(args: ResolveKeyArgs) -> anyhow::Result<()> {
    let service = open_service()?;
    let hash = service.reader().get_hash_by_custom_key(&args.custom_key)?;
    emit(&hash)
}
