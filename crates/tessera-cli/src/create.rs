//! # Create Subcommand
//!
//! Creates an evidence record, optionally binding an immutable alias.

use clap::Args;

use crate::context::{emit, open_service, KeyArgs};

/// Arguments for the create subcommand.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Content hash to notarize, `0x` + 64 hex characters.
    pub hash: String,

    /// Signature to record for the signer.
    #[arg(long, default_value = "")]
    pub signature: String,

    /// Initial log entry.
    #[arg(long, default_value = "")]
    pub log: String,

    /// Timestamp in integer seconds; defaults to now.
    #[arg(long)]
    pub timestamp: Option<i64>,

    /// Bind this immutable alias to the hash.
    #[arg(long)]
    pub custom_key: Option<String>,

    #[command(flatten)]
    pub key: KeyArgs,
}

pub fn run(args: CreateArgs) -> anyhow::Result<()> {
    let service = open_service()?;
    let signing = args.key.signing_key()?;
    let timestamp = args.timestamp.unwrap_or_else(now_secs);
    let outcome = match &args.custom_key {
        Some(key) => service.writer().create_evidence_with_custom_key(
            &args.hash,
            key,
            &args.signature,
            &args.log,
            timestamp,
            &signing,
        )?,
        None => service.writer().create_evidence(
            &args.hash,
            &args.signature,
            &args.log,
            timestamp,
            &signing,
        )?,
    };
    emit(&outcome)
}

pub(crate) fn now_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
