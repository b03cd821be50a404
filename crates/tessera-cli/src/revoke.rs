//! # Revoke Subcommand
//!
//! Sets (not toggles) the signer's revoked flag on a record.

use clap::Args;

use crate::context::{emit, open_service, KeyArgs};
use crate::create::now_secs;

/// Arguments for the revoke subcommand.
#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Content hash of the record.
    pub hash: String,

    /// Clear the flag instead of setting it.
    #[arg(long)]
    pub unset: bool,

    /// Timestamp in integer seconds; defaults to now.
    #[arg(long)]
    pub timestamp: Option<i64>,

    #[command(flatten)]
    pub key: KeyArgs,
}

pub fn run(args: RevokeArgs) -> anyhow::Result<()> {
    let service = open_service()?;
    let signing = args.key.signing_key()?;
    let timestamp = args.timestamp.unwrap_or_else(now_secs);
    let outcome = service
        .writer()
        .revoke(&args.hash, !args.unset, timestamp, &signing)?;
    emit(&outcome)
}
