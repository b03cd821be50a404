//! # Add-Log Subcommand
//!
//! Appends a signature/log sample onto an existing record.

use clap::Args;

use crate::context::{emit, open_service, KeyArgs};
use crate::create::now_secs;

/// Arguments for the add-log subcommand.
#[derive(Args, Debug)]
pub struct AddLogArgs {
    /// Content hash of the record, or an alias with `--by-key`.
    pub target: String,

    /// Treat the target as a custom key instead of a hash.
    #[arg(long)]
    pub by_key: bool,

    /// Signature to record alongside the log entry.
    #[arg(long, default_value = "")]
    pub signature: String,

    /// Log entry to append.
    #[arg(long)]
    pub log: String,

    /// Timestamp in integer seconds; defaults to now.
    #[arg(long)]
    pub timestamp: Option<i64>,

    #[command(flatten)]
    pub key: KeyArgs,
}

pub fn run(args: AddLogArgs) -> anyhow::Result<()> {
    let service = open_service()?;
    let signing = args.key.signing_key()?;
    let timestamp = args.timestamp.unwrap_or_else(now_secs);
    let writer = service.writer();
    let outcome = if args.by_key {
        writer.add_log_by_custom_key(&args.target, &args.signature, &args.log, timestamp, &signing)?
    } else {
        writer.add_log(&args.target, &args.signature, &args.log, timestamp, &signing)?
    };
    emit(&outcome)
}
