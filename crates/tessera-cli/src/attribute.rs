//! # Set-Attribute Subcommand
//!
//! Records a free-form key/value sample scoped to the signer, on a
//! channel independent from logs.

use clap::Args;

use crate::context::{emit, open_service, KeyArgs};
use crate::create::now_secs;

/// Arguments for the set-attribute subcommand.
#[derive(Args, Debug)]
pub struct SetAttributeArgs {
    /// Content hash of the record.
    pub hash: String,

    /// Attribute key.
    #[arg(long)]
    pub attr_key: String,

    /// Attribute value.
    #[arg(long, default_value = "")]
    pub value: String,

    /// Timestamp in integer seconds; defaults to now.
    #[arg(long)]
    pub timestamp: Option<i64>,

    #[command(flatten)]
    pub key: KeyArgs,
}

pub fn run(args: SetAttributeArgs) -> anyhow::Result<()> {
    let service = open_service()?;
    let signing = args.key.signing_key()?;
    let timestamp = args.timestamp.unwrap_or_else(now_secs);
    let outcome =
        service
            .writer()
            .set_attribute(&args.hash, &args.attr_key, &args.value, timestamp, &signing)?;
    emit(&outcome)
}
