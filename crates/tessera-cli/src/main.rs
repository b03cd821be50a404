//! # tessera CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Tessera evidence ledger CLI.
///
/// Notarizes content hashes on an append-only ledger and reads back
/// per-signer attestation snapshots. Connection settings come from
/// `TESSERA_*` environment variables.
#[derive(Parser, Debug)]
#[command(name = "tessera", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Notarize a content hash, optionally binding an alias.
    Create(tessera_cli::create::CreateArgs),
    /// Read and fold a record, by hash or alias.
    Get(tessera_cli::read::GetArgs),
    /// Append a signature/log sample to a record.
    AddLog(tessera_cli::log::AddLogArgs),
    /// Record a key/value sample for the signer.
    SetAttribute(tessera_cli::attribute::SetAttributeArgs),
    /// Set or clear the signer's revoked flag.
    Revoke(tessera_cli::revoke::RevokeArgs),
    /// Resolve an alias to its bound hash.
    ResolveKey(tessera_cli::read::ResolveKeyArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create(args) => tessera_cli::create::run(args),
        Commands::Get(args) => tessera_cli::read::run(args),
        Commands::AddLog(args) => tessera_cli::log::run(args),
        Commands::SetAttribute(args) => tessera_cli::attribute::run(args),
        Commands::Revoke(args) => tessera_cli::revoke::run(args),
        Commands::ResolveKey(args) => tessera_cli::read::run_resolve(args),
    }
}
