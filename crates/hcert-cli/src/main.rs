//! # hcert CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::path::PathBuf;

use clap::Parser;

/// hcert — signed health-status credentials over a small PKI.
///
/// Manages an issuance hierarchy in a credential store, issues compact
/// certificates, signs health-status claims into proofs, and verifies
/// them back.
#[derive(Parser, Debug)]
#[command(name = "hcert", version, about)]
struct Cli {
    /// Root directory of the credential store.
    #[arg(long, global = true, default_value = "hcert-store")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Issuance hierarchy management.
    Pki(hcert_cli::pki::PkiArgs),
    /// Compact certificate operations.
    Compact(hcert_cli::compact::CompactArgs),
    /// Claim signing, verification, and inspection.
    Proof(hcert_cli::proof::ProofArgs),
    /// Vaccination record creation and inspection.
    Vaccination(hcert_cli::vaccination::VaccinationArgs),
    /// Base45 transport encoding.
    Transport(hcert_cli::transport::TransportArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pki(args) => hcert_cli::pki::run(&cli.store, args),
        Commands::Compact(args) => hcert_cli::compact::run(&cli.store, args),
        Commands::Proof(args) => hcert_cli::proof::run(&cli.store, args),
        Commands::Vaccination(args) => hcert_cli::vaccination::run(args),
        Commands::Transport(args) => hcert_cli::transport::run(args),
    }
}
