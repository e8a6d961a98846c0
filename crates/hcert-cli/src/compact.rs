//! # Compact Subcommand
//!
//! Issue and inspect compact certificates.

use std::path::Path;

use clap::{Args, Subcommand};
use hcert_compact::CompactCertificate;
use hcert_pki::store::{Artifact, CredentialStore, FsStore};

/// Arguments for the compact subcommand.
#[derive(Args, Debug)]
pub struct CompactArgs {
    #[command(subcommand)]
    pub command: CompactCommand,
}

#[derive(Subcommand, Debug)]
pub enum CompactCommand {
    /// Issue a compact certificate for an end entity.
    Issue {
        /// Name of the end entity. Its issuer must have a numeric name.
        entity: String,
    },
    /// Show an entity's stored compact certificate.
    Show {
        /// Name of the end entity.
        entity: String,
    },
}

pub fn run(store_path: &Path, args: CompactArgs) -> anyhow::Result<()> {
    let mut store = FsStore::open(store_path)?;
    match args.command {
        CompactCommand::Issue { entity } => {
            let compact = CompactCertificate::issue(&mut store, &entity)?;
            println!(
                "issued compact certificate for {entity:?} under issuer {}",
                compact.issuer_ref()
            );
        }
        CompactCommand::Show { entity } => {
            let bytes = store.get(&entity, Artifact::CompactCertificate)?;
            let compact = CompactCertificate::from_bytes(&bytes)?;
            print!("{}", compact.render_text());
        }
    }
    Ok(())
}
