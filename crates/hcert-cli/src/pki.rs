//! # PKI Subcommand
//!
//! Issuance hierarchy management: create roots, authorities, and end
//! entities inside a store, and print certificate chains.

use std::path::Path;

use clap::{Args, Subcommand};
use hcert_pki::authority;
use hcert_pki::store::FsStore;

/// Arguments for the pki subcommand.
#[derive(Args, Debug)]
pub struct PkiArgs {
    #[command(subcommand)]
    pub command: PkiCommand,
}

#[derive(Subcommand, Debug)]
pub enum PkiCommand {
    /// Create a self-signed root.
    Root {
        /// Name of the new root entity.
        name: String,
    },
    /// Create an intermediate authority under a parent.
    Authority {
        /// Name of the issuing parent entity.
        parent: String,
        /// Name of the new authority. Must be numeric if it will issue
        /// compact certificates.
        name: String,
    },
    /// Create an end entity under a parent.
    Entity {
        /// Name of the issuing parent entity.
        parent: String,
        /// Name of the new end entity.
        name: String,
    },
    /// Print an entity's certificate chain up to its root.
    Chain {
        /// Name of the entity to start from.
        name: String,
    },
}

pub fn run(store_path: &Path, args: PkiArgs) -> anyhow::Result<()> {
    let mut store = FsStore::open(store_path)?;
    match args.command {
        PkiCommand::Root { name } => {
            authority::create_root(&mut store, &name)?;
            println!("created root {name:?}");
        }
        PkiCommand::Authority { parent, name } => {
            authority::create_authority(&mut store, &parent, &name)?;
            println!("created authority {name:?} under {parent:?}");
        }
        PkiCommand::Entity { parent, name } => {
            authority::create_end_entity(&mut store, &parent, &name)?;
            println!("created end entity {name:?} under {parent:?}");
        }
        PkiCommand::Chain { name } => {
            for certificate in authority::chain(&store, &name)? {
                print!("{}", certificate.render_tree());
            }
        }
    }
    Ok(())
}
