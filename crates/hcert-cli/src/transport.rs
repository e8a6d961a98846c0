//! # Transport Subcommand
//!
//! Base45 encode/decode of proof bytes, the text form fed to a 2D
//! barcode rasterizer.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use hcert_codec::base45;

/// Arguments for the transport subcommand.
#[derive(Args, Debug)]
pub struct TransportArgs {
    #[command(subcommand)]
    pub command: TransportCommand,
}

#[derive(Subcommand, Debug)]
pub enum TransportCommand {
    /// Encode a binary file to Base45 text on stdout.
    Encode {
        /// Path to the binary input.
        file: PathBuf,
    },
    /// Decode Base45 text into a binary file.
    Decode {
        /// The Base45 text.
        text: String,
        /// Where to write the decoded bytes.
        #[arg(long)]
        out: PathBuf,
    },
}

pub fn run(args: TransportArgs) -> anyhow::Result<()> {
    match args.command {
        TransportCommand::Encode { file } => {
            let bytes =
                fs::read(&file).with_context(|| format!("cannot read {}", file.display()))?;
            println!("{}", base45::encode(&bytes));
        }
        TransportCommand::Decode { text, out } => {
            let bytes = base45::decode(text.trim())?;
            fs::write(&out, &bytes)
                .with_context(|| format!("cannot write {}", out.display()))?;
            println!("wrote {} bytes to {}", bytes.len(), out.display());
        }
    }
    Ok(())
}
