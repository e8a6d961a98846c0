//! # Vaccination Subcommand
//!
//! Create and inspect certificate-of-vaccination records. Records are
//! plain DER files; they carry no signature of their own and need no
//! credential store.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use hcert_proof::{PersonalInfo, Vaccination, VaccinationRecord, Vaccine};

/// Arguments for the vaccination subcommand.
#[derive(Args, Debug)]
pub struct VaccinationArgs {
    #[command(subcommand)]
    pub command: VaccinationCommand,
}

#[derive(Subcommand, Debug)]
pub enum VaccinationCommand {
    /// Create a vaccination record and write it as DER.
    Create {
        /// Full name of the person inoculated.
        #[arg(long)]
        name: String,
        /// Day of birth, `YYYY-MM-DD`.
        #[arg(long)]
        born: String,
        /// Email address of the person.
        #[arg(long)]
        email: String,
        /// Manufacturer of the vaccine.
        #[arg(long)]
        manufacturer: String,
        /// Name of the vaccine.
        #[arg(long)]
        vaccine: String,
        /// Identifier of the ampoule batch.
        #[arg(long)]
        batch: String,
        /// Date of vaccination, `YYYY-MM-DD`.
        #[arg(long)]
        date: String,
        /// Where to write the record bytes.
        #[arg(long)]
        out: PathBuf,
    },
    /// Decode a vaccination record file and print it.
    Show {
        /// Path to the record bytes.
        file: PathBuf,
    },
}

pub fn run(args: VaccinationArgs) -> anyhow::Result<()> {
    match args.command {
        VaccinationCommand::Create {
            name,
            born,
            email,
            manufacturer,
            vaccine,
            batch,
            date,
            out,
        } => {
            let record = VaccinationRecord::new(
                PersonalInfo::new(name, parse_date(&born)?, email)?,
                Vaccination::new(Vaccine::new(manufacturer, vaccine), batch, parse_date(&date)?),
            );
            fs::write(&out, record.to_der())
                .with_context(|| format!("cannot write {}", out.display()))?;
            print!("{}", record.render_text());
        }
        VaccinationCommand::Show { file } => {
            let bytes =
                fs::read(&file).with_context(|| format!("cannot read {}", file.display()))?;
            let record = VaccinationRecord::from_der(&bytes)?;
            print!("{}", record.render_text());
        }
    }
    Ok(())
}

fn parse_date(text: &str) -> anyhow::Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid date {text:?}, expected YYYY-MM-DD"))
}
