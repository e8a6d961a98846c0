//! # Proof Subcommand
//!
//! Build claims, sign them into proofs, verify proofs against a store,
//! and decode them for inspection without trusting anything.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use hcert_core::{Disease, HealthStatus, Timestamp};
use hcert_pki::store::FsStore;
use hcert_proof::{Claim, SignedProof};

/// Arguments for the proof subcommand.
#[derive(Args, Debug)]
pub struct ProofArgs {
    #[command(subcommand)]
    pub command: ProofCommand,
}

/// The fields a claim is built from.
#[derive(Args, Debug)]
pub struct ClaimFields {
    /// Full name of the person the claim is about.
    #[arg(long)]
    pub name: String,
    /// Day of birth, `YYYY-MM-DD`.
    #[arg(long)]
    pub born: String,
    /// Expiry instant, RFC 3339 (any offset).
    #[arg(long)]
    pub expires: String,
    /// Health status entry `disease:shield:harmlessness`, repeatable.
    /// Diseases: covid19, covid19-b117, hepatitis-a, hepatitis-b,
    /// hepatitis-c.
    #[arg(long = "status", required = true)]
    pub status: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ProofCommand {
    /// Validate claim fields and print the claim without signing it.
    Create {
        #[command(flatten)]
        claim: ClaimFields,
    },
    /// Sign a claim with an end entity's key.
    Sign {
        /// Name of the signing end entity. Must hold a compact certificate.
        entity: String,
        #[command(flatten)]
        claim: ClaimFields,
        /// Where to write the proof bytes.
        #[arg(long)]
        out: PathBuf,
    },
    /// Verify a proof file against the store and print the claim.
    Verify {
        /// Path to the proof bytes.
        file: PathBuf,
    },
    /// Decode a proof file without verifying it.
    Decode {
        /// Path to the proof bytes.
        file: PathBuf,
    },
}

pub fn run(store_path: &Path, args: ProofArgs) -> anyhow::Result<()> {
    match args.command {
        ProofCommand::Create { claim } => {
            let claim = build_claim(&claim)?;
            println!("{}", claim_json(&claim)?);
        }
        ProofCommand::Sign { entity, claim, out } => {
            let store = FsStore::open(store_path)?;
            let claim = build_claim(&claim)?;
            let proof = SignedProof::sign(&store, &entity, &claim)?;
            let bytes = proof.to_bytes()?;
            fs::write(&out, &bytes)
                .with_context(|| format!("cannot write {}", out.display()))?;
            println!("wrote {} proof bytes to {}", bytes.len(), out.display());
        }
        ProofCommand::Verify { file } => {
            let store = FsStore::open(store_path)?;
            let proof = read_proof(&file)?;
            let claim = proof.verify(&store)?;
            println!("{}", claim_json(&claim)?);
        }
        ProofCommand::Decode { file } => {
            let proof = read_proof(&file)?;
            let claim = proof.peek_claim()?;
            println!("{}", claim_json(&claim)?);
        }
    }
    Ok(())
}

fn build_claim(fields: &ClaimFields) -> anyhow::Result<Claim> {
    let day_of_birth = chrono::NaiveDate::parse_from_str(&fields.born, "%Y-%m-%d")
        .with_context(|| format!("invalid day of birth {:?}", fields.born))?;
    let expires = Timestamp::parse_lenient(&fields.expires)?;
    let mut entries = BTreeMap::new();
    for entry in &fields.status {
        let (disease, health) = parse_status(entry)?;
        entries.insert(disease, health);
    }
    Ok(Claim::new(fields.name.clone(), day_of_birth, expires, entries)?)
}

fn read_proof(file: &Path) -> anyhow::Result<SignedProof> {
    let bytes = fs::read(file).with_context(|| format!("cannot read {}", file.display()))?;
    Ok(SignedProof::from_bytes(&bytes)?)
}

fn parse_status(entry: &str) -> anyhow::Result<(Disease, HealthStatus)> {
    let parts: Vec<&str> = entry.split(':').collect();
    let &[disease, shield, harmlessness] = parts.as_slice() else {
        anyhow::bail!("status entry must be disease:shield:harmlessness, got {entry:?}");
    };
    let disease = parse_disease(disease)?;
    let shield: u8 = shield
        .parse()
        .with_context(|| format!("invalid shield strength {shield:?}"))?;
    let harmlessness: u8 = harmlessness
        .parse()
        .with_context(|| format!("invalid harmlessness {harmlessness:?}"))?;
    Ok((disease, HealthStatus::new(shield, harmlessness)?))
}

fn parse_disease(name: &str) -> anyhow::Result<Disease> {
    match name.to_lowercase().as_str() {
        "covid19" => Ok(Disease::Covid19),
        "covid19-b117" => Ok(Disease::Covid19B117),
        "hepatitis-a" => Ok(Disease::HepatitisA),
        "hepatitis-b" => Ok(Disease::HepatitisB),
        "hepatitis-c" => Ok(Disease::HepatitisC),
        other => anyhow::bail!("unknown disease {other:?}"),
    }
}

fn claim_json(claim: &Claim) -> anyhow::Result<String> {
    let status: serde_json::Map<String, serde_json::Value> = claim
        .status()
        .iter()
        .map(|(disease, health)| {
            (
                disease.full_name().to_owned(),
                serde_json::json!({
                    "shieldStrength": health.shield_strength(),
                    "harmlessness": health.harmlessness(),
                }),
            )
        })
        .collect();
    let value = serde_json::json!({
        "name": claim.name(),
        "dayOfBirth": claim.day_of_birth().to_string(),
        "expires": claim.expires().to_iso8601(),
        "status": status,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
