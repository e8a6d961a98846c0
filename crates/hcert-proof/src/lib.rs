//! # hcert-proof — Claims and Signed Proofs
//!
//! The top of the stack. A [`Claim`] states a person's health status per
//! disease, with a name, day of birth, and expiry. A [`SignedProof`] wraps
//! the claim's wire bytes with an end entity's signature and its compact
//! certificate, so a verifier needs nothing but the proof bytes and a
//! credential store holding the trusted issuers. A [`VaccinationRecord`]
//! documents the inoculation itself, including data a proof omits.

pub mod claim;
pub mod proof;
pub mod vaccination;

pub use claim::Claim;
pub use proof::SignedProof;
pub use vaccination::{PersonalInfo, Vaccination, VaccinationRecord, Vaccine};
