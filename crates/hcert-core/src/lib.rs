//! # hcert-core — Foundational Types for the hcert Stack
//!
//! This crate is the bedrock of the hcert workspace. It defines the domain
//! primitives shared by every other crate: the error taxonomy, UTC-only
//! timestamps, the registrar/version dialect tags that select an encoding,
//! the disease code table, and the packed health-status value.
//! Every other crate in the workspace depends on `hcert-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed enums for wire codes.** `Registrar` and `Disease` are closed
//!    variants with explicit code tables and typed reverse lookup — an
//!    unknown code is a typed error, never a panic.
//!
//! 2. **Range checks at construction.** `HealthStatus` rejects out-of-range
//!    fields when built, so every live value packs into one octet.
//!
//! 3. **UTC-only timestamps.** `Timestamp` enforces UTC with seconds
//!    precision, matching the epoch-seconds wire encoding.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hcert-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod disease;
pub mod error;
pub mod registrar;
pub mod status;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use disease::Disease;
pub use error::{ClaimError, CodecError, CryptoError, HcertError, StoreError};
pub use registrar::{Dialect, Registrar};
pub use status::HealthStatus;
pub use temporal::Timestamp;
