//! # hcert-cli — Command-Line Interface
//!
//! Operator surface over the domain crates.
//!
//! ## Subcommands
//!
//! - `pki` — create roots, authorities, and end entities in a store
//! - `compact` — issue and inspect compact certificates
//! - `proof` — sign claims, verify and decode proofs
//! - `vaccination` — create and inspect vaccination records
//! - `transport` — Base45 encode/decode of proof bytes
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to domain crates; the only logic here is I/O and
//!   output formatting.

pub mod compact;
pub mod pki;
pub mod proof;
pub mod transport;
pub mod vaccination;
