//! # hcert-pki — Keys, Certificates, and the Credential Store
//!
//! Everything an issuance hierarchy needs:
//!
//! - [`keypair`] — ECDSA key pairs over three NIST curve strengths, one
//!   per tier of the hierarchy, with fixed-width and DER signature forms.
//! - [`x509`] — hand-built X.509 v3 certificates as DER trees: the
//!   to-be-signed layout, composing and signing, parsing and verifying.
//! - [`store`] — the [`store::CredentialStore`] trait with filesystem and
//!   in-memory backends; every binary artifact is written alongside an
//!   annotated text rendering.
//! - [`authority`] — entity lifecycle on top of the store: create a root,
//!   an intermediate authority, an end entity; load keys and certificates
//!   back; walk the chain up to the self-signed root.
//!
//! ## Crate Policy
//!
//! - Private keys never appear in logs or `Debug` output.
//! - Verification is all-or-nothing: any failure is a typed error, never
//!   a partial result.

pub mod authority;
pub mod keypair;
pub mod store;
pub mod x509;

pub use keypair::{CurveStrength, EcKeyPair, EcPublicKey};
pub use store::{Artifact, CredentialStore, FsStore, MemoryStore};
