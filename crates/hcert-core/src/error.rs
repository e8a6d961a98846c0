//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the hcert stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Errors are raised synchronously at the point of detection and
//!   propagated to the caller; there is no internal retry.
//! - No error is downgraded to a default value — a failed verification
//!   never yields a partially decoded claim.
//! - Each concern (store, codec, crypto, claim) has its own enum; the
//!   CLI boundary collects them in [`HcertError`].

use thiserror::Error;

/// Top-level error type, used where operations cross concern boundaries.
#[derive(Error, Debug)]
pub enum HcertError {
    /// Credential store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Binary encoding or decoding failure.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Cryptographic failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Claim construction or dialect failure.
    #[error(transparent)]
    Claim(#[from] ClaimError),
}

/// Error in credential-store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An entity with this name is already present; creation is not a no-op.
    #[error("entity {0:?} already exists")]
    EntityExists(String),

    /// The named parent entity does not exist in the store.
    #[error("parent entity {0:?} absent")]
    ParentAbsent(String),

    /// Name lookup failed anywhere in the tree.
    #[error("entity {0:?} not found")]
    NotFound(String),

    /// The requested artifact is not stored for this entity.
    #[error("artifact {artifact} missing for entity {name:?}")]
    ArtifactMissing {
        /// Entity the artifact was requested for.
        name: String,
        /// Human-readable artifact description.
        artifact: String,
    },

    /// Underlying filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error in binary encoding/decoding (CBOR items, DER TLV, Base45).
#[derive(Error, Debug)]
pub enum CodecError {
    /// Decoded value has the wrong shape or kind, or too few elements.
    #[error("structure error: {0}")]
    Structure(String),

    /// Decoded integer exceeds the target integer width.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Malformed input that is not a structural issue (bad alphabet,
    /// odd signature length, non-numeric reference).
    #[error("format error: {0}")]
    Format(String),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key generation, parsing, or point decompression failed.
    #[error("key error: {0}")]
    Key(String),

    /// Compact-certificate verification failed.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Signature verification failed, or the signed proof is malformed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

/// Error in claim construction and dialect dispatch.
#[derive(Error, Debug)]
pub enum ClaimError {
    /// A bounded field is outside its permitted range.
    #[error("{field} out of range [0, {max}]: {value}")]
    Range {
        /// Name of the offending field.
        field: &'static str,
        /// Inclusive upper bound of the field.
        max: u8,
        /// The rejected value.
        value: i64,
    },

    /// The (registrar, version) pair selects no implemented dialect.
    #[error("unsupported version: registrar {registrar}, version {version}")]
    UnsupportedVersion {
        /// Wire identifier of the registrar.
        registrar: i64,
        /// Version number assigned by the registrar.
        version: i64,
    },

    /// Reverse lookup of a disease code found no variant.
    #[error("unknown disease code: {0}")]
    UnknownDisease(i64),

    /// Malformed date string or other textual field.
    #[error("format error: {0}")]
    Format(String),
}
