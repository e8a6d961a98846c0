//! # hcert-codec — Binary Encodings
//!
//! Every other crate in the workspace serializes through this one. Three
//! encodings live here:
//!
//! - [`cbor`] — the compact self-describing binary format used for claims,
//!   compact certificates, and signed proofs. Integers, text, byte strings,
//!   arrays, and maps, always in the smallest fixed-width representation.
//! - [`der`] — the nested tag-length-value tree used for certificate
//!   structures, round-trippable to and from its canonical serialization,
//!   with an annotated tree renderer for the store's text exports.
//! - [`base45`] — the radix-45 text mapping applied to proof payloads
//!   before 2D-barcode rasterization (the raster itself is external).
//!
//! ## Crate Policy
//!
//! - Encoding is deterministic: encode → decode → encode reproduces the
//!   original bytes.
//! - Decoding failures are typed: wrong node kind is a structure error,
//!   integer overflow of the target width an arithmetic error, malformed
//!   text a format error.

pub mod base45;
pub mod cbor;
pub mod der;

pub use cbor::Value;
pub use der::Tlv;
