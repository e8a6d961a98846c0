//! # hcert-compact — Compact Binary Certificates
//!
//! A full X.509 certificate is far too large to ride along inside every
//! signed proof, so end entities carry a compact form instead:
//!
//! ```text
//! message  = CBOR(integer issuer reference) ‖ CBOR(bytes compressed point)
//! artifact = CBOR array [ bytes message, bytes signature ]
//! ```
//!
//! The issuer reference is the issuer's entity name parsed as a number,
//! which is why issuing authorities are named numerically. The signature
//! is the issuer's fixed-width ECDSA over the message bytes. Verification
//! resolves the reference back to the issuer's public key in the
//! credential store; there is no chain walk, the store *is* the set of
//! trusted issuers. The subject's key is always a P-256 point, the
//! end-entity tier of the current dialect.

use hcert_codec::cbor::{self, Value};
use hcert_core::{ClaimError, CryptoError, HcertError};
use hcert_pki::authority;
use hcert_pki::keypair::{CurveStrength, EcPublicKey};
use hcert_pki::store::{Artifact, CredentialStore};
use tracing::debug;

/// A compact certificate binding a subject key to a numeric issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactCertificate {
    issuer_ref: i64,
    subject_point: Vec<u8>,
    signature: Vec<u8>,
}

impl CompactCertificate {
    /// Issue a compact certificate for `entity` and store it in the
    /// entity's slot.
    ///
    /// The entity's issuer is taken from its X.509 certificate; its name
    /// must parse as a number to serve as the issuer reference.
    pub fn issue(
        store: &mut dyn CredentialStore,
        entity: &str,
    ) -> Result<Self, HcertError> {
        let certificate = authority::load_certificate(store, entity)?;
        let issuer_name = certificate.issuer()?;
        let issuer_ref: i64 = issuer_name.parse().map_err(|_| {
            ClaimError::Format(format!(
                "issuer name {issuer_name:?} is not a numeric reference"
            ))
        })?;
        let subject_point = certificate.public_key()?.compressed_point();

        let compact = {
            let issuer_key = authority::load_key_pair(store, &issuer_name)?;
            let mut partial = Self {
                issuer_ref,
                subject_point,
                signature: Vec::new(),
            };
            partial.signature = issuer_key.sign_fixed(&partial.message()?);
            partial
        };

        store.put(
            entity,
            Artifact::CompactCertificate,
            &compact.to_bytes()?,
            &compact.render_text(),
        )?;
        debug!(entity, issuer_ref, "issued compact certificate");
        Ok(compact)
    }

    /// Parse a compact certificate from its artifact bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HcertError> {
        let artifact = Value::from_bytes(bytes)?;
        let parts = artifact.as_array()?;
        if parts.len() != 2 {
            return Err(hcert_core::CodecError::Structure(format!(
                "compact certificate array must have 2 elements, got {}",
                parts.len()
            ))
            .into());
        }
        let message = parts[0].as_bytes()?;
        let signature = parts[1].as_bytes()?.to_vec();

        let items = cbor::decode_exactly(message, 2)?;
        let issuer_ref = items[0].as_i64()?;
        let subject_point = items[1].as_bytes()?.to_vec();
        Ok(Self {
            issuer_ref,
            subject_point,
            signature,
        })
    }

    /// Serialize to the artifact form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, HcertError> {
        let artifact = Value::Array(vec![
            Value::Bytes(self.message()?),
            Value::Bytes(self.signature.clone()),
        ]);
        Ok(artifact.to_bytes()?)
    }

    /// The signed message: issuer reference then compressed point.
    pub fn message(&self) -> Result<Vec<u8>, HcertError> {
        Ok(cbor::encode_all(&[
            Value::Integer(self.issuer_ref as i128),
            Value::Bytes(self.subject_point.clone()),
        ])?)
    }

    /// The numeric issuer reference.
    pub fn issuer_ref(&self) -> i64 {
        self.issuer_ref
    }

    /// Verify the issuer's signature and return the subject's key.
    ///
    /// Resolves the issuer reference in `store`; a reference the store
    /// cannot resolve, a bad signature, or a point that does not lie on
    /// the curve all fail as `InvalidCertificate`.
    pub fn verify(&self, store: &dyn CredentialStore) -> Result<EcPublicKey, HcertError> {
        let issuer_key = authority::load_public_key(store, &self.issuer_ref.to_string())
            .map_err(|e| {
                CryptoError::InvalidCertificate(format!(
                    "cannot resolve issuer reference {}: {e}",
                    self.issuer_ref
                ))
            })?;
        issuer_key
            .verify_fixed(&self.message()?, &self.signature)
            .map_err(|e| {
                CryptoError::InvalidCertificate(format!("issuer signature rejected: {e}"))
            })?;
        let subject = EcPublicKey::from_sec1(CurveStrength::P256, &self.subject_point)
            .map_err(|e| {
                CryptoError::InvalidCertificate(format!("subject point rejected: {e}"))
            })?;
        Ok(subject)
    }

    /// Annotated text rendering for the store's text export.
    pub fn render_text(&self) -> String {
        format!(
            "COMPACT CERTIFICATE\n|  issuer reference {}\n|  subject point {}\n|  signature {}\n",
            self.issuer_ref,
            hcert_codec::der::to_hex(&self.subject_point),
            hcert_codec::der::to_hex(&self.signature),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcert_pki::store::MemoryStore;

    fn hierarchy() -> MemoryStore {
        let mut store = MemoryStore::new();
        authority::create_root(&mut store, "Root").unwrap();
        authority::create_authority(&mut store, "Root", "100").unwrap();
        authority::create_end_entity(&mut store, "100", "Issuer").unwrap();
        store
    }

    #[test]
    fn test_issue_and_verify() {
        let mut store = hierarchy();
        let compact = CompactCertificate::issue(&mut store, "Issuer").unwrap();
        assert_eq!(compact.issuer_ref(), 100);
        let subject_key = compact.verify(&store).unwrap();
        let cert = authority::load_certificate(&store, "Issuer").unwrap();
        assert_eq!(subject_key, cert.public_key().unwrap());
    }

    #[test]
    fn test_artifact_roundtrip() {
        let mut store = hierarchy();
        let compact = CompactCertificate::issue(&mut store, "Issuer").unwrap();
        let stored = store.get("Issuer", Artifact::CompactCertificate).unwrap();
        let parsed = CompactCertificate::from_bytes(&stored).unwrap();
        assert_eq!(parsed, compact);
        parsed.verify(&store).unwrap();
    }

    #[test]
    fn test_non_numeric_issuer_rejected() {
        let mut store = MemoryStore::new();
        authority::create_root(&mut store, "Root").unwrap();
        authority::create_end_entity(&mut store, "Root", "Issuer").unwrap();
        let err = CompactCertificate::issue(&mut store, "Issuer").unwrap_err();
        assert!(matches!(err, HcertError::Claim(ClaimError::Format(_))));
    }

    #[test]
    fn test_unknown_issuer_reference_fails_verification() {
        let mut store = hierarchy();
        let compact = CompactCertificate::issue(&mut store, "Issuer").unwrap();
        let empty = MemoryStore::new();
        let err = compact.verify(&empty).unwrap_err();
        assert!(matches!(
            err,
            HcertError::Crypto(CryptoError::InvalidCertificate(_))
        ));
    }

    #[test]
    fn test_tampered_signature_fails() {
        let mut store = hierarchy();
        let compact = CompactCertificate::issue(&mut store, "Issuer").unwrap();
        let mut bytes = compact.to_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = CompactCertificate::from_bytes(&bytes).unwrap();
        let err = tampered.verify(&store).unwrap_err();
        assert!(matches!(
            err,
            HcertError::Crypto(CryptoError::InvalidCertificate(_))
        ));
    }

    #[test]
    fn test_tampered_point_fails_as_invalid_certificate() {
        let mut store = hierarchy();
        let compact = CompactCertificate::issue(&mut store, "Issuer").unwrap();
        let mut tampered = compact.clone();
        tampered.subject_point[1] ^= 0x01;
        let err = tampered.verify(&store).unwrap_err();
        assert!(matches!(
            err,
            HcertError::Crypto(CryptoError::InvalidCertificate(_))
        ));
    }

    #[test]
    fn test_malformed_artifact_rejected() {
        assert!(CompactCertificate::from_bytes(&[0x01]).is_err());
        let wrong_arity = Value::Array(vec![Value::Integer(1)]).to_bytes().unwrap();
        assert!(CompactCertificate::from_bytes(&wrong_arity).is_err());
    }
}
