//! # Signed Proofs
//!
//! A signed proof is three sequential top-level CBOR byte strings:
//!
//! ```text
//! bytes  claim wire form
//! bytes  end entity's fixed-width signature over the claim bytes
//! bytes  the end entity's compact certificate
//! ```
//!
//! Verification is all-or-nothing: the compact certificate must verify
//! against the store's trusted issuers, the signature must verify under
//! the certified subject key, and the claim bytes must decode. Any
//! failure yields an error, never a partial claim.

use hcert_codec::cbor::{self, Value};
use hcert_compact::CompactCertificate;
use hcert_core::{CodecError, HcertError};
use hcert_pki::authority;
use hcert_pki::store::{Artifact, CredentialStore};
use tracing::debug;

use crate::claim::Claim;

/// A claim, its signature, and the signer's compact certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedProof {
    claim_bytes: Vec<u8>,
    signature: Vec<u8>,
    compact: CompactCertificate,
}

impl SignedProof {
    /// Sign `claim` with `entity`'s key. The entity must already hold a
    /// compact certificate in its store slot.
    pub fn sign(
        store: &dyn CredentialStore,
        entity: &str,
        claim: &Claim,
    ) -> Result<Self, HcertError> {
        let claim_bytes = claim.encode()?;
        let key_pair = authority::load_key_pair(store, entity)?;
        let signature = key_pair.sign_fixed(&claim_bytes);
        let compact =
            CompactCertificate::from_bytes(&store.get(entity, Artifact::CompactCertificate)?)?;
        debug!(entity, claim_len = claim_bytes.len(), "signed proof");
        Ok(Self {
            claim_bytes,
            signature,
            compact,
        })
    }

    /// Serialize to the three-item wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, HcertError> {
        Ok(cbor::encode_all(&[
            Value::Bytes(self.claim_bytes.clone()),
            Value::Bytes(self.signature.clone()),
            Value::Bytes(self.compact.to_bytes()?),
        ])?)
    }

    /// Parse a proof from its wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HcertError> {
        let items = cbor::decode_exactly(bytes, 3)?;
        let claim_bytes = items[0].as_bytes()?.to_vec();
        let signature = items[1].as_bytes()?.to_vec();
        let compact = CompactCertificate::from_bytes(items[2].as_bytes()?)?;
        if signature.len() % 2 != 0 {
            return Err(CodecError::Format(format!(
                "signature of {} bytes cannot split into two halves",
                signature.len()
            ))
            .into());
        }
        Ok(Self {
            claim_bytes,
            signature,
            compact,
        })
    }

    /// Verify everything and return the claim.
    pub fn verify(&self, store: &dyn CredentialStore) -> Result<Claim, HcertError> {
        let subject_key = self.compact.verify(store)?;
        subject_key.verify_fixed(&self.claim_bytes, &self.signature)?;
        Ok(Claim::decode(&self.claim_bytes)?)
    }

    /// Decode the carried claim without verifying anything.
    ///
    /// For inspection only; [`SignedProof::verify`] is the way to trust
    /// the result.
    pub fn peek_claim(&self) -> Result<Claim, HcertError> {
        Ok(Claim::decode(&self.claim_bytes)?)
    }

    /// The compact certificate riding along with this proof.
    pub fn compact_certificate(&self) -> &CompactCertificate {
        &self.compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hcert_core::{Disease, HealthStatus, Timestamp};
    use hcert_pki::store::MemoryStore;
    use std::collections::BTreeMap;

    fn hierarchy() -> MemoryStore {
        let mut store = MemoryStore::new();
        authority::create_root(&mut store, "Root").unwrap();
        authority::create_authority(&mut store, "Root", "100").unwrap();
        authority::create_end_entity(&mut store, "100", "Issuer").unwrap();
        CompactCertificate::issue(&mut store, "Issuer").unwrap();
        store
    }

    fn sample_claim() -> Claim {
        let mut status = BTreeMap::new();
        status.insert(Disease::Covid19, HealthStatus::new(5, 4).unwrap());
        Claim::new(
            "John Doe",
            NaiveDate::from_ymd_opt(1968, 5, 27).unwrap(),
            Timestamp::parse("2021-08-27T15:46:39Z").unwrap(),
            status,
        )
        .unwrap()
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let store = hierarchy();
        let claim = sample_claim();
        let proof = SignedProof::sign(&store, "Issuer", &claim).unwrap();
        let bytes = proof.to_bytes().unwrap();
        let parsed = SignedProof::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.verify(&store).unwrap(), claim);
    }

    #[test]
    fn test_wire_form_is_three_byte_strings() {
        let store = hierarchy();
        let proof = SignedProof::sign(&store, "Issuer", &sample_claim()).unwrap();
        let items = cbor::decode_all(&proof.to_bytes().unwrap()).unwrap();
        assert_eq!(items.len(), 3);
        for item in &items {
            item.as_bytes().unwrap();
        }
    }

    #[test]
    fn test_tampered_claim_fails_verification() {
        let store = hierarchy();
        let proof = SignedProof::sign(&store, "Issuer", &sample_claim()).unwrap();
        let mut tampered = proof.clone();
        let last = tampered.claim_bytes.len() - 1;
        tampered.claim_bytes[last] ^= 0x01;
        assert!(tampered.verify(&store).is_err());
    }

    #[test]
    fn test_untrusted_store_fails_verification() {
        let store = hierarchy();
        let proof = SignedProof::sign(&store, "Issuer", &sample_claim()).unwrap();
        let untrusted = MemoryStore::new();
        assert!(proof.verify(&untrusted).is_err());
    }

    #[test]
    fn test_sign_requires_compact_certificate() {
        let mut store = MemoryStore::new();
        authority::create_root(&mut store, "Root").unwrap();
        authority::create_authority(&mut store, "Root", "100").unwrap();
        authority::create_end_entity(&mut store, "100", "Issuer").unwrap();
        let err = SignedProof::sign(&store, "Issuer", &sample_claim()).unwrap_err();
        assert!(matches!(
            err,
            HcertError::Store(hcert_core::StoreError::ArtifactMissing { .. })
        ));
    }

    #[test]
    fn test_peek_does_not_verify() {
        let store = hierarchy();
        let proof = SignedProof::sign(&store, "Issuer", &sample_claim()).unwrap();
        let untrusted = MemoryStore::new();
        assert!(proof.verify(&untrusted).is_err());
        assert_eq!(proof.peek_claim().unwrap(), sample_claim());
    }
}
