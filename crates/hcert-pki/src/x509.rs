//! # Hand-Built X.509 v3 Certificates
//!
//! Certificates are composed directly as DER trees rather than through an
//! X.509 library, since the issuance hierarchy uses a fixed, minimal
//! layout:
//!
//! - version `[0] { INTEGER 2 }` (v3),
//! - serial number = the not-before instant as epoch seconds,
//! - signature algorithm `ecdsa-with-SHA{256,384,512}`, picked by the
//!   signer's curve strength,
//! - issuer and subject as a single commonName RDN,
//! - validity of ten years from not-before, seconds precision,
//! - an EC subjectPublicKeyInfo with the uncompressed point,
//! - a single subjectKeyIdentifier extension (SHA-1 of the key bits).

use hcert_core::{CryptoError, Timestamp};
use hcert_codec::Tlv;
use sha1::{Digest, Sha1};

use crate::keypair::{CurveStrength, EcKeyPair, EcPublicKey};

/// id-ecPublicKey.
pub const OID_EC_PUBLIC_KEY: &[u64] = &[1, 2, 840, 10045, 2, 1];
/// ecdsa-with-SHA256.
pub const OID_ECDSA_SHA256: &[u64] = &[1, 2, 840, 10045, 4, 3, 2];
/// ecdsa-with-SHA384.
pub const OID_ECDSA_SHA384: &[u64] = &[1, 2, 840, 10045, 4, 3, 3];
/// ecdsa-with-SHA512.
pub const OID_ECDSA_SHA512: &[u64] = &[1, 2, 840, 10045, 4, 3, 4];
/// id-at-commonName.
pub const OID_COMMON_NAME: &[u64] = &[2, 5, 4, 3];
/// id-ce-subjectKeyIdentifier.
pub const OID_SUBJECT_KEY_IDENTIFIER: &[u64] = &[2, 5, 29, 14];

/// Validity period granted to every certificate, in months.
const VALIDITY_MONTHS: u32 = 120;

/// A parsed or freshly issued certificate, held as its DER tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    root: Tlv,
}

impl Certificate {
    /// Issue a certificate for `subject_key` under `issuer`'s name,
    /// signed with `signer`. Self-signed when `subject == issuer` and
    /// `signer` is the subject's own key.
    pub fn issue(
        subject: &str,
        subject_key: &EcPublicKey,
        issuer: &str,
        signer: &EcKeyPair,
        not_before: Timestamp,
    ) -> Result<Self, CryptoError> {
        let tbs = build_tbs(subject, subject_key, issuer, signer.strength(), not_before)?;
        let signature = signer.sign_der(&tbs.to_der());
        let root = Tlv::Sequence(vec![
            tbs,
            signature_algorithm(signer.strength()),
            Tlv::BitString {
                unused_bits: 0,
                bytes: signature,
            },
        ]);
        Ok(Self { root })
    }

    /// Parse a certificate from DER bytes.
    pub fn from_der(bytes: &[u8]) -> Result<Self, CryptoError> {
        let root = Tlv::from_der(bytes).map_err(cert_err)?;
        let cert = Self { root };
        // Touch the fields a valid certificate must carry.
        cert.subject()?;
        cert.issuer()?;
        cert.public_key()?;
        Ok(cert)
    }

    /// Serialize back to DER.
    pub fn to_der(&self) -> Vec<u8> {
        self.root.to_der()
    }

    /// Annotated text rendering for the store's text exports.
    pub fn render_tree(&self) -> String {
        self.root.render_tree()
    }

    /// The subject commonName.
    pub fn subject(&self) -> Result<String, CryptoError> {
        self.common_name(5)
    }

    /// The issuer commonName.
    pub fn issuer(&self) -> Result<String, CryptoError> {
        self.common_name(3)
    }

    /// Whether subject and issuer name the same entity.
    pub fn is_self_signed(&self) -> Result<bool, CryptoError> {
        Ok(self.subject()? == self.issuer()?)
    }

    /// The not-before instant (also the serial number).
    pub fn not_before(&self) -> Result<Timestamp, CryptoError> {
        let validity = self.tbs()?.element(4).map_err(cert_err)?;
        validity
            .element(0)
            .and_then(Tlv::as_utc_time)
            .map_err(cert_err)
    }

    /// The subject's EC public key, with its strength taken from the
    /// named-curve OID inside subjectPublicKeyInfo.
    pub fn public_key(&self) -> Result<EcPublicKey, CryptoError> {
        let spki = self.tbs()?.element(6).map_err(cert_err)?;
        let algorithm = spki.element(0).map_err(cert_err)?;
        let key_type = algorithm
            .element(0)
            .and_then(Tlv::as_oid)
            .map_err(cert_err)?;
        if key_type != OID_EC_PUBLIC_KEY {
            return Err(CryptoError::InvalidCertificate(
                "subject key is not an EC key".into(),
            ));
        }
        let curve = algorithm
            .element(1)
            .and_then(Tlv::as_oid)
            .map_err(cert_err)?;
        let strength = CurveStrength::from_curve_oid(curve)?;
        let point = spki
            .element(1)
            .and_then(Tlv::as_bit_string)
            .map_err(cert_err)?;
        EcPublicKey::from_sec1(strength, point)
    }

    /// Verify this certificate's signature with the issuer's key.
    pub fn verify_signature(&self, issuer_key: &EcPublicKey) -> Result<(), CryptoError> {
        let tbs_der = self.tbs()?.to_der();
        let signature = self
            .root
            .element(2)
            .and_then(Tlv::as_bit_string)
            .map_err(cert_err)?;
        issuer_key.verify_der(&tbs_der, signature)
    }

    fn tbs(&self) -> Result<&Tlv, CryptoError> {
        self.root.element(0).map_err(cert_err)
    }

    fn common_name(&self, tbs_index: usize) -> Result<String, CryptoError> {
        let rdn = self.tbs()?.element(tbs_index).map_err(cert_err)?;
        rdn.element(0)
            .and_then(|set| set.element(0))
            .and_then(|attr| attr.element(1))
            .and_then(Tlv::as_printable_string)
            .map(str::to_owned)
            .map_err(cert_err)
    }
}

/// AlgorithmIdentifier for ECDSA, hash tier picked by curve strength.
pub fn signature_algorithm(strength: CurveStrength) -> Tlv {
    let oid = if strength.field_bits() <= 256 {
        OID_ECDSA_SHA256
    } else if strength.field_bits() <= 384 {
        OID_ECDSA_SHA384
    } else {
        OID_ECDSA_SHA512
    };
    Tlv::Sequence(vec![Tlv::Oid(oid.to_vec()), Tlv::Null])
}

/// A distinguished name carrying a single commonName attribute.
pub fn name(common_name: &str) -> Tlv {
    Tlv::Sequence(vec![Tlv::Set(vec![Tlv::Sequence(vec![
        Tlv::Oid(OID_COMMON_NAME.to_vec()),
        Tlv::PrintableString(common_name.to_owned()),
    ])])])
}

/// EC subjectPublicKeyInfo with the uncompressed point in the key bits.
pub fn subject_public_key_info(key: &EcPublicKey) -> Tlv {
    Tlv::Sequence(vec![
        Tlv::Sequence(vec![
            Tlv::Oid(OID_EC_PUBLIC_KEY.to_vec()),
            Tlv::Oid(key.strength().curve_oid().to_vec()),
        ]),
        Tlv::BitString {
            unused_bits: 0,
            bytes: key.uncompressed_point(),
        },
    ])
}

fn build_tbs(
    subject: &str,
    subject_key: &EcPublicKey,
    issuer: &str,
    signer_strength: CurveStrength,
    not_before: Timestamp,
) -> Result<Tlv, CryptoError> {
    let not_after = not_before
        .as_datetime()
        .checked_add_months(chrono::Months::new(VALIDITY_MONTHS))
        .ok_or_else(|| {
            CryptoError::InvalidCertificate("validity end is out of range".into())
        })?;
    let key_bits = subject_key.uncompressed_point();
    let ski: [u8; 20] = Sha1::digest(&key_bits).into();
    Ok(Tlv::Sequence(vec![
        Tlv::Context {
            tag: 0,
            elements: vec![Tlv::Integer(2)],
        },
        Tlv::Integer(not_before.epoch_secs() as i128),
        signature_algorithm(signer_strength),
        name(issuer),
        Tlv::Sequence(vec![
            Tlv::UtcTime(not_before),
            Tlv::UtcTime(Timestamp::from_utc(not_after)),
        ]),
        name(subject),
        subject_public_key_info(subject_key),
        Tlv::Context {
            tag: 3,
            elements: vec![Tlv::Sequence(vec![Tlv::Sequence(vec![
                Tlv::Oid(OID_SUBJECT_KEY_IDENTIFIER.to_vec()),
                Tlv::OctetString(Tlv::OctetString(ski.to_vec()).to_der()),
            ])])],
        },
    ]))
}

fn cert_err(e: hcert_core::CodecError) -> CryptoError {
    CryptoError::InvalidCertificate(e.to_string())
}
