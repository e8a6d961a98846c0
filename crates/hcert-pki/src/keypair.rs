//! # ECDSA Key Pairs Over Tiered Curve Strengths
//!
//! The issuance hierarchy signs with ECDSA over one of three NIST prime
//! curves, strongest at the top:
//!
//! - roots sign on P-521,
//! - intermediate authorities on P-384,
//! - end entities on P-256.
//!
//! The message digest follows the curve (SHA-256 / SHA-384 / SHA-512), so
//! a key's strength fully determines its signature algorithm. Signatures
//! exist in two forms: the fixed-width `R ‖ S` concatenation used inside
//! compact structures (each half exactly one coordinate wide) and ASN.1
//! DER for X.509 certificates.
//!
//! Private keys are never serialized or logged; `EcKeyPair` exposes its
//! secret scalar only through [`EcKeyPair::scalar_bytes`], which the
//! credential store wraps into a key file.

use ecdsa::signature::{Signer, Verifier};
use hcert_core::CryptoError;
use rand::rngs::OsRng;

/// The three curve strengths used by the issuance hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveStrength {
    /// NIST P-256, end-entity tier.
    P256,
    /// NIST P-384, intermediate-authority tier.
    P384,
    /// NIST P-521, root tier.
    P521,
}

impl CurveStrength {
    /// Size of the prime field in bits.
    pub fn field_bits(&self) -> u32 {
        match self {
            CurveStrength::P256 => 256,
            CurveStrength::P384 => 384,
            CurveStrength::P521 => 521,
        }
    }

    /// Width of one coordinate (and of each signature half) in bytes.
    pub fn coordinate_bytes(&self) -> usize {
        match self {
            CurveStrength::P256 => 32,
            CurveStrength::P384 => 48,
            CurveStrength::P521 => 66,
        }
    }

    /// The named-curve OBJECT IDENTIFIER arcs.
    pub fn curve_oid(&self) -> &'static [u64] {
        match self {
            CurveStrength::P256 => &[1, 2, 840, 10045, 3, 1, 7],
            CurveStrength::P384 => &[1, 3, 132, 0, 34],
            CurveStrength::P521 => &[1, 3, 132, 0, 35],
        }
    }

    /// Resolve a named-curve OID back to a strength.
    pub fn from_curve_oid(arcs: &[u64]) -> Result<Self, CryptoError> {
        for strength in [CurveStrength::P256, CurveStrength::P384, CurveStrength::P521] {
            if strength.curve_oid() == arcs {
                return Ok(strength);
            }
        }
        let dotted: Vec<String> = arcs.iter().map(u64::to_string).collect();
        Err(CryptoError::Key(format!(
            "unsupported named curve {}",
            dotted.join(".")
        )))
    }
}

impl std::fmt::Display for CurveStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveStrength::P256 => f.write_str("P-256"),
            CurveStrength::P384 => f.write_str("P-384"),
            CurveStrength::P521 => f.write_str("P-521"),
        }
    }
}

/// An ECDSA signing key on one of the three supported curves.
pub enum EcKeyPair {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    P521(p521::ecdsa::SigningKey),
}

/// An ECDSA verifying key on one of the three supported curves.
#[derive(Clone)]
pub enum EcPublicKey {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
    P521(p521::ecdsa::VerifyingKey),
}

// ---------------------------------------------------------------------------
// EcKeyPair impls
// ---------------------------------------------------------------------------

impl EcKeyPair {
    /// Generate a fresh random key pair at the given strength.
    pub fn generate(strength: CurveStrength) -> Self {
        match strength {
            CurveStrength::P256 => EcKeyPair::P256(p256::ecdsa::SigningKey::random(&mut OsRng)),
            CurveStrength::P384 => EcKeyPair::P384(p384::ecdsa::SigningKey::random(&mut OsRng)),
            CurveStrength::P521 => EcKeyPair::P521(p521::ecdsa::SigningKey::random(&mut OsRng)),
        }
    }

    /// Rebuild a key pair from its secret scalar bytes.
    pub fn from_scalar_bytes(strength: CurveStrength, bytes: &[u8]) -> Result<Self, CryptoError> {
        let key_err = |e: ecdsa::Error| CryptoError::Key(format!("invalid secret scalar: {e}"));
        match strength {
            CurveStrength::P256 => p256::ecdsa::SigningKey::from_slice(bytes)
                .map(EcKeyPair::P256)
                .map_err(key_err),
            CurveStrength::P384 => p384::ecdsa::SigningKey::from_slice(bytes)
                .map(EcKeyPair::P384)
                .map_err(key_err),
            CurveStrength::P521 => p521::ecdsa::SigningKey::from_slice(bytes)
                .map(EcKeyPair::P521)
                .map_err(key_err),
        }
    }

    /// The curve strength this key signs on.
    pub fn strength(&self) -> CurveStrength {
        match self {
            EcKeyPair::P256(_) => CurveStrength::P256,
            EcKeyPair::P384(_) => CurveStrength::P384,
            EcKeyPair::P521(_) => CurveStrength::P521,
        }
    }

    /// The verifying half of this key pair.
    pub fn public_key(&self) -> EcPublicKey {
        match self {
            EcKeyPair::P256(sk) => EcPublicKey::P256(p256::ecdsa::VerifyingKey::from(sk)),
            EcKeyPair::P384(sk) => EcPublicKey::P384(p384::ecdsa::VerifyingKey::from(sk)),
            EcKeyPair::P521(sk) => EcPublicKey::P521(p521::ecdsa::VerifyingKey::from(sk)),
        }
    }

    /// The secret scalar, big-endian, one coordinate wide.
    pub fn scalar_bytes(&self) -> Vec<u8> {
        match self {
            EcKeyPair::P256(sk) => sk.to_bytes().to_vec(),
            EcKeyPair::P384(sk) => sk.to_bytes().to_vec(),
            EcKeyPair::P521(sk) => sk.to_bytes().to_vec(),
        }
    }

    /// Sign `message`, returning the fixed-width `R ‖ S` form
    /// (`2 × coordinate_bytes` long). The digest follows the curve.
    pub fn sign_fixed(&self, message: &[u8]) -> Vec<u8> {
        match self {
            EcKeyPair::P256(sk) => {
                let sig: p256::ecdsa::Signature = sk.sign(message);
                sig.to_bytes().to_vec()
            }
            EcKeyPair::P384(sk) => {
                let sig: p384::ecdsa::Signature = sk.sign(message);
                sig.to_bytes().to_vec()
            }
            EcKeyPair::P521(sk) => {
                let sig: p521::ecdsa::Signature = sk.sign(message);
                sig.to_bytes().to_vec()
            }
        }
    }

    /// Sign `message`, returning the ASN.1 DER form used in certificates.
    pub fn sign_der(&self, message: &[u8]) -> Vec<u8> {
        match self {
            EcKeyPair::P256(sk) => {
                let sig: p256::ecdsa::Signature = sk.sign(message);
                sig.to_der().to_bytes().to_vec()
            }
            EcKeyPair::P384(sk) => {
                let sig: p384::ecdsa::Signature = sk.sign(message);
                sig.to_der().to_bytes().to_vec()
            }
            EcKeyPair::P521(sk) => {
                let sig: p521::ecdsa::Signature = sk.sign(message);
                sig.to_der().to_bytes().to_vec()
            }
        }
    }
}

impl std::fmt::Debug for EcKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EcKeyPair({}, <private>)", self.strength())
    }
}

// ---------------------------------------------------------------------------
// EcPublicKey impls
// ---------------------------------------------------------------------------

impl EcPublicKey {
    /// Rebuild a public key from a SEC1 point (compressed or uncompressed).
    pub fn from_sec1(strength: CurveStrength, bytes: &[u8]) -> Result<Self, CryptoError> {
        let key_err = |e: ecdsa::Error| CryptoError::Key(format!("invalid curve point: {e}"));
        match strength {
            CurveStrength::P256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                .map(EcPublicKey::P256)
                .map_err(key_err),
            CurveStrength::P384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                .map(EcPublicKey::P384)
                .map_err(key_err),
            CurveStrength::P521 => p521::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                .map(EcPublicKey::P521)
                .map_err(key_err),
        }
    }

    /// The curve strength this key verifies on.
    pub fn strength(&self) -> CurveStrength {
        match self {
            EcPublicKey::P256(_) => CurveStrength::P256,
            EcPublicKey::P384(_) => CurveStrength::P384,
            EcPublicKey::P521(_) => CurveStrength::P521,
        }
    }

    /// SEC1 compressed point: one parity octet plus the X coordinate.
    pub fn compressed_point(&self) -> Vec<u8> {
        self.encoded_point(true)
    }

    /// SEC1 uncompressed point: `0x04 ‖ X ‖ Y`.
    pub fn uncompressed_point(&self) -> Vec<u8> {
        self.encoded_point(false)
    }

    fn encoded_point(&self, compress: bool) -> Vec<u8> {
        match self {
            EcPublicKey::P256(vk) => vk.to_encoded_point(compress).as_bytes().to_vec(),
            EcPublicKey::P384(vk) => vk.to_encoded_point(compress).as_bytes().to_vec(),
            EcPublicKey::P521(vk) => vk.to_encoded_point(compress).as_bytes().to_vec(),
        }
    }

    /// Verify a fixed-width `R ‖ S` signature over `message`.
    pub fn verify_fixed(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let tau = self.strength().coordinate_bytes();
        if signature.len() != 2 * tau {
            return Err(CryptoError::InvalidSignature(format!(
                "signature must be {} bytes on {}, got {}",
                2 * tau,
                self.strength(),
                signature.len()
            )));
        }
        let parse_err =
            |e: ecdsa::Error| CryptoError::InvalidSignature(format!("malformed signature: {e}"));
        let verify_err =
            |e: ecdsa::Error| CryptoError::InvalidSignature(format!("verification failed: {e}"));
        match self {
            EcPublicKey::P256(vk) => {
                let sig = p256::ecdsa::Signature::from_slice(signature).map_err(parse_err)?;
                vk.verify(message, &sig).map_err(verify_err)
            }
            EcPublicKey::P384(vk) => {
                let sig = p384::ecdsa::Signature::from_slice(signature).map_err(parse_err)?;
                vk.verify(message, &sig).map_err(verify_err)
            }
            EcPublicKey::P521(vk) => {
                let sig = p521::ecdsa::Signature::from_slice(signature).map_err(parse_err)?;
                vk.verify(message, &sig).map_err(verify_err)
            }
        }
    }

    /// Verify an ASN.1 DER signature over `message`.
    pub fn verify_der(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let parse_err =
            |e: ecdsa::Error| CryptoError::InvalidSignature(format!("malformed signature: {e}"));
        let verify_err =
            |e: ecdsa::Error| CryptoError::InvalidSignature(format!("verification failed: {e}"));
        match self {
            EcPublicKey::P256(vk) => {
                let sig = p256::ecdsa::Signature::from_der(signature).map_err(parse_err)?;
                vk.verify(message, &sig).map_err(verify_err)
            }
            EcPublicKey::P384(vk) => {
                let sig = p384::ecdsa::Signature::from_der(signature).map_err(parse_err)?;
                vk.verify(message, &sig).map_err(verify_err)
            }
            EcPublicKey::P521(vk) => {
                let sig = p521::ecdsa::Signature::from_der(signature).map_err(parse_err)?;
                vk.verify(message, &sig).map_err(verify_err)
            }
        }
    }
}

// p521's verifying key carries no PartialEq of its own, so equality is
// defined over the curve and the point for all three strengths.
impl PartialEq for EcPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.strength() == other.strength()
            && self.uncompressed_point() == other.uncompressed_point()
    }
}

impl Eq for EcPublicKey {}

impl std::fmt::Debug for EcPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let point = self.compressed_point();
        let prefix: String = point.iter().take(4).map(|b| format!("{b:02x}")).collect();
        write!(f, "EcPublicKey({}, {prefix}...)", self.strength())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_widths() {
        assert_eq!(CurveStrength::P256.coordinate_bytes(), 32);
        assert_eq!(CurveStrength::P384.coordinate_bytes(), 48);
        assert_eq!(CurveStrength::P521.coordinate_bytes(), 66);
    }

    #[test]
    fn test_curve_oid_roundtrip() {
        for strength in [CurveStrength::P256, CurveStrength::P384, CurveStrength::P521] {
            assert_eq!(
                CurveStrength::from_curve_oid(strength.curve_oid()).unwrap(),
                strength
            );
        }
        assert!(CurveStrength::from_curve_oid(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_sign_fixed_width() {
        for strength in [CurveStrength::P256, CurveStrength::P384, CurveStrength::P521] {
            let kp = EcKeyPair::generate(strength);
            let sig = kp.sign_fixed(b"payload");
            assert_eq!(sig.len(), 2 * strength.coordinate_bytes());
            kp.public_key().verify_fixed(b"payload", &sig).unwrap();
        }
    }

    #[test]
    fn test_sign_der_verifies() {
        let kp = EcKeyPair::generate(CurveStrength::P256);
        let sig = kp.sign_der(b"certificate body");
        kp.public_key().verify_der(b"certificate body", &sig).unwrap();
    }

    #[test]
    fn test_tampered_message_fails() {
        let kp = EcKeyPair::generate(CurveStrength::P384);
        let sig = kp.sign_fixed(b"original");
        assert!(kp.public_key().verify_fixed(b"tampered", &sig).is_err());
    }

    #[test]
    fn test_wrong_key_fails() {
        let kp1 = EcKeyPair::generate(CurveStrength::P256);
        let kp2 = EcKeyPair::generate(CurveStrength::P256);
        let sig = kp1.sign_fixed(b"message");
        assert!(kp2.public_key().verify_fixed(b"message", &sig).is_err());
    }

    #[test]
    fn test_wrong_width_rejected_before_parse() {
        let kp = EcKeyPair::generate(CurveStrength::P256);
        let err = kp.public_key().verify_fixed(b"m", &[0u8; 63]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidSignature(_)));
    }

    #[test]
    fn test_scalar_roundtrip() {
        let kp = EcKeyPair::generate(CurveStrength::P521);
        let restored =
            EcKeyPair::from_scalar_bytes(CurveStrength::P521, &kp.scalar_bytes()).unwrap();
        assert_eq!(kp.public_key(), restored.public_key());
    }

    #[test]
    fn test_compressed_point_roundtrip() {
        let kp = EcKeyPair::generate(CurveStrength::P256);
        let pk = kp.public_key();
        let compressed = pk.compressed_point();
        assert_eq!(compressed.len(), 33);
        let restored = EcPublicKey::from_sec1(CurveStrength::P256, &compressed).unwrap();
        assert_eq!(pk, restored);
    }

    #[test]
    fn test_public_key_equality_is_by_curve_and_point() {
        let kp = EcKeyPair::generate(CurveStrength::P521);
        let pk = kp.public_key();
        assert_eq!(pk, pk.clone());
        assert_eq!(pk, kp.public_key());
        assert_ne!(pk, EcKeyPair::generate(CurveStrength::P521).public_key());
        assert_ne!(pk, EcKeyPair::generate(CurveStrength::P256).public_key());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let kp = EcKeyPair::generate(CurveStrength::P256);
        assert_eq!(format!("{kp:?}"), "EcKeyPair(P-256, <private>)");
    }
}
