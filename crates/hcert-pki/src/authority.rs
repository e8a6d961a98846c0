//! # Entity Lifecycle on Top of the Credential Store
//!
//! Creates the three tiers of the issuance hierarchy and loads their
//! material back:
//!
//! - a **root** signs itself on P-521,
//! - an **authority** is signed by its parent and signs on P-384,
//! - an **end entity** is signed by its parent and signs on P-256.
//!
//! Creation persists three artifacts into the entity's slot (private key,
//! public key, certificate), each as DER plus an annotated text rendering,
//! and appends the new certificate to the parent's keystore. Chain walking
//! follows issuer names upward until a self-signed certificate terminates
//! the walk.

use hcert_core::{CryptoError, HcertError, StoreError, Timestamp};
use hcert_codec::Tlv;
use tracing::info;

use crate::keypair::{CurveStrength, EcKeyPair, EcPublicKey};
use crate::store::{Artifact, CredentialStore};
use crate::x509::{subject_public_key_info, Certificate};

/// Create a self-signed root entity.
pub fn create_root(store: &mut dyn CredentialStore, name: &str) -> Result<(), HcertError> {
    store.create_entity(name, None)?;
    let key_pair = EcKeyPair::generate(CurveStrength::P521);
    let certificate = Certificate::issue(
        name,
        &key_pair.public_key(),
        name,
        &key_pair,
        Timestamp::now(),
    )?;
    // A root's issuer-signed certificate is its self-signed one.
    persist(store, name, &key_pair, &certificate, &certificate)?;
    store_chain(store, name)?;
    info!(entity = name, "created root");
    Ok(())
}

/// Create an intermediate authority under `parent`.
pub fn create_authority(
    store: &mut dyn CredentialStore,
    parent: &str,
    name: &str,
) -> Result<(), HcertError> {
    create_child(store, parent, name, CurveStrength::P384)?;
    info!(entity = name, parent, "created authority");
    Ok(())
}

/// Create an end entity under `parent`.
pub fn create_end_entity(
    store: &mut dyn CredentialStore,
    parent: &str,
    name: &str,
) -> Result<(), HcertError> {
    create_child(store, parent, name, CurveStrength::P256)?;
    info!(entity = name, parent, "created end entity");
    Ok(())
}

fn create_child(
    store: &mut dyn CredentialStore,
    parent: &str,
    name: &str,
    strength: CurveStrength,
) -> Result<(), HcertError> {
    // The parent's key is needed before the child slot is created, so a
    // parent without usable key material cannot leave an empty slot behind.
    if !store.has_entity(parent) {
        return Err(StoreError::ParentAbsent(parent.to_owned()).into());
    }
    let parent_key = load_key_pair(store, parent)?;
    store.create_entity(name, Some(parent))?;
    let key_pair = EcKeyPair::generate(strength);
    let now = Timestamp::now();
    let self_signed =
        Certificate::issue(name, &key_pair.public_key(), name, &key_pair, now)?;
    let issued =
        Certificate::issue(name, &key_pair.public_key(), parent, &parent_key, now)?;
    persist(store, name, &key_pair, &self_signed, &issued)?;
    append_to_keystore(store, parent, &issued)?;
    store_chain(store, name)?;
    Ok(())
}

/// Load an entity's signing key from its private key artifact.
pub fn load_key_pair(
    store: &dyn CredentialStore,
    name: &str,
) -> Result<EcKeyPair, HcertError> {
    let bytes = store.get(name, Artifact::PrivateKey)?;
    let tree = Tlv::from_der(&bytes).map_err(key_file_err)?;
    let scalar = tree
        .element(1)
        .and_then(Tlv::as_octet_string)
        .map_err(key_file_err)?;
    let curve = tree
        .element(2)
        .and_then(|tagged| tagged.element(0))
        .and_then(Tlv::as_oid)
        .map_err(key_file_err)?;
    let strength = CurveStrength::from_curve_oid(curve)?;
    Ok(EcKeyPair::from_scalar_bytes(strength, scalar)?)
}

/// Load an entity's certificate.
pub fn load_certificate(
    store: &dyn CredentialStore,
    name: &str,
) -> Result<Certificate, HcertError> {
    let bytes = store.get(name, Artifact::Certificate)?;
    Ok(Certificate::from_der(&bytes)?)
}

/// Load an entity's public key from its public key artifact.
pub fn load_public_key(
    store: &dyn CredentialStore,
    name: &str,
) -> Result<EcPublicKey, HcertError> {
    let bytes = store.get(name, Artifact::PublicKey)?;
    let spki = Tlv::from_der(&bytes).map_err(key_file_err)?;
    let curve = spki
        .element(0)
        .and_then(|alg| alg.element(1))
        .and_then(Tlv::as_oid)
        .map_err(key_file_err)?;
    let strength = CurveStrength::from_curve_oid(curve)?;
    let point = spki
        .element(1)
        .and_then(Tlv::as_bit_string)
        .map_err(key_file_err)?;
    Ok(EcPublicKey::from_sec1(strength, point)?)
}

/// Walk the chain from `name` up to its self-signed root, leaf first.
pub fn chain(store: &dyn CredentialStore, name: &str) -> Result<Vec<Certificate>, HcertError> {
    let mut certificates = vec![load_certificate(store, name)?];
    loop {
        let last = certificates
            .last()
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))?;
        if last.is_self_signed()? {
            return Ok(certificates);
        }
        let issuer = last.issuer()?;
        certificates.push(load_certificate(store, &issuer)?);
    }
}

fn persist(
    store: &mut dyn CredentialStore,
    name: &str,
    key_pair: &EcKeyPair,
    self_signed: &Certificate,
    issued: &Certificate,
) -> Result<(), HcertError> {
    let private = private_key_tree(key_pair);
    store.put(
        name,
        Artifact::PrivateKey,
        &private.to_der(),
        &private.render_tree(),
    )?;
    let public = subject_public_key_info(&key_pair.public_key());
    store.put(
        name,
        Artifact::PublicKey,
        &public.to_der(),
        &public.render_tree(),
    )?;
    store.put(
        name,
        Artifact::SelfSignedCertificate,
        &self_signed.to_der(),
        &self_signed.render_tree(),
    )?;
    store.put(
        name,
        Artifact::Certificate,
        &issued.to_der(),
        &issued.render_tree(),
    )?;
    Ok(())
}

/// Walk the chain the entity anchors and store it as one artifact.
fn store_chain(store: &mut dyn CredentialStore, name: &str) -> Result<(), HcertError> {
    let certificates = chain(store, name)?;
    let mut binary = Vec::new();
    let mut text = String::new();
    for certificate in &certificates {
        binary.extend_from_slice(&certificate.to_der());
        text.push_str(&certificate.render_tree());
        text.push('\n');
    }
    store.put(name, Artifact::Chain, &binary, &text)?;
    Ok(())
}

/// RFC 5915 ECPrivateKey layout: version, scalar, named curve, public point.
fn private_key_tree(key_pair: &EcKeyPair) -> Tlv {
    Tlv::Sequence(vec![
        Tlv::Integer(1),
        Tlv::OctetString(key_pair.scalar_bytes()),
        Tlv::Context {
            tag: 0,
            elements: vec![Tlv::Oid(key_pair.strength().curve_oid().to_vec())],
        },
        Tlv::Context {
            tag: 1,
            elements: vec![Tlv::BitString {
                unused_bits: 0,
                bytes: key_pair.public_key().uncompressed_point(),
            }],
        },
    ])
}

fn append_to_keystore(
    store: &mut dyn CredentialStore,
    parent: &str,
    certificate: &Certificate,
) -> Result<(), HcertError> {
    let mut binary = match store.get(parent, Artifact::Keystore) {
        Ok(existing) => existing,
        Err(StoreError::ArtifactMissing { .. }) => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    binary.extend_from_slice(&certificate.to_der());
    let text = Tlv::from_der_all(&binary)
        .map_err(key_file_err)?
        .iter()
        .map(Tlv::render_tree)
        .collect::<Vec<_>>()
        .join("\n");
    store.put(parent, Artifact::Keystore, &binary, &text)?;
    Ok(())
}

fn key_file_err(e: hcert_core::CodecError) -> CryptoError {
    CryptoError::Key(e.to_string())
}
