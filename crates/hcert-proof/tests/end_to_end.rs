//! Full issuance-to-verification walk on a filesystem-backed store:
//! root, intermediate authority, end entity, compact certificate, then a
//! claim signed into a proof, carried through the Base45 transport form,
//! and verified back to the original claim.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use hcert_codec::base45;
use hcert_compact::CompactCertificate;
use hcert_core::{Disease, HealthStatus, Timestamp};
use hcert_pki::authority;
use hcert_pki::store::{Artifact, CredentialStore, FsStore};
use hcert_proof::{Claim, SignedProof};

fn claim() -> Claim {
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
fn issuance_to_verification() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FsStore::open(dir.path()).unwrap();

    authority::create_root(&mut store, "Root").unwrap();
    authority::create_authority(&mut store, "Root", "100").unwrap();
    authority::create_end_entity(&mut store, "100", "Issuer").unwrap();
    CompactCertificate::issue(&mut store, "Issuer").unwrap();

    // The hierarchy is mirrored on disk, each artifact with a text sibling.
    assert!(dir.path().join("Root/100/Issuer").is_dir());
    assert!(dir
        .path()
        .join("Root/100/Issuer/certificate.der.txt")
        .is_file());
    assert!(dir
        .path()
        .join("Root/100/Issuer/self-signed-certificate.der")
        .is_file());
    assert!(dir.path().join("Root/100/Issuer/chain.der").is_file());

    // Chain walk reaches the self-signed root.
    let chain = authority::chain(&store, "Issuer").unwrap();
    assert_eq!(chain.len(), 3);
    assert!(chain[2].is_self_signed().unwrap());

    // Sign, carry through the transport form, verify.
    let proof = SignedProof::sign(&store, "Issuer", &claim()).unwrap();
    let transported = base45::encode(&proof.to_bytes().unwrap());
    assert!(transported
        .chars()
        .all(|c| "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:".contains(c)));

    let received = SignedProof::from_bytes(&base45::decode(&transported).unwrap()).unwrap();
    let verified = received.verify(&store).unwrap();
    assert_eq!(verified, claim());
    assert_eq!(verified.name(), "John Doe");
    assert_eq!(
        verified.status()[&Disease::Covid19],
        HealthStatus::new(5, 4).unwrap()
    );
}

#[test]
fn verification_rejects_foreign_root() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let mut issuing = FsStore::open(dir_a.path()).unwrap();
    let mut foreign = FsStore::open(dir_b.path()).unwrap();

    for store in [&mut issuing, &mut foreign] {
        authority::create_root(store, "Root").unwrap();
        authority::create_authority(store, "Root", "100").unwrap();
        authority::create_end_entity(store, "100", "Issuer").unwrap();
        CompactCertificate::issue(store, "Issuer").unwrap();
    }

    let proof = SignedProof::sign(&issuing, "Issuer", &claim()).unwrap();
    proof.verify(&issuing).unwrap();
    // Same names, different keys: the foreign store must reject it.
    assert!(proof.verify(&foreign).is_err());
}

#[test]
fn proof_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = FsStore::open(dir.path()).unwrap();
        authority::create_root(&mut store, "Root").unwrap();
        authority::create_authority(&mut store, "Root", "100").unwrap();
        authority::create_end_entity(&mut store, "100", "Issuer").unwrap();
        CompactCertificate::issue(&mut store, "Issuer").unwrap();
    }

    let store = FsStore::open(dir.path()).unwrap();
    assert!(store.get("Issuer", Artifact::CompactCertificate).is_ok());
    let proof = SignedProof::sign(&store, "Issuer", &claim()).unwrap();
    assert_eq!(proof.verify(&store).unwrap(), claim());
}
