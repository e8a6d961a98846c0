//! # Credential Store — Hierarchical Artifact Storage
//!
//! Every entity in the issuance hierarchy owns a named slot holding its
//! artifacts: key material, its certificate, the compact certificate, and
//! (for issuers) a keystore of the certificates it has issued. Slots nest:
//! an entity created under a parent lives inside the parent's slot, so the
//! on-disk layout mirrors the issuance hierarchy.
//!
//! Each binary artifact is stored together with an annotated text
//! rendering, so a slot can always be inspected with nothing but a pager.
//!
//! [`CredentialStore`] is the seam; [`FsStore`] persists to a directory
//! tree and [`MemoryStore`] backs tests and ephemeral runs.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hcert_core::StoreError;
use tracing::debug;

/// The artifact kinds an entity slot can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// The entity's EC private key (DER key file).
    PrivateKey,
    /// The entity's public key (DER subjectPublicKeyInfo).
    PublicKey,
    /// The entity's self-signed X.509 certificate.
    SelfSignedCertificate,
    /// The entity's issuer-signed X.509 certificate (equal to the
    /// self-signed one only for a root).
    Certificate,
    /// The certificate chain from this entity up to its root, leaf first.
    Chain,
    /// The entity's compact certificate (binary credential form).
    CompactCertificate,
    /// Certificates this entity has issued, concatenated.
    Keystore,
}

impl Artifact {
    /// File name of the binary form inside an entity's slot.
    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::PrivateKey => "private-key.der",
            Artifact::PublicKey => "public-key.der",
            Artifact::SelfSignedCertificate => "self-signed-certificate.der",
            Artifact::Certificate => "certificate.der",
            Artifact::Chain => "chain.der",
            Artifact::CompactCertificate => "compact-certificate.bin",
            Artifact::Keystore => "keystore.der",
        }
    }

    /// File name of the annotated text form.
    pub fn text_file_name(&self) -> String {
        format!("{}.txt", self.file_name())
    }
}

/// Storage seam for entity slots and their artifacts.
///
/// Entity names are unique across the whole store, not just within one
/// parent, so lookups never need a path.
pub trait CredentialStore {
    /// Create a slot for `name`, nested under `parent` when given.
    ///
    /// Fails with `EntityExists` when the slot is already present and
    /// `ParentAbsent` when the parent slot is missing.
    fn create_entity(&mut self, name: &str, parent: Option<&str>) -> Result<(), StoreError>;

    /// Whether a slot for `name` exists.
    fn has_entity(&self, name: &str) -> bool;

    /// Write an artifact (binary plus text rendering) into an entity slot.
    fn put(
        &mut self,
        entity: &str,
        artifact: Artifact,
        binary: &[u8],
        text: &str,
    ) -> Result<(), StoreError>;

    /// Read back the binary form of an artifact.
    fn get(&self, entity: &str, artifact: Artifact) -> Result<Vec<u8>, StoreError>;
}

// ---------------------------------------------------------------------------
// Filesystem backend
// ---------------------------------------------------------------------------

/// A credential store backed by a directory tree.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entity_dir(&self, name: &str) -> Option<PathBuf> {
        find_dir(&self.root, name)
    }
}

impl CredentialStore for FsStore {
    fn create_entity(&mut self, name: &str, parent: Option<&str>) -> Result<(), StoreError> {
        let parent_dir = match parent {
            Some(parent) => self
                .entity_dir(parent)
                .ok_or_else(|| StoreError::ParentAbsent(parent.to_owned()))?,
            None => self.root.clone(),
        };
        if self.entity_dir(name).is_some() {
            return Err(StoreError::EntityExists(name.to_owned()));
        }
        // create_dir (not create_dir_all) keeps creation atomic and
        // exclusive, so two racing creates cannot both succeed.
        match fs::create_dir(parent_dir.join(name)) {
            Ok(()) => {
                debug!(entity = name, parent = ?parent, "created entity slot");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(StoreError::EntityExists(name.to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn has_entity(&self, name: &str) -> bool {
        self.entity_dir(name).is_some()
    }

    fn put(
        &mut self,
        entity: &str,
        artifact: Artifact,
        binary: &[u8],
        text: &str,
    ) -> Result<(), StoreError> {
        let dir = self
            .entity_dir(entity)
            .ok_or_else(|| StoreError::NotFound(entity.to_owned()))?;
        fs::write(dir.join(artifact.file_name()), binary)?;
        fs::write(dir.join(artifact.text_file_name()), text)?;
        debug!(entity, artifact = artifact.file_name(), bytes = binary.len(), "stored artifact");
        Ok(())
    }

    fn get(&self, entity: &str, artifact: Artifact) -> Result<Vec<u8>, StoreError> {
        let dir = self
            .entity_dir(entity)
            .ok_or_else(|| StoreError::NotFound(entity.to_owned()))?;
        match fs::read(dir.join(artifact.file_name())) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::ArtifactMissing {
                name: entity.to_owned(),
                artifact: artifact.file_name().to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Depth-first search for a directory named `name` under `dir`.
fn find_dir(dir: &Path, name: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if entry.file_name().to_str() == Some(name) {
            return Some(path);
        }
        if let Some(found) = find_dir(&path, name) {
            return Some(found);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Slot {
    artifacts: HashMap<Artifact, Vec<u8>>,
}

/// A credential store held entirely in memory, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, Slot>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn create_entity(&mut self, name: &str, parent: Option<&str>) -> Result<(), StoreError> {
        if let Some(parent) = parent {
            if !self.slots.contains_key(parent) {
                return Err(StoreError::ParentAbsent(parent.to_owned()));
            }
        }
        if self.slots.contains_key(name) {
            return Err(StoreError::EntityExists(name.to_owned()));
        }
        self.slots.insert(name.to_owned(), Slot::default());
        Ok(())
    }

    fn has_entity(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    fn put(
        &mut self,
        entity: &str,
        artifact: Artifact,
        binary: &[u8],
        _text: &str,
    ) -> Result<(), StoreError> {
        let slot = self
            .slots
            .get_mut(entity)
            .ok_or_else(|| StoreError::NotFound(entity.to_owned()))?;
        slot.artifacts.insert(artifact, binary.to_vec());
        Ok(())
    }

    fn get(&self, entity: &str, artifact: Artifact) -> Result<Vec<u8>, StoreError> {
        let slot = self
            .slots
            .get(entity)
            .ok_or_else(|| StoreError::NotFound(entity.to_owned()))?;
        slot.artifacts
            .get(&artifact)
            .cloned()
            .ok_or_else(|| StoreError::ArtifactMissing {
                name: entity.to_owned(),
                artifact: artifact.file_name().to_owned(),
            })
    }
}
