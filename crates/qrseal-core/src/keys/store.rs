//! Key store trait and its backends.
//!
//! The `KeyStore` trait is the persistence seam for the key pair. A store holds
//! exactly two named slots, public and private. A store with either slot
//! missing holds no key pair.

use std::path::{Path, PathBuf};

use zeroize::{Zeroize, Zeroizing};

use crate::error::{QrsealError, Result};
use crate::fs::{is_temp_sibling, remove_if_exists, write_atomic};
use crate::keys::pair::KeyPair;

/// File name of the public key slot.
pub const PUBLIC_SLOT: &str = "public.pem";

/// File name of the private key slot.
pub const PRIVATE_SLOT: &str = "private.pem";

/// Persistence interface for the key pair.
///
/// Implementations must ensure:
/// - `save` replaces both slots together
/// - `clear` leaves no key material behind
/// - `load` returns `Ok(None)` when either slot is absent
pub trait KeyStore {
    /// Load the persisted pair, if both slots are present.
    ///
    /// # Errors
    ///
    /// Returns `QrsealError::StorageUnavailable` if the store cannot be read,
    /// or `QrsealError::InvalidKey` if the slots hold mismatched or malformed keys.
    fn load(&self) -> Result<Option<KeyPair>>;

    /// Persist the pair, overwriting any previous one.
    fn save(&mut self, pair: &KeyPair) -> Result<()>;

    /// Erase both slots.
    fn clear(&mut self) -> Result<()>;

    /// Human-readable location, for notices.
    fn describe(&self) -> String;
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    public: Option<String>,
    private: Option<String>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any slot still holds data.
    pub fn has_residue(&self) -> bool {
        self.public.is_some() || self.private.is_some()
    }
}

impl KeyStore for MemoryKeyStore {
    fn load(&self) -> Result<Option<KeyPair>> {
        match (&self.public, &self.private) {
            (Some(public), Some(private)) => KeyPair::from_pems(public, private).map(Some),
            _ => Ok(None),
        }
    }

    fn save(&mut self, pair: &KeyPair) -> Result<()> {
        self.public = Some(pair.public_pem().to_string());
        self.private = Some(pair.private_pem().to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.public = None;
        if let Some(mut private) = self.private.take() {
            private.zeroize();
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Two PEM files in a key directory.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    dir: PathBuf,
}

impl FileKeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn public_path(&self) -> PathBuf {
        self.dir.join(PUBLIC_SLOT)
    }

    pub fn private_path(&self) -> PathBuf {
        self.dir.join(PRIVATE_SLOT)
    }

    fn storage_error(&self, action: &str, err: std::io::Error) -> QrsealError {
        QrsealError::StorageUnavailable(format!(
            "Failed to {} keys in {}: {}",
            action,
            self.dir.display(),
            err
        ))
    }

    /// Temp siblings left by a write that was interrupted before cleanup.
    fn remove_stale_temp_files(&self) -> Result<()> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(self.storage_error("list", err)),
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if is_temp_sibling(&name, PUBLIC_SLOT) || is_temp_sibling(&name, PRIVATE_SLOT) {
                remove_if_exists(&entry.path()).map_err(|e| self.storage_error("remove", e))?;
                tracing::debug!(file = %name, "removed stale temp file");
            }
        }
        Ok(())
    }

    fn read_slot(&self, path: &Path) -> Result<Option<Zeroizing<String>>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(Zeroizing::new(contents))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.storage_error("read", err)),
        }
    }
}

impl KeyStore for FileKeyStore {
    fn load(&self) -> Result<Option<KeyPair>> {
        let public = self.read_slot(&self.public_path())?;
        let private = self.read_slot(&self.private_path())?;
        match (public, private) {
            (Some(public), Some(private)) => KeyPair::from_pems(&public, &private).map(Some),
            _ => Ok(None),
        }
    }

    fn save(&mut self, pair: &KeyPair) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| self.storage_error("create directory for", e))?;
        // Private slot first: a public slot never exists without its partner.
        write_atomic(&self.private_path(), pair.private_pem().as_bytes(), true)
            .map_err(|e| self.storage_error("write", e))?;
        write_atomic(&self.public_path(), pair.public_pem().as_bytes(), false)
            .map_err(|e| self.storage_error("write", e))?;
        tracing::debug!(dir = %self.dir.display(), "saved key pair");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        remove_if_exists(&self.public_path()).map_err(|e| self.storage_error("remove", e))?;
        remove_if_exists(&self.private_path()).map_err(|e| self.storage_error("remove", e))?;
        self.remove_stale_temp_files()?;
        tracing::debug!(dir = %self.dir.display(), "cleared key pair");
        Ok(())
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
