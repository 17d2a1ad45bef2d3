//! Key lifecycle: initialize, generate, import, export, clear.
//!
//! `KeyManager` is the only owner of the key pair slot. Everything that needs a
//! key borrows it from here.

use crate::error::{QrsealError, Result};
use crate::keys::pair::{KeyPair, KEY_BITS};
use crate::keys::store::KeyStore;

/// How `initialize` obtained the key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A persisted pair was found
    Loaded,
    /// Nothing was persisted, so a new pair was generated and saved
    Generated,
}

/// Where the public key handed out for encryption came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// The pair the user already had
    Existing,
    /// Generated on the spot because no pair was loaded
    AutoGenerated,
}

/// The user's answer to the irreversible-action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(value: bool) -> Self {
        if value {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// Result of a `clear` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Declined,
}

/// Owns the key pair and keeps the store in sync with it.
pub struct KeyManager<S: KeyStore> {
    store: S,
    pair: Option<KeyPair>,
    bits: usize,
}

impl<S: KeyStore> KeyManager<S> {
    /// Create a manager with nothing loaded. Call `initialize` next.
    pub fn new(store: S) -> Self {
        Self {
            store,
            pair: None,
            bits: KEY_BITS,
        }
    }

    /// Override the modulus size for generated keys.
    pub fn with_key_bits(mut self, bits: usize) -> Self {
        self.bits = bits;
        self
    }

    /// Load the persisted pair, or generate and persist one if none exists.
    ///
    /// On failure the manager holds no keys, so encryption and decryption
    /// report `NoKeyAvailable` until a later call succeeds.
    pub fn initialize(&mut self) -> Result<InitOutcome> {
        self.pair = None;
        if let Some(pair) = self.store.load()? {
            tracing::info!(fingerprint = %pair.fingerprint(), "loaded key pair");
            self.pair = Some(pair);
            return Ok(InitOutcome::Loaded);
        }

        self.generate()?;
        Ok(InitOutcome::Generated)
    }

    /// Load the persisted pair without generating one. Returns whether a pair
    /// is now loaded.
    pub fn load(&mut self) -> Result<bool> {
        self.pair = self.store.load()?;
        Ok(self.pair.is_some())
    }

    /// Generate a new pair, replacing the current one in memory and storage.
    ///
    /// Payloads sealed for the old public key can no longer be opened once
    /// this returns.
    pub fn generate(&mut self) -> Result<&KeyPair> {
        let pair = KeyPair::generate(self.bits)?;
        self.replace(pair)
    }

    /// Replace the pair with one parsed from export text.
    pub fn import(&mut self, text: &str) -> Result<&KeyPair> {
        let pair = KeyPair::from_export_text(text)?;
        self.replace(pair)
    }

    fn replace(&mut self, pair: KeyPair) -> Result<&KeyPair> {
        self.store.save(&pair)?;
        tracing::info!(
            fingerprint = %pair.fingerprint(),
            store = %self.store.describe(),
            "stored new key pair"
        );
        Ok(self.pair.insert(pair))
    }

    /// Erase the pair from memory and storage, if the user confirmed.
    pub fn clear(&mut self, confirmation: Confirmation) -> Result<ClearOutcome> {
        if confirmation == Confirmation::Declined {
            return Ok(ClearOutcome::Declined);
        }
        self.store.clear()?;
        self.pair = None;
        tracing::info!(store = %self.store.describe(), "cleared key pair");
        Ok(ClearOutcome::Cleared)
    }

    pub fn pair(&self) -> Option<&KeyPair> {
        self.pair.as_ref()
    }

    pub fn has_private_key(&self) -> bool {
        self.pair.is_some()
    }

    /// The public key PEM, or `NoKeyAvailable`.
    pub fn public_key(&self) -> Result<&str> {
        self.pair
            .as_ref()
            .map(KeyPair::public_pem)
            .ok_or(QrsealError::NoKeyAvailable)
    }

    /// The private key PEM, or `NoKeyAvailable`.
    pub fn private_key(&self) -> Result<&str> {
        self.pair
            .as_ref()
            .map(KeyPair::private_pem)
            .ok_or(QrsealError::NoKeyAvailable)
    }

    /// The public key, generating a pair first if none is loaded.
    ///
    /// The returned `KeyOrigin` tells the caller whether the user actually
    /// chose this key.
    pub fn public_key_or_generate(&mut self) -> Result<(&str, KeyOrigin)> {
        let origin = if self.pair.is_none() {
            self.generate()?;
            tracing::warn!("no key pair loaded; generated one for encryption");
            KeyOrigin::AutoGenerated
        } else {
            KeyOrigin::Existing
        };
        Ok((self.public_key()?, origin))
    }

    /// Export artifact for the current pair.
    pub fn export_text(&self) -> Result<String> {
        self.pair
            .as_ref()
            .map(KeyPair::export_text)
            .ok_or(QrsealError::NoKeyAvailable)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::store::MemoryKeyStore;

    #[test]
    fn test_new_manager_has_no_keys() {
        let manager = KeyManager::new(MemoryKeyStore::new());
        assert!(!manager.has_private_key());
        assert!(matches!(
            manager.public_key(),
            Err(QrsealError::NoKeyAvailable)
        ));
        assert!(matches!(
            manager.private_key(),
            Err(QrsealError::NoKeyAvailable)
        ));
        assert!(matches!(
            manager.export_text(),
            Err(QrsealError::NoKeyAvailable)
        ));
    }

    #[test]
    fn test_declined_clear_changes_nothing() {
        let mut manager = KeyManager::new(MemoryKeyStore::new());
        let outcome = manager.clear(Confirmation::Declined).unwrap();
        assert_eq!(outcome, ClearOutcome::Declined);
    }

    #[test]
    fn test_confirmation_from_bool() {
        assert_eq!(Confirmation::from(true), Confirmation::Confirmed);
        assert_eq!(Confirmation::from(false), Confirmation::Declined);
    }

    #[test]
    fn test_key_bits_set_payload_limit() {
        let mut manager = KeyManager::new(MemoryKeyStore::new()).with_key_bits(1024);
        manager.generate().unwrap();
        let public_pem = manager.public_key().unwrap();

        let key = crate::keys::parse_public_pem(public_pem).unwrap();
        assert_eq!(crate::codec::max_plaintext_len(&key), 86);

        let err = crate::codec::encrypt(&"x".repeat(87), public_pem).unwrap_err();
        assert!(matches!(
            err,
            QrsealError::PayloadTooLarge { len: 87, max: 86 }
        ));
        let payload = crate::codec::encrypt(&"x".repeat(86), public_pem).unwrap();
        let private_pem = manager.private_key().unwrap();
        assert_eq!(
            crate::codec::decrypt(&payload, private_pem).unwrap(),
            "x".repeat(86)
        );
    }

    #[test]
    fn test_import_rejects_garbage_and_keeps_state() {
        let mut manager = KeyManager::new(MemoryKeyStore::new());
        let err = manager.import("nothing to see").unwrap_err();
        assert!(matches!(err, QrsealError::InvalidKey(_)));
        assert!(!manager.has_private_key());
        assert!(!manager.store().has_residue());
    }
}
