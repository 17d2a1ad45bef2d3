//! Message codec: UTF-8 plaintext <-> RSA-OAEP ciphertext <-> base64 payload.
//!
//! OAEP uses SHA-1 for both the label hash and MGF1, which is what forge's
//! `"RSA-OAEP"` mode produces. Payloads sealed in the browser version open here
//! and vice versa.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPublicKey};
use sha1::Sha1;

use crate::error::{QrsealError, Result};
use crate::keys::{parse_private_pem, parse_public_pem};

/// Output size of the OAEP hash (SHA-1), in bytes.
const OAEP_HASH_LEN: usize = 20;

/// Base64 text of an OAEP ciphertext, ready to embed in a QR symbol.
///
/// Consumers treat this as opaque text; the only structure is base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload(String);

impl EncryptedPayload {
    /// Wrap text read from a QR symbol or typed by the user.
    ///
    /// Whitespace (line wraps, trailing newline) is dropped; validity is only
    /// checked on decrypt.
    pub fn from_text(text: &str) -> Self {
        Self(text.chars().filter(|c| !c.is_whitespace()).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EncryptedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn padding() -> Oaep {
    Oaep::new::<Sha1>()
}

/// Largest plaintext, in bytes, that OAEP can seal under `key`.
pub fn max_plaintext_len(key: &RsaPublicKey) -> usize {
    key.size().saturating_sub(2 * OAEP_HASH_LEN + 2)
}

/// Encrypt `plaintext` for the holder of `public_pem`.
///
/// # Errors
///
/// - `InvalidKey` if the PEM does not parse
/// - `PayloadTooLarge` if the plaintext exceeds `max_plaintext_len`
pub fn encrypt(plaintext: &str, public_pem: &str) -> Result<EncryptedPayload> {
    let key = parse_public_pem(public_pem)?;
    let max = max_plaintext_len(&key);
    let len = plaintext.len();
    if len > max {
        return Err(QrsealError::PayloadTooLarge { len, max });
    }

    let mut rng = rand::rngs::OsRng;
    let ciphertext = key
        .encrypt(&mut rng, padding(), plaintext.as_bytes())
        .map_err(|e| match e {
            rsa::Error::MessageTooLong => QrsealError::PayloadTooLarge { len, max },
            other => QrsealError::InvalidKey(other.to_string()),
        })?;

    tracing::debug!(plaintext_len = len, "sealed message");
    Ok(EncryptedPayload(STANDARD.encode(ciphertext)))
}

/// Decrypt a payload with `private_pem`.
///
/// # Errors
///
/// - `InvalidKey` if the PEM does not parse
/// - `DecryptionFailed` for a wrong key, bad base64, truncated or corrupt
///   ciphertext, or plaintext that is not UTF-8
pub fn decrypt(payload: &EncryptedPayload, private_pem: &str) -> Result<String> {
    let key = parse_private_pem(private_pem)?;
    let ciphertext = STANDARD.decode(payload.as_str()).map_err(|e| {
        tracing::debug!(error = %e, "payload is not valid base64");
        QrsealError::DecryptionFailed
    })?;
    if ciphertext.len() != key.size() {
        tracing::debug!(
            got = ciphertext.len(),
            expected = key.size(),
            "ciphertext length does not match key"
        );
        return Err(QrsealError::DecryptionFailed);
    }

    let plaintext = key.decrypt(padding(), &ciphertext).map_err(|e| {
        tracing::debug!(error = %e, "OAEP decryption rejected payload");
        QrsealError::DecryptionFailed
    })?;

    String::from_utf8(plaintext).map_err(|_| QrsealError::DecryptionFailed)
}
