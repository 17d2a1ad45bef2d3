//! The RSA key pair and its PEM forms.

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use secrecy::{ExposeSecret, SecretString};
use sha1::{Digest, Sha1};

use crate::error::{QrsealError, Result};

/// Modulus size used for every generated key pair.
pub const KEY_BITS: usize = 2048;

const EXPORT_PUBLIC_LABEL: &str = "Public Key:";
const EXPORT_PRIVATE_LABEL: &str = "Private Key:";

/// A matched RSA key pair in PEM form.
///
/// The public half is SPKI (`BEGIN PUBLIC KEY`), the private half PKCS#1
/// (`BEGIN RSA PRIVATE KEY`). Both halves always come from the same
/// private key; constructors taking two PEMs check this.
pub struct KeyPair {
    public_pem: String,
    private_pem: SecretString,
}

impl KeyPair {
    /// Generate a fresh pair with a `bits`-bit modulus.
    pub fn generate(bits: usize) -> Result<Self> {
        let mut rng = rand::rngs::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| QrsealError::InvalidKey(format!("Key generation failed: {}", e)))?;
        tracing::debug!(bits, "generated RSA key pair");
        Self::from_private_key(&private)
    }

    /// Build a pair from an existing private key, deriving the public half.
    pub fn from_private_key(private: &RsaPrivateKey) -> Result<Self> {
        let public = RsaPublicKey::from(private);
        let public_pem = public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| QrsealError::InvalidKey(format!("Public key encoding failed: {}", e)))?;
        let private_pem = private
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| QrsealError::InvalidKey(format!("Private key encoding failed: {}", e)))?;

        Ok(Self {
            public_pem,
            private_pem: SecretString::from(private_pem.to_string()),
        })
    }

    /// Assemble a pair from two PEM strings, rejecting halves that do not match.
    pub fn from_pems(public_pem: &str, private_pem: &str) -> Result<Self> {
        let public = parse_public_pem(public_pem)?;
        let private = parse_private_pem(private_pem)?;
        if RsaPublicKey::from(&private) != public {
            return Err(QrsealError::InvalidKey(
                "public and private keys are not from the same key pair".to_string(),
            ));
        }

        Ok(Self {
            public_pem: public_pem.to_string(),
            private_pem: SecretString::from(private_pem.to_string()),
        })
    }

    /// Parse an exported key file (or any text holding one public and one
    /// private PEM block).
    pub fn from_export_text(text: &str) -> Result<Self> {
        let blocks = pem_blocks(text);
        let public = blocks
            .iter()
            .find(|block| block.starts_with("-----BEGIN PUBLIC KEY-----")
                || block.starts_with("-----BEGIN RSA PUBLIC KEY-----"))
            .ok_or_else(|| QrsealError::InvalidKey("no public key block found".to_string()))?;
        let private = blocks
            .iter()
            .find(|block| block.contains("PRIVATE KEY-----"))
            .ok_or_else(|| QrsealError::InvalidKey("no private key block found".to_string()))?;

        Self::from_pems(public, private)
    }

    pub fn public_pem(&self) -> &str {
        &self.public_pem
    }

    /// The private key PEM.
    ///
    /// Avoid logging or storing this outside the key store.
    pub fn private_pem(&self) -> &str {
        self.private_pem.expose_secret()
    }

    /// Short hex fingerprint of the public key (SHA-1 over the PEM body).
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.public_pem)
    }

    /// The downloadable export artifact: both keys under literal labels,
    /// separated by a blank line.
    pub fn export_text(&self) -> String {
        format!(
            "{}\n{}\n\n{}\n{}",
            EXPORT_PUBLIC_LABEL,
            self.public_pem,
            EXPORT_PRIVATE_LABEL,
            self.private_pem()
        )
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("fingerprint", &self.fingerprint())
            .field("private_pem", &"[REDACTED]")
            .finish()
    }
}

/// Parse a public key from SPKI or PKCS#1 PEM.
pub fn parse_public_pem(pem: &str) -> Result<RsaPublicKey> {
    let pem = pem.trim();
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| QrsealError::InvalidKey(format!("malformed public key: {}", e)))
}

/// Parse a private key from PKCS#1 or PKCS#8 PEM.
pub fn parse_private_pem(pem: &str) -> Result<RsaPrivateKey> {
    let pem = pem.trim();
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| QrsealError::InvalidKey(format!("malformed private key: {}", e)))
}

/// Hex fingerprint of a PEM string's base64 body, ignoring line endings.
pub fn fingerprint(pem: &str) -> String {
    let body: String = pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .map(str::trim)
        .collect();
    let digest = Sha1::digest(body.as_bytes());
    digest[..8]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Extract every `-----BEGIN ...-----` / `-----END ...-----` block in order.
fn pem_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in text.lines().map(str::trim) {
        if line.starts_with("-----BEGIN ") {
            current = Some(vec![line]);
            continue;
        }
        if let Some(lines) = current.as_mut() {
            lines.push(line);
            if line.starts_with("-----END ") {
                let mut block = lines.join("\n");
                block.push('\n');
                blocks.push(block);
                current = None;
            }
        }
    }

    blocks
}
