//! Application state: the key manager plus settings, and the flows that tie
//! keys, codec, QR symbols and capture together.

use std::path::Path;

use image::GrayImage;

use crate::capture::{from_upload, Camera, Clock, LiveScanner, ScanConfig, ScanEvent, ScanOutcome};
use crate::codec::{self, EncryptedPayload};
use crate::error::{QrsealError, Result};
use crate::keys::{KeyManager, KeyOrigin, KeyStore};
use crate::qr::{render_image, DEFAULT_QR_SIZE};

/// User-tunable knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Minimum edge length of rendered QR images, in pixels
    pub qr_size: u32,
    pub scan: ScanConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            qr_size: DEFAULT_QR_SIZE,
            scan: ScanConfig::default(),
        }
    }
}

/// A sealed message ready to display or save.
#[derive(Debug)]
pub struct SealedMessage {
    pub payload: EncryptedPayload,
    pub qr: GrayImage,
    /// `AutoGenerated` means the user never chose the key this was sealed for
    pub key_origin: KeyOrigin,
}

/// Explicit application state. Owns the key manager; nothing else writes keys.
pub struct Workflow<S: KeyStore> {
    keys: KeyManager<S>,
    settings: Settings,
    last_plaintext: Option<String>,
}

impl<S: KeyStore> Workflow<S> {
    pub fn new(keys: KeyManager<S>, settings: Settings) -> Self {
        Self {
            keys,
            settings,
            last_plaintext: None,
        }
    }

    pub fn keys(&self) -> &KeyManager<S> {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut KeyManager<S> {
        &mut self.keys
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The most recent successfully decrypted message.
    ///
    /// Failed scans and failed decryptions leave this untouched.
    pub fn last_plaintext(&self) -> Option<&str> {
        self.last_plaintext.as_deref()
    }

    /// Encrypt `message` and render it as a QR symbol.
    ///
    /// `precondition` is an optional gate run before anything else; a `false`
    /// answer aborts with `PreconditionFailed`. If no key pair is loaded one is
    /// generated and the result says so through `key_origin`.
    pub fn seal(
        &mut self,
        message: &str,
        precondition: Option<&mut dyn FnMut() -> bool>,
    ) -> Result<SealedMessage> {
        if let Some(gate) = precondition {
            if !gate() {
                return Err(QrsealError::PreconditionFailed(
                    "QR generation gate was not passed".to_string(),
                ));
            }
        }

        let (public_pem, key_origin) = self.keys.public_key_or_generate()?;
        let payload = codec::encrypt(message, public_pem)?;
        let qr = render_image(payload.as_str(), self.settings.qr_size)?;
        Ok(SealedMessage {
            payload,
            qr,
            key_origin,
        })
    }

    /// Decrypt payload text (typed, pasted, or scanned).
    pub fn open_payload(&mut self, text: &str) -> Result<&str> {
        let private_pem = self.keys.private_key()?;
        let payload = EncryptedPayload::from_text(text);
        match codec::decrypt(&payload, private_pem) {
            Ok(plaintext) => Ok(self.last_plaintext.insert(plaintext).as_str()),
            Err(err) => {
                log_failure(&err);
                Err(err)
            }
        }
    }

    /// Decode the QR symbol in an image file and decrypt it.
    pub fn open_upload(&mut self, path: &Path) -> Result<&str> {
        self.keys.private_key()?;
        let scanned = from_upload(path).inspect_err(log_failure)?;
        self.open_payload(&scanned.text)
    }

    /// Scan frames from `camera` and decrypt the first symbol found.
    ///
    /// Refuses with `NoKeyAvailable` before touching the camera when no private
    /// key is loaded. Returns `Ok(None)` if the user cancelled; an exhausted
    /// budget is `QrNotFound`; an acquisition failure is returned as-is.
    pub fn open_live<C: Camera, K: Clock>(
        &mut self,
        scanner: &mut LiveScanner<K>,
        camera: &mut C,
        observer: &mut dyn FnMut(&ScanEvent),
    ) -> Result<Option<String>> {
        if !self.keys.has_private_key() {
            return Err(QrsealError::NoKeyAvailable);
        }

        match scanner.scan(camera, observer) {
            ScanOutcome::Success(result) => self.open_payload(&result.text).map(|p| Some(p.to_string())),
            ScanOutcome::ExhaustedRetries { .. } => Err(QrsealError::QrNotFound),
            ScanOutcome::UserCancelled => Ok(None),
            ScanOutcome::AcquisitionFailed(err) => Err(err),
        }
    }

    /// A scanner configured from these settings.
    pub fn scanner<K: Clock>(&self, clock: K) -> LiveScanner<K> {
        LiveScanner::new(self.settings.scan, clock)
    }
}

fn log_failure(err: &QrsealError) {
    if err.is_expected() {
        tracing::debug!(error = %err, "could not open payload");
    } else {
        tracing::warn!(error = %err, "could not open payload");
    }
}
