//! Error types for qrseal core operations.
//!
//! Every variant is recoverable from the user's point of view. The CLI layer
//! maps these to notices and exit codes; nothing here should end the process.

use thiserror::Error;

/// Result type alias for qrseal operations.
pub type Result<T> = std::result::Result<T, QrsealError>;

/// Core error type for qrseal operations.
#[derive(Debug, Error)]
pub enum QrsealError {
    /// No key pair (or the needed half) is loaded
    #[error("No key available: generate or import a key pair first")]
    NoKeyAvailable,

    /// PEM could not be parsed, or the two halves do not belong together
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Plaintext exceeds what OAEP can carry for this key size
    #[error("Message too large: {len} bytes (max {max} bytes for this key)")]
    PayloadTooLarge { len: usize, max: usize },

    /// Wrong private key, or a corrupt/truncated payload
    #[error("Decryption failed: the payload was not produced for this key or is corrupt")]
    DecryptionFailed,

    /// No QR symbol found in the image or frames
    #[error("No QR code detected")]
    QrNotFound,

    /// Frame source could not be opened
    #[error("Camera access denied: {0}")]
    CameraAccessDenied(String),

    /// Key storage could not be read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Payload does not fit into a QR symbol
    #[error("QR encoding error: {0}")]
    Encoding(String),

    /// Image file could not be read or decoded
    #[error("Unreadable image: {0}")]
    ImageUnreadable(String),

    /// The pre-generation gate refused
    #[error("Precondition not met: {0}")]
    PreconditionFailed(String),
}

impl QrsealError {
    /// Outcomes that happen routinely (rotated keys, a blurry photo).
    ///
    /// These are logged at debug level, never as errors.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::DecryptionFailed | Self::QrNotFound)
    }

    /// A suggested remedy for the user, when there is a better one than
    /// "try again". Front ends may substitute their own command wording.
    pub fn remedy(&self) -> Option<&'static str> {
        match self {
            Self::NoKeyAvailable => Some("Generate a new key pair or import an exported one."),
            Self::CameraAccessDenied(_) => Some(
                "Grant access to the capture source (check the directory exists and is readable) and try again.",
            ),
            Self::StorageUnavailable(_) => Some(
                "Check that the key directory exists and is writable.",
            ),
            Self::DecryptionFailed => Some(
                "The QR code may have been created with a different public key; keys may have been rotated.",
            ),
            Self::QrNotFound => Some("Try adjusting the camera, lighting, or image crop."),
            Self::PayloadTooLarge { .. } => Some("Shorten the message."),
            _ => None,
        }
    }
}

impl From<std::io::Error> for QrsealError {
    fn from(err: std::io::Error) -> Self {
        QrsealError::StorageUnavailable(err.to_string())
    }
}

impl From<image::ImageError> for QrsealError {
    fn from(err: image::ImageError) -> Self {
        QrsealError::ImageUnreadable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_outcomes() {
        assert!(QrsealError::DecryptionFailed.is_expected());
        assert!(QrsealError::QrNotFound.is_expected());
        assert!(!QrsealError::NoKeyAvailable.is_expected());
        assert!(!QrsealError::StorageUnavailable("disk".into()).is_expected());
    }

    #[test]
    fn test_environment_errors_have_remedies() {
        assert!(QrsealError::CameraAccessDenied("nope".into())
            .remedy()
            .unwrap()
            .contains("Grant access"));
        assert!(QrsealError::StorageUnavailable("nope".into())
            .remedy()
            .unwrap()
            .contains("writable"));
        assert!(QrsealError::Encoding("too big".into()).remedy().is_none());
    }

    #[test]
    fn test_no_key_remedy_is_neutral() {
        let remedy = QrsealError::NoKeyAvailable.remedy().unwrap();
        assert!(remedy.contains("import"));
        assert!(!remedy.contains("qrseal"));
    }

    #[test]
    fn test_payload_too_large_message() {
        let err = QrsealError::PayloadTooLarge { len: 300, max: 214 };
        assert_eq!(
            err.to_string(),
            "Message too large: 300 bytes (max 214 bytes for this key)"
        );
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: QrsealError = std::io::Error::other("boom").into();
        assert!(matches!(err, QrsealError::StorageUnavailable(_)));
    }
}
