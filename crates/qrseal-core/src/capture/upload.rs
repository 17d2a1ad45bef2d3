//! Single-image capture.

use std::path::Path;

use crate::capture::{ScanResult, ScanSource};
use crate::error::{QrsealError, Result};
use crate::qr::decode_image;

/// Load `path`, rasterize it, and decode the first QR symbol in it.
///
/// # Errors
///
/// - `ImageUnreadable` if the file cannot be read or is not a supported image
/// - `QrNotFound` if the image holds no decodable symbol
pub fn from_upload(path: &Path) -> Result<ScanResult> {
    let image = image::open(path).map_err(|e| {
        QrsealError::ImageUnreadable(format!("{}: {}", path.display(), e))
    })?;

    match decode_image(&image) {
        Some(text) => {
            tracing::debug!(path = %path.display(), "decoded QR code from image");
            Ok(ScanResult {
                text,
                source: ScanSource::Upload(path.to_path_buf()),
            })
        }
        None => {
            tracing::debug!(path = %path.display(), "no QR code in image");
            Err(QrsealError::QrNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::{render_png, DEFAULT_QR_SIZE};
    use image::{GrayImage, Luma};
    use tempfile::tempdir;

    #[test]
    fn test_upload_with_symbol() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("qr.png");
        render_png("dXBsb2Fk", DEFAULT_QR_SIZE, &path).unwrap();

        let result = from_upload(&path).unwrap();
        assert_eq!(result.text, "dXBsb2Fk");
        assert_eq!(result.source, ScanSource::Upload(path));
    }

    #[test]
    fn test_upload_without_symbol() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.png");
        GrayImage::from_pixel(120, 80, Luma([200])).save(&path).unwrap();

        let err = from_upload(&path).unwrap_err();
        assert!(matches!(err, QrsealError::QrNotFound));
    }

    #[test]
    fn test_upload_missing_file() {
        let dir = tempdir().unwrap();
        let err = from_upload(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, QrsealError::ImageUnreadable(_)));
    }

    #[test]
    fn test_upload_not_an_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, "definitely text").unwrap();
        let err = from_upload(&path).unwrap_err();
        assert!(matches!(err, QrsealError::ImageUnreadable(_)));
    }
}
