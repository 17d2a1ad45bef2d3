//! QR symbol rendering and decoding.
//!
//! Rendering goes through `qrcode`, decoding through `rqrr`. The payload is
//! always treated as opaque text.

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::render::unicode;
use qrcode::QrCode;

use crate::error::{QrsealError, Result};

/// Default rendered edge length, in pixels.
pub const DEFAULT_QR_SIZE: u32 = 250;

fn build(payload: &str) -> Result<QrCode> {
    QrCode::new(payload.as_bytes()).map_err(|e| QrsealError::Encoding(e.to_string()))
}

/// Render `payload` as a grayscale image at least `size` x `size` pixels.
pub fn render_image(payload: &str, size: u32) -> Result<GrayImage> {
    let code = build(payload)?;
    Ok(code
        .render::<Luma<u8>>()
        .min_dimensions(size, size)
        .build())
}

/// Render `payload` and write it as a PNG file.
pub fn render_png(payload: &str, size: u32, path: &Path) -> Result<()> {
    save_png(&render_image(payload, size)?, path)
}

/// Write an already rendered symbol as a PNG file.
pub fn save_png(image: &GrayImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| {
            QrsealError::StorageUnavailable(format!("Failed to write {}: {}", path.display(), e))
        })?;
    tracing::debug!(path = %path.display(), width = image.width(), "wrote QR image");
    Ok(())
}

/// Render `payload` with half-height unicode blocks for a terminal.
///
/// Colors are inverted so the symbol scans on dark-background terminals.
pub fn render_terminal(payload: &str) -> Result<String> {
    let code = build(payload)?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

/// Decode the first QR symbol found in a row-major 8-bit grayscale buffer.
///
/// Returns `None` when no symbol decodes, including when `pixels` is shorter
/// than `width * height`.
pub fn decode_luma(width: usize, height: usize, pixels: &[u8]) -> Option<String> {
    let needed = width.checked_mul(height)?;
    if width == 0 || height == 0 || pixels.len() < needed {
        tracing::debug!(width, height, len = pixels.len(), "pixel buffer too small");
        return None;
    }

    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| pixels[y * width + x]);
    let grids = prepared.detect_grids();
    tracing::trace!(candidates = grids.len(), "detected QR grids");

    for grid in grids {
        match grid.decode() {
            Ok((_meta, content)) => return Some(content),
            Err(err) => tracing::debug!(error = %err, "QR grid failed to decode"),
        }
    }
    None
}

/// Decode from a row-major RGBA buffer (the layout a canvas hands out).
pub fn decode_rgba(width: usize, height: usize, pixels: &[u8]) -> Option<String> {
    let needed = width.checked_mul(height)?.checked_mul(4)?;
    if pixels.len() < needed {
        return None;
    }
    let luma: Vec<u8> = pixels[..needed]
        .chunks_exact(4)
        .map(|px| {
            let weighted = px[0] as u32 * 299 + px[1] as u32 * 587 + px[2] as u32 * 114;
            (weighted / 1000) as u8
        })
        .collect();
    decode_luma(width, height, &luma)
}

/// Decode from any decoded image.
pub fn decode_image(image: &DynamicImage) -> Option<String> {
    let gray = image.to_luma8();
    decode_luma(gray.width() as usize, gray.height() as usize, gray.as_raw())
}
