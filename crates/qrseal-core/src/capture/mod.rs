//! Capture pipeline: get pixels, find a QR symbol, hand back its text.
//!
//! Two entry points:
//! - [`upload::from_upload`] for a single image file
//! - [`live::LiveScanner`] for a stream of frames with a retry budget
//!
//! Frame sources sit behind the [`Camera`] / [`VideoStream`] traits and time
//! behind [`clock::Clock`], so the retry loop runs without real hardware or
//! real timers in tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Result;

pub mod clock;
pub mod live;
pub mod snapshot;
pub mod upload;

pub use clock::{Clock, ManualClock, SystemClock};
pub use live::{LiveScanner, ScanConfig, ScanEvent, ScanOutcome, ScanState};
pub use snapshot::SnapshotDirCamera;
pub use upload::from_upload;

/// One grayscale frame, row-major.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub luma: Vec<u8>,
}

impl Frame {
    pub fn new(width: usize, height: usize, luma: Vec<u8>) -> Self {
        Self {
            width,
            height,
            luma,
        }
    }

    pub fn from_image(image: &image::DynamicImage) -> Self {
        let gray = image.to_luma8();
        Self::new(
            gray.width() as usize,
            gray.height() as usize,
            gray.into_raw(),
        )
    }
}

/// Where a decoded payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanSource {
    Upload(PathBuf),
    LiveFrame { attempt: u32 },
}

/// Text decoded from a QR symbol. Consumed by decryption, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub text: String,
    pub source: ScanSource,
}

/// An acquired stream of frames.
pub trait VideoStream {
    /// The next frame, or `Ok(None)` when no new frame is ready yet.
    ///
    /// An `Err` means the stream itself failed and scanning should stop.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Stop every underlying track. Must be idempotent.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Something that can hand out a [`VideoStream`].
pub trait Camera {
    type Stream: VideoStream;

    /// Acquire the stream. Must return promptly; failure is terminal.
    fn open(&mut self) -> Result<Self::Stream>;
}

/// Stops the wrapped stream when dropped.
pub struct StreamGuard<S: VideoStream> {
    stream: Option<S>,
}

impl<S: VideoStream> StreamGuard<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn stream_mut(&mut self) -> Option<&mut S> {
        self.stream.as_mut()
    }

    /// Stop the stream now rather than at drop.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("released capture stream");
        }
    }
}

impl<S: VideoStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Shared cancellation flag for a running scan.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag so the token can be reused for the next scan.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
