//! Frame source backed by a directory of snapshots.
//!
//! An external capture tool (webcam utility, phone sync folder, screenshot
//! hotkey) drops images into a directory; each poll reads the newest one. A
//! snapshot already examined counts as "no new frame".

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::capture::{Camera, Frame, VideoStream};
use crate::error::{QrsealError, Result};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Camera over a snapshot directory.
#[derive(Debug, Clone)]
pub struct SnapshotDirCamera {
    dir: PathBuf,
}

impl SnapshotDirCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Camera for SnapshotDirCamera {
    type Stream = SnapshotStream;

    fn open(&mut self) -> Result<SnapshotStream> {
        std::fs::read_dir(&self.dir).map_err(|e| {
            QrsealError::CameraAccessDenied(format!(
                "cannot read snapshot directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;
        tracing::debug!(dir = %self.dir.display(), "opened snapshot stream");
        Ok(SnapshotStream {
            dir: self.dir.clone(),
            active: true,
            last_seen: None,
        })
    }
}

/// Stream over the newest snapshot in a directory.
#[derive(Debug)]
pub struct SnapshotStream {
    dir: PathBuf,
    active: bool,
    last_seen: Option<(PathBuf, SystemTime)>,
}

impl SnapshotStream {
    fn newest_snapshot(&self) -> Result<Option<(PathBuf, SystemTime)>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            QrsealError::CameraAccessDenied(format!(
                "snapshot directory {} became unreadable: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut newest: Option<(PathBuf, SystemTime)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_image(&path) {
                continue;
            }
            let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            let replace = newest
                .as_ref()
                .map(|(_, current)| modified > *current)
                .unwrap_or(true);
            if replace {
                newest = Some((path, modified));
            }
        }
        Ok(newest)
    }
}

impl VideoStream for SnapshotStream {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if !self.active {
            return Ok(None);
        }
        let Some(candidate) = self.newest_snapshot()? else {
            return Ok(None);
        };
        if self.last_seen.as_ref() == Some(&candidate) {
            return Ok(None);
        }

        // A half-written file fails to decode; retry it on the next poll.
        let image = match image::open(&candidate.0) {
            Ok(image) => image,
            Err(err) => {
                tracing::debug!(path = %candidate.0.display(), error = %err, "snapshot not readable yet");
                return Ok(None);
            }
        };
        tracing::trace!(path = %candidate.0.display(), "read snapshot");
        self.last_seen = Some(candidate);
        Ok(Some(Frame::from_image(&image)))
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
