use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use once_cell::sync::Lazy;
use tempfile::tempdir;

use qrseal_core::capture::{
    Camera, Frame, ManualClock, ScanConfig, ScanEvent, SnapshotDirCamera, VideoStream,
};
use qrseal_core::codec;
use qrseal_core::keys::{KeyManager, KeyPair, MemoryKeyStore, KEY_BITS};
use qrseal_core::qr::{render_image, render_png, DEFAULT_QR_SIZE};
use qrseal_core::{QrsealError, Result, Settings, Workflow};

static PAIR: Lazy<KeyPair> =
    Lazy::new(|| KeyPair::generate(KEY_BITS).expect("key generation should succeed"));

/// Tracks how many streams are open so tests can assert nothing leaks.
#[derive(Default)]
struct Tracks {
    open: Cell<u32>,
    opened: Cell<u32>,
    pulls: Cell<u32>,
}

struct FakeCamera {
    tracks: Rc<Tracks>,
    /// Frame returned on the n-th pull (1-based); every other pull gets a blank frame
    symbol_on: Option<(u32, String)>,
}

struct FakeStream {
    tracks: Rc<Tracks>,
    symbol_on: Option<(u32, String)>,
    active: bool,
}

impl Camera for FakeCamera {
    type Stream = FakeStream;

    fn open(&mut self) -> Result<FakeStream> {
        self.tracks.open.set(self.tracks.open.get() + 1);
        self.tracks.opened.set(self.tracks.opened.get() + 1);
        Ok(FakeStream {
            tracks: Rc::clone(&self.tracks),
            symbol_on: self.symbol_on.clone(),
            active: true,
        })
    }
}

impl VideoStream for FakeStream {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let pull = self.tracks.pulls.get() + 1;
        self.tracks.pulls.set(pull);
        match &self.symbol_on {
            Some((n, text)) if *n == pull => {
                let image = render_image(text, DEFAULT_QR_SIZE)?;
                Ok(Some(Frame::new(
                    image.width() as usize,
                    image.height() as usize,
                    image.into_raw(),
                )))
            }
            _ => Ok(Some(Frame::new(64, 64, vec![255; 64 * 64]))),
        }
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.tracks.open.set(self.tracks.open.get() - 1);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

fn workflow() -> Workflow<MemoryKeyStore> {
    let mut keys = KeyManager::new(MemoryKeyStore::new());
    keys.import(&PAIR.export_text()).expect("import should succeed");
    Workflow::new(keys, Settings::default())
}

#[test]
fn test_no_symbol_exhausts_twenty_attempts_and_releases_stream() {
    let mut workflow = workflow();
    let tracks = Rc::new(Tracks::default());
    let mut camera = FakeCamera {
        tracks: Rc::clone(&tracks),
        symbol_on: None,
    };
    let clock = ManualClock::new();
    let mut scanner = workflow.scanner(&clock);
    let mut attempts = Vec::new();

    let err = workflow
        .open_live(&mut scanner, &mut camera, &mut |event: &ScanEvent| {
            if let ScanEvent::Attempt { attempt, .. } = event {
                attempts.push(*attempt);
            }
        })
        .unwrap_err();

    assert!(matches!(err, QrsealError::QrNotFound));
    assert_eq!(tracks.pulls.get(), 20);
    assert_eq!(attempts, (1..=20).collect::<Vec<_>>());
    assert_eq!(tracks.open.get(), 0);
    assert_eq!(clock.elapsed(), Duration::from_millis(500) * 19);
    assert!(workflow.last_plaintext().is_none());
}

#[test]
fn test_symbol_on_later_frame_opens() {
    let mut workflow = workflow();
    let payload = codec::encrypt("seen on camera", PAIR.public_pem()).expect("encrypt should succeed");
    let tracks = Rc::new(Tracks::default());
    let mut camera = FakeCamera {
        tracks: Rc::clone(&tracks),
        symbol_on: Some((4, payload.into_string())),
    };
    let clock = ManualClock::new();
    let mut scanner = workflow.scanner(&clock);

    let opened = workflow
        .open_live(&mut scanner, &mut camera, &mut |_: &ScanEvent| {})
        .expect("live open should succeed");

    assert_eq!(opened.as_deref(), Some("seen on camera"));
    assert_eq!(tracks.pulls.get(), 4);
    assert_eq!(tracks.open.get(), 0);
    assert_eq!(workflow.last_plaintext(), Some("seen on camera"));
}

#[test]
fn test_cancelled_scan_returns_none() {
    let mut workflow = workflow();
    let tracks = Rc::new(Tracks::default());
    let mut camera = FakeCamera {
        tracks: Rc::clone(&tracks),
        symbol_on: None,
    };
    let clock = ManualClock::new();
    let mut scanner = workflow.scanner(&clock);
    let cancel = scanner.cancel_token();

    let opened = workflow
        .open_live(&mut scanner, &mut camera, &mut |event: &ScanEvent| {
            if let ScanEvent::NoSymbol { attempt: 2 } = event {
                cancel.cancel();
            }
        })
        .expect("cancel is not an error");

    assert!(opened.is_none());
    assert_eq!(tracks.pulls.get(), 2);
    assert_eq!(tracks.open.get(), 0);
}

#[test]
fn test_live_scan_without_keys_never_opens_camera() {
    let mut workflow = Workflow::new(KeyManager::new(MemoryKeyStore::new()), Settings::default());
    let tracks = Rc::new(Tracks::default());
    let mut camera = FakeCamera {
        tracks: Rc::clone(&tracks),
        symbol_on: None,
    };
    let clock = ManualClock::new();
    let mut scanner = workflow.scanner(&clock);

    let err = workflow
        .open_live(&mut scanner, &mut camera, &mut |_: &ScanEvent| {})
        .unwrap_err();

    assert!(matches!(err, QrsealError::NoKeyAvailable));
    assert_eq!(tracks.opened.get(), 0);
}

#[test]
fn test_snapshot_directory_scan() {
    let dir = tempdir().expect("tempdir should succeed");
    let mut workflow = workflow();
    let payload = codec::encrypt("from a folder", PAIR.public_pem()).expect("encrypt should succeed");
    render_png(payload.as_str(), DEFAULT_QR_SIZE, &dir.path().join("shot.png"))
        .expect("render should succeed");

    let clock = ManualClock::new();
    let settings = ScanConfig {
        max_attempts: 3,
        ..ScanConfig::default()
    };
    let mut scanner = qrseal_core::capture::LiveScanner::new(settings, &clock);
    let mut camera = SnapshotDirCamera::new(dir.path());

    let opened = workflow
        .open_live(&mut scanner, &mut camera, &mut |_: &ScanEvent| {})
        .expect("live open should succeed");
    assert_eq!(opened.as_deref(), Some("from a folder"));
}

#[test]
fn test_missing_snapshot_directory_is_camera_denied() {
    let dir = tempdir().expect("tempdir should succeed");
    let mut workflow = workflow();
    let clock = ManualClock::new();
    let mut scanner = workflow.scanner(&clock);
    let mut camera = SnapshotDirCamera::new(dir.path().join("missing"));

    let err = workflow
        .open_live(&mut scanner, &mut camera, &mut |_: &ScanEvent| {})
        .unwrap_err();
    assert!(matches!(err, QrsealError::CameraAccessDenied(_)));
}
