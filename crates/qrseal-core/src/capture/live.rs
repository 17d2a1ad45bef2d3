//! Live capture: poll frames until a QR symbol decodes or the budget runs out.
//!
//! ```text
//! Idle -> Requesting -> Streaming -> Decoding(n) -> Idle
//! ```
//!
//! Every way out of `Streaming`/`Decoding` (success, cancel, exhaustion,
//! stream failure) releases the stream before the outcome is returned.

use std::time::Duration;

use crate::capture::clock::Clock;
use crate::capture::{Camera, CancelToken, ScanResult, ScanSource, StreamGuard, VideoStream};
use crate::error::QrsealError;
use crate::qr::decode_luma;

/// Default number of frames examined before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// Default pause between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Retry budget for a live scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Frames to examine, including ones that were not ready
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
    /// Optional wall-clock bound on top of the attempt count
    pub deadline: Option<Duration>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
            deadline: None,
        }
    }
}

/// Where the scanner is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Requesting,
    Streaming,
    Decoding { attempt: u32 },
}

/// Progress notifications for a UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    State(ScanState),
    Attempt { attempt: u32, max: u32 },
    FrameNotReady { attempt: u32 },
    NoSymbol { attempt: u32 },
}

/// How a live scan ended. The stream is released in every case.
#[derive(Debug)]
pub enum ScanOutcome {
    Success(ScanResult),
    ExhaustedRetries { attempts: u32 },
    UserCancelled,
    AcquisitionFailed(QrsealError),
}

/// Drives one scan at a time against a [`Camera`].
pub struct LiveScanner<K: Clock> {
    config: ScanConfig,
    clock: K,
    cancel: CancelToken,
    state: ScanState,
}

impl<K: Clock> LiveScanner<K> {
    pub fn new(config: ScanConfig, clock: K) -> Self {
        Self {
            config,
            clock,
            cancel: CancelToken::new(),
            state: ScanState::Idle,
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle that stops the scan at the next poll.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    fn transition(&mut self, state: ScanState, observer: &mut dyn FnMut(&ScanEvent)) {
        self.state = state;
        observer(&ScanEvent::State(state));
    }

    /// Acquire a stream from `camera` and poll it until done.
    pub fn scan<C: Camera>(
        &mut self,
        camera: &mut C,
        observer: &mut dyn FnMut(&ScanEvent),
    ) -> ScanOutcome {
        self.transition(ScanState::Requesting, observer);
        let stream = match camera.open() {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(error = %err, "could not acquire capture stream");
                self.transition(ScanState::Idle, observer);
                return ScanOutcome::AcquisitionFailed(err);
            }
        };

        let mut guard = StreamGuard::new(stream);
        self.transition(ScanState::Streaming, observer);
        let outcome = match guard.stream_mut() {
            Some(stream) => self.poll(stream, observer),
            None => ScanOutcome::UserCancelled,
        };
        guard.release();
        self.transition(ScanState::Idle, observer);

        match &outcome {
            ScanOutcome::Success(_) => tracing::info!("QR code captured"),
            ScanOutcome::ExhaustedRetries { attempts } => {
                tracing::info!(attempts, "no QR code found in live capture")
            }
            ScanOutcome::UserCancelled => tracing::info!("live capture cancelled"),
            ScanOutcome::AcquisitionFailed(err) => {
                tracing::warn!(error = %err, "capture stream failed")
            }
        }
        outcome
    }

    fn poll<S: VideoStream>(
        &mut self,
        stream: &mut S,
        observer: &mut dyn FnMut(&ScanEvent),
    ) -> ScanOutcome {
        let max = self.config.max_attempts;
        let started = self.clock.now();

        for attempt in 1..=max {
            if self.cancel.is_cancelled() {
                return ScanOutcome::UserCancelled;
            }
            if let Some(deadline) = self.config.deadline {
                if self.clock.now().duration_since(started) >= deadline {
                    return ScanOutcome::ExhaustedRetries {
                        attempts: attempt - 1,
                    };
                }
            }

            self.transition(ScanState::Decoding { attempt }, observer);
            observer(&ScanEvent::Attempt { attempt, max });

            match stream.next_frame() {
                Ok(Some(frame)) => {
                    if let Some(text) = decode_luma(frame.width, frame.height, &frame.luma) {
                        return ScanOutcome::Success(ScanResult {
                            text,
                            source: ScanSource::LiveFrame { attempt },
                        });
                    }
                    observer(&ScanEvent::NoSymbol { attempt });
                }
                Ok(None) => observer(&ScanEvent::FrameNotReady { attempt }),
                Err(err) => return ScanOutcome::AcquisitionFailed(err),
            }

            // A frame that is not ready yet waits the full delay too. Snapshot
            // sources report "no new frame" this way between captures.
            if attempt < max {
                self.clock.sleep(self.config.delay);
            }
        }

        ScanOutcome::ExhaustedRetries { attempts: max }
    }
}
