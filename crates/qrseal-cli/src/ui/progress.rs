//! Progress indicators for long-running operations using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::time::Duration;

use super::context::UiContext;
use super::theme::spinner_frames;

/// A spinner for indeterminate progress (key generation).
pub struct Spinner {
    bar: Option<IndicatifBar>,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(ctx: &UiContext, message: &str) -> Self {
        let bar = if ctx.allows_animation() {
            let pb = IndicatifBar::new_spinner();
            let template = if ctx.color {
                "{spinner:.cyan} {msg}..."
            } else {
                "{spinner} {msg}..."
            };
            let style = ProgressStyle::default_spinner()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(spinner_frames(ctx.unicode));
            pb.set_style(style);
            pb.set_message(message.to_string());
            Some(pb)
        } else {
            None
        };

        Self { bar }
    }

    /// Start the spinner animation.
    pub fn start(&self) {
        if let Some(bar) = &self.bar {
            bar.enable_steady_tick(Duration::from_millis(80));
        }
    }

    /// Clear the spinner without a message.
    pub fn clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Attempt counter for a live scan.
///
/// Animated on a TTY; silent otherwise.
pub struct AttemptBar {
    bar: Option<IndicatifBar>,
}

impl AttemptBar {
    pub fn new(ctx: &UiContext, max_attempts: u32, message: &str) -> Self {
        let bar = if ctx.allows_animation() {
            let pb = IndicatifBar::new(u64::from(max_attempts));
            let template = if ctx.color {
                "{msg} [{bar:20.cyan/dim}] {pos}/{len}"
            } else {
                "{msg} [{bar:20}] {pos}/{len}"
            };
            let style = ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(if ctx.unicode { "━━─" } else { "=>-" });
            pb.set_style(style);
            pb.set_message(message.to_string());
            Some(pb)
        } else {
            None
        };

        Self { bar }
    }

    /// Record that attempt `attempt` has started.
    pub fn attempt(&self, attempt: u32) {
        if let Some(bar) = &self.bar {
            bar.set_position(u64::from(attempt));
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
