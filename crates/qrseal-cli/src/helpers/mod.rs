//! Helper functions for CLI commands.

mod input;

pub use input::{confirm_destructive, read_text_input};
