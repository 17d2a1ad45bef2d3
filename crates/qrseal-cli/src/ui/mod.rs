//! UI primitives for the Qrseal CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode, quiet)
//! - **Mode**: Output mode resolution (plain, pretty)
//! - **Theme**: Badge tokens, color palette, symbols
//! - **Render**: Receipts, hints, notices, tables
//! - **Progress**: Key generation spinner, scan attempt bar
//! - **Prompt**: Confirmation and text prompts

mod context;
mod mode;
pub mod progress;
pub mod prompt;
pub mod render;
pub mod theme;

// Re-export core types at module level
pub use context::{UiContext, UiFlags};
pub use theme::Badge;

// Re-export commonly used render functions
pub use render::{blank_line, header, notice, print, print_error, property_table, receipt};

pub use progress::{AttemptBar, Spinner};
