//! # Qrseal Core
//!
//! Core library for Qrseal - seal short messages with RSA-OAEP and carry them
//! as QR codes.
//!
//! This crate holds the domain logic independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **keys**: Key pair generation, persistence and lifecycle
//! - **codec**: OAEP encryption to and from base64 payloads
//! - **qr**: QR symbol rendering and decoding
//! - **capture**: Image upload and live frame scanning with a retry budget
//! - **workflow**: Application state tying the above together

pub mod capture;
pub mod codec;
pub mod error;
pub mod fs;
pub mod keys;
pub mod qr;
pub mod workflow;

pub use error::{QrsealError, Result};
pub use workflow::{SealedMessage, Settings, Workflow};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
