//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (key pair, QR code, input file).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Payload was not sealed for the loaded key.
    pub const KEY_MISMATCH: i32 = 5;

    /// Storage or capture source unavailable.
    pub const ENVIRONMENT: i32 = 6;
}

/// File name used by `keys export` when no path is given.
pub const DEFAULT_EXPORT_FILE: &str = "RSA_Keys.txt";
