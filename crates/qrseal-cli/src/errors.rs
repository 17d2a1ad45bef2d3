//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI. Core errors that reach
//! `main` are classified the same way.

use std::fmt;

use qrseal_core::QrsealError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (input file, key pair)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),

    /// Interactive input needed but unavailable
    NeedsInput { message: String, hint: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, .. } | CliError::NeedsInput { message, .. } => {
                write!(f, "{}", message)
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Create a NeedsInput error with message and hint.
    pub fn needs_input(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NeedsInput {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) | CliError::NeedsInput { .. } => exit_codes::INVALID_INPUT,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::NotFound { hint, .. } | CliError::NeedsInput { hint, .. } => Some(hint),
            CliError::InvalidInput(_) => None,
        }
    }
}

/// Exit code for a core error.
pub fn core_exit_code(err: &QrsealError) -> i32 {
    match err {
        QrsealError::NoKeyAvailable | QrsealError::QrNotFound => exit_codes::NOT_FOUND,
        QrsealError::InvalidKey(_)
        | QrsealError::PayloadTooLarge { .. }
        | QrsealError::Encoding(_)
        | QrsealError::ImageUnreadable(_)
        | QrsealError::PreconditionFailed(_) => exit_codes::INVALID_INPUT,
        QrsealError::DecryptionFailed => exit_codes::KEY_MISMATCH,
        QrsealError::CameraAccessDenied(_) | QrsealError::StorageUnavailable(_) => {
            exit_codes::ENVIRONMENT
        }
    }
}

/// Hint for a core error, naming the commands that fix it.
pub fn core_hint(err: &QrsealError) -> Option<String> {
    let hint = match err {
        QrsealError::NoKeyAvailable => {
            "Run `qrseal keys generate` or `qrseal keys import <file>`."
        }
        QrsealError::InvalidKey(_) => {
            "If the stored key files are damaged, replace them with `qrseal keys generate --yes` or `qrseal keys import <file>`."
        }
        QrsealError::StorageUnavailable(_) => {
            "Check that the key directory exists and is writable, or pass --key-dir."
        }
        other => return other.remedy().map(str::to_string),
    };
    Some(hint.to_string())
}

/// Exit code and hint for any error reaching `main`.
pub fn classify(err: &anyhow::Error) -> (i32, Option<String>) {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return (cli.exit_code(), cli.hint().map(str::to_string));
    }
    if let Some(core) = err.downcast_ref::<QrsealError>() {
        return (core_exit_code(core), core_hint(core));
    }
    (1, None)
}
