//! Error types for Porchlight Verify.
//!
//! This module defines the error types used throughout the crate, providing
//! structured error handling with clear, human-readable messages. Everything
//! the verification screen itself can recover from (a rejected code, a resend
//! pressed too early) is not an error here; these types cover the failures
//! that end the program instead.

use thiserror::Error;

use crate::config::ConfigError;
use crate::phone::PhoneError;

/// Errors that can occur while running the verification client.
///
/// This is the primary error type for the crate, encompassing all failure
/// modes that propagate out of the library.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The supplied phone number could not be parsed.
    #[error("phone number error: {0}")]
    Phone(#[from] PhoneError),

    /// TUI-related error.
    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
}

/// Errors that can occur during TUI operation.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal initialization failed.
    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] std::io::Error),

    /// Terminal rendering failed.
    #[error("render error: {0}")]
    Render(#[source] std::io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(String),

    /// Terminal size is below the absolute minimum (40x12).
    #[error("terminal too small: {width}x{height} (minimum 40x12)")]
    TerminalTooSmall {
        /// Observed width in columns.
        width: u16,
        /// Observed height in rows.
        height: u16,
    },
}

/// A specialized `Result` type for verification client operations.
pub type Result<T> = std::result::Result<T, VerifyError>;
