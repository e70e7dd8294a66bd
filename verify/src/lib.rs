//! Porchlight Verify - terminal phone verification.
//!
//! This crate provides the phone verification screen for the Porchlight
//! marketplace as a standalone terminal application: a row of one-time-code
//! digit slots with derived focus, paste-aware entry, auto-submit on the
//! final digit, and a resend countdown.
//!
//! # Overview
//!
//! A session issues a code for the given phone number, opens the entry
//! screen, and resolves to verified or failed per attempt. Codes are issued
//! and checked in process by [`verifier::MemoryVerifier`]; there is no
//! SMS backend, so the issued code goes to the log (and optionally on
//! screen with `--show-code`).
//!
//! # Modules
//!
//! - [`otp`]: Digit buffer, submission state machine, and resend cooldown
//! - [`phone`]: Phone number parsing, formatting, and masking
//! - [`verifier`]: Code issue and verification collaborator
//! - [`prefs`]: Persisted user preferences (theme choice)
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Error types for verification sessions
//! - [`tui`]: Terminal user interface for the verification screen

pub mod config;
pub mod error;
pub mod otp;
pub mod phone;
pub mod prefs;
pub mod tui;
pub mod verifier;

pub use config::Config;
pub use error::{Result, TuiError, VerifyError};
pub use otp::{CodeEntry, CooldownTick, Dispatch, ResendCooldown, SubmitPhase, VerifyFlow};
pub use phone::{PhoneError, PhoneNumber};
pub use prefs::{Preferences, ThemeChoice};
pub use verifier::{CodeReceipt, CodeVerifier, MemoryVerifier, VerifierSettings, VerifyOutcome};
