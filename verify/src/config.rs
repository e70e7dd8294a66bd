//! Configuration module for Porchlight Verify.
//!
//! All tuning comes from environment variables with sensible defaults; the
//! flow and phone number come from the CLI. Nothing here is required, so a
//! bare `porchlight-verify signin --phone ...` always works.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `PORCHLIGHT_CODE_LENGTH` | No | 4 | Number of digit slots (3-10) |
//! | `PORCHLIGHT_RESEND_COOLDOWN_SECS` | No | 30 | Seconds before resend is allowed |
//! | `PORCHLIGHT_VERIFY_LATENCY_MS` | No | 800 | Simulated verification latency |
//! | `PORCHLIGHT_CODE` | No | random | Pin the issued code (must be exactly code-length digits) |
//! | `PORCHLIGHT_CODE_TTL_SECS` | No | 300 | Seconds before an issued code expires |
//! | `PORCHLIGHT_MAX_ATTEMPTS` | No | 3 | Wrong guesses before a code locks out |
//! | `PORCHLIGHT_CONFIG_DIR` | No | `~/.porchlight` | Directory holding `preferences.json` |
//!
//! # Example
//!
//! ```no_run
//! use porchlight_verify::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Code length: {}", config.code_length);
//! ```

use std::env;
use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

use crate::otp::{DEFAULT_CODE_LENGTH, DEFAULT_RESEND_COOLDOWN_SECS};
use crate::verifier::{DEFAULT_CODE_TTL_SECS, DEFAULT_MAX_ATTEMPTS, DEFAULT_VERIFY_LATENCY_MS};

/// Minimum allowed code length.
const MIN_CODE_LENGTH: usize = 3;

/// Maximum allowed code length.
const MAX_CODE_LENGTH: usize = 10;

/// Default config directory name relative to home.
const DEFAULT_CONFIG_DIR: &str = ".porchlight";

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// The offending variable name.
        key: String,
        /// What was wrong with it.
        message: String,
    },

    /// Failed to determine home directory.
    #[error("failed to determine home directory")]
    NoHomeDirectory,
}

/// Configuration for Porchlight Verify.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of digit slots on the verification screen.
    pub code_length: usize,

    /// Seconds a user must wait between code requests.
    pub resend_cooldown_secs: u32,

    /// Simulated verification round-trip in milliseconds. Zero is allowed
    /// and makes verification resolve on the next event-loop pass.
    pub verify_latency_ms: u64,

    /// Fixed code to issue instead of a random one, when set.
    pub pinned_code: Option<String>,

    /// Seconds before an issued code expires.
    pub code_ttl_secs: i64,

    /// Wrong guesses allowed before a code stops being checkable.
    pub max_attempts: u32,

    /// Directory holding `preferences.json`.
    pub config_dir: PathBuf,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - Any numeric variable is set but is not a valid positive integer in
    ///   its documented range
    /// - `PORCHLIGHT_CODE` is set but is not exactly code-length digits
    /// - The home directory cannot be determined (needed for the default
    ///   config directory)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Optional: PORCHLIGHT_CODE_LENGTH (default: 4, must be 3-10)
        let code_length = match env::var("PORCHLIGHT_CODE_LENGTH") {
            Ok(val) => {
                let length = val
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "PORCHLIGHT_CODE_LENGTH".to_string(),
                        message: format!("expected positive integer, got '{val}'"),
                    })?;
                if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
                    return Err(ConfigError::InvalidValue {
                        key: "PORCHLIGHT_CODE_LENGTH".to_string(),
                        message: format!(
                            "code length must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH}, got {length}"
                        ),
                    });
                }
                length
            }
            Err(_) => DEFAULT_CODE_LENGTH,
        };

        // Optional: PORCHLIGHT_RESEND_COOLDOWN_SECS (default: 30, must be > 0)
        let resend_cooldown_secs = match env::var("PORCHLIGHT_RESEND_COOLDOWN_SECS") {
            Ok(val) => {
                let secs = val.parse::<u32>().map_err(|_| ConfigError::InvalidValue {
                    key: "PORCHLIGHT_RESEND_COOLDOWN_SECS".to_string(),
                    message: format!("expected positive integer, got '{val}'"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "PORCHLIGHT_RESEND_COOLDOWN_SECS".to_string(),
                        message: "cooldown must be at least 1 second".to_string(),
                    });
                }
                secs
            }
            Err(_) => DEFAULT_RESEND_COOLDOWN_SECS,
        };

        // Optional: PORCHLIGHT_VERIFY_LATENCY_MS (default: 800, zero allowed)
        let verify_latency_ms = match env::var("PORCHLIGHT_VERIFY_LATENCY_MS") {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "PORCHLIGHT_VERIFY_LATENCY_MS".to_string(),
                message: format!("expected integer, got '{val}'"),
            })?,
            Err(_) => DEFAULT_VERIFY_LATENCY_MS,
        };

        // Optional: PORCHLIGHT_CODE (default: none = random per issue)
        let pinned_code = match env::var("PORCHLIGHT_CODE") {
            Ok(val) => {
                if val.len() != code_length || !val.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ConfigError::InvalidValue {
                        key: "PORCHLIGHT_CODE".to_string(),
                        message: format!("expected exactly {code_length} digits, got '{val}'"),
                    });
                }
                Some(val)
            }
            Err(_) => None,
        };

        // Optional: PORCHLIGHT_CODE_TTL_SECS (default: 300, must be > 0)
        let code_ttl_secs = match env::var("PORCHLIGHT_CODE_TTL_SECS") {
            Ok(val) => {
                let secs = val.parse::<i64>().map_err(|_| ConfigError::InvalidValue {
                    key: "PORCHLIGHT_CODE_TTL_SECS".to_string(),
                    message: format!("expected positive integer, got '{val}'"),
                })?;
                if secs <= 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "PORCHLIGHT_CODE_TTL_SECS".to_string(),
                        message: "code TTL must be at least 1 second".to_string(),
                    });
                }
                secs
            }
            Err(_) => DEFAULT_CODE_TTL_SECS,
        };

        // Optional: PORCHLIGHT_MAX_ATTEMPTS (default: 3, must be > 0)
        let max_attempts = match env::var("PORCHLIGHT_MAX_ATTEMPTS") {
            Ok(val) => {
                let attempts = val.parse::<u32>().map_err(|_| ConfigError::InvalidValue {
                    key: "PORCHLIGHT_MAX_ATTEMPTS".to_string(),
                    message: format!("expected positive integer, got '{val}'"),
                })?;
                if attempts == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "PORCHLIGHT_MAX_ATTEMPTS".to_string(),
                        message: "attempt limit must be at least 1".to_string(),
                    });
                }
                attempts
            }
            Err(_) => DEFAULT_MAX_ATTEMPTS,
        };

        // Optional: PORCHLIGHT_CONFIG_DIR (default: ~/.porchlight)
        let config_dir = match env::var("PORCHLIGHT_CONFIG_DIR") {
            Ok(val) => PathBuf::from(val),
            Err(_) => {
                let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
                base_dirs.home_dir().join(DEFAULT_CONFIG_DIR)
            }
        };

        Ok(Self {
            code_length,
            resend_cooldown_secs,
            verify_latency_ms,
            pinned_code,
            code_ttl_secs,
            max_attempts,
            config_dir,
        })
    }
}
