//! Code verification collaborator.
//!
//! The verification screen never talks to a backend itself; it dispatches a
//! guarded attempt to a [`CodeVerifier`] and reacts to the outcome. The only
//! implementation here is [`MemoryVerifier`], which issues and checks codes
//! entirely in process: Porchlight has no verification backend, so the log
//! line (and the optional on-screen preview) stand in for the SMS channel.
//!
//! # Semantics
//!
//! A verifier holds at most one outstanding code per process. Issuing a new
//! code replaces the previous one and resets the attempt count. Codes expire
//! after a TTL, are consumed by a successful verification, and stop being
//! checkable after too many wrong attempts. Comparison is constant-time.
//!
//! Phone numbers appear in log fields masked, never in full.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::otp::DEFAULT_CODE_LENGTH;
use crate::phone::PhoneNumber;

/// Default lifetime of an issued code, in seconds.
pub const DEFAULT_CODE_TTL_SECS: i64 = 300;

/// Default number of wrong guesses before a code stops being checkable.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default artificial verification latency, in milliseconds.
///
/// Long enough that the submitting state is visible on screen, short enough
/// not to feel broken.
pub const DEFAULT_VERIFY_LATENCY_MS: u64 = 800;

/// Why a verification attempt was rejected.
///
/// The display strings are the inline messages shown on the verification
/// screen, so they speak to the user, not to an operator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The submitted code does not match the issued one.
    #[error("Incorrect code. Check the message and try again")]
    Mismatch,

    /// The issued code is past its TTL, or no code is outstanding.
    #[error("That code has expired. Request a new one")]
    Expired,

    /// The attempt limit for the issued code has been reached.
    #[error("Too many attempts. Request a new code")]
    TooManyAttempts,
}

/// Result of a verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The code matched; the screen should move to its success state.
    Approved,
    /// The code was rejected; the reason carries the inline message.
    Rejected(RejectReason),
}

/// Details of a freshly issued code.
#[derive(Debug, Clone)]
pub struct CodeReceipt {
    /// Correlation id for log lines about this code.
    pub issue_id: Uuid,
    /// How long the code stays valid.
    pub ttl: Duration,
    /// The issued code itself, when the implementation has no delivery
    /// channel. A real SMS-backed implementation returns `None`.
    pub preview: Option<String>,
}

/// External collaborator that issues and checks one-time passcodes.
///
/// Implementations must be shareable across the event loop and the spawned
/// verification tasks, hence `Send + Sync` behind an `Arc`.
#[async_trait]
pub trait CodeVerifier: Send + Sync {
    /// Issues a fresh code for `phone`, replacing any outstanding one.
    async fn request_code(&self, phone: &PhoneNumber) -> CodeReceipt;

    /// Checks `code` against the outstanding one for `phone`.
    async fn verify(&self, phone: &PhoneNumber, code: &str) -> VerifyOutcome;
}

/// Tuning for [`MemoryVerifier`].
#[derive(Debug, Clone)]
pub struct VerifierSettings {
    /// Number of digits in issued codes.
    pub code_length: usize,
    /// Fixed code to issue instead of a random one. Useful for demos and
    /// tests; set from `PORCHLIGHT_CODE`.
    pub pinned_code: Option<String>,
    /// Code lifetime in seconds.
    pub ttl_secs: i64,
    /// Wrong guesses allowed before the code stops being checkable.
    pub max_attempts: u32,
    /// Simulated round-trip latency for `verify`.
    pub latency: Duration,
}

impl Default for VerifierSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            pinned_code: None,
            ttl_secs: DEFAULT_CODE_TTL_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            latency: Duration::from_millis(DEFAULT_VERIFY_LATENCY_MS),
        }
    }
}

/// The single outstanding code and its bookkeeping.
#[derive(Debug)]
struct IssuedCode {
    id: Uuid,
    code: String,
    issued_at: DateTime<Utc>,
    attempts: u32,
}

/// In-process verifier holding the outstanding code in memory.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use porchlight_verify::phone::PhoneNumber;
/// use porchlight_verify::verifier::{CodeVerifier, MemoryVerifier, VerifierSettings, VerifyOutcome};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let verifier = MemoryVerifier::new(VerifierSettings {
///     latency: Duration::ZERO,
///     ..VerifierSettings::default()
/// });
/// let phone = PhoneNumber::parse("5552017733").unwrap();
///
/// let receipt = verifier.request_code(&phone).await;
/// let code = receipt.preview.unwrap();
/// assert_eq!(verifier.verify(&phone, &code).await, VerifyOutcome::Approved);
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryVerifier {
    settings: VerifierSettings,
    issued: Mutex<Option<IssuedCode>>,
}

impl MemoryVerifier {
    /// Creates a verifier with the given settings and no outstanding code.
    #[must_use]
    pub fn new(settings: VerifierSettings) -> Self {
        Self {
            settings,
            issued: Mutex::new(None),
        }
    }

    /// Generates the next code: the pinned one if configured, otherwise
    /// random digits of the configured length.
    fn next_code(&self) -> String {
        if let Some(pinned) = &self.settings.pinned_code {
            return pinned.clone();
        }
        use rand::Rng;
        let mut rng = rand::rng();
        (0..self.settings.code_length)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect()
    }
}

#[async_trait]
impl CodeVerifier for MemoryVerifier {
    async fn request_code(&self, phone: &PhoneNumber) -> CodeReceipt {
        let code = self.next_code();
        let id = Uuid::new_v4();

        let mut issued = self.issued.lock().await;
        *issued = Some(IssuedCode {
            id,
            code: code.clone(),
            issued_at: Utc::now(),
            attempts: 0,
        });

        info!(
            issue_id = %id,
            phone = %phone.masked('*'),
            ttl_secs = self.settings.ttl_secs,
            "Verification code issued"
        );
        // The log is the delivery channel; the code itself stays at debug.
        debug!(issue_id = %id, code = %code, "Issued code (no SMS channel)");

        CodeReceipt {
            issue_id: id,
            ttl: Duration::from_secs(self.settings.ttl_secs.max(0) as u64),
            preview: Some(code),
        }
    }

    async fn verify(&self, phone: &PhoneNumber, code: &str) -> VerifyOutcome {
        tokio::time::sleep(self.settings.latency).await;

        let mut issued = self.issued.lock().await;
        let Some(current) = issued.as_mut() else {
            warn!(phone = %phone.masked('*'), "Verification attempted with no outstanding code");
            return VerifyOutcome::Rejected(RejectReason::Expired);
        };

        if current.attempts >= self.settings.max_attempts {
            warn!(issue_id = %current.id, "Attempt limit already reached");
            return VerifyOutcome::Rejected(RejectReason::TooManyAttempts);
        }

        let age = Utc::now().signed_duration_since(current.issued_at);
        if age > chrono::Duration::seconds(self.settings.ttl_secs) {
            warn!(
                issue_id = %current.id,
                age_secs = age.num_seconds(),
                "Code expired"
            );
            return VerifyOutcome::Rejected(RejectReason::Expired);
        }

        let matches = code.len() == current.code.len()
            && bool::from(code.as_bytes().ct_eq(current.code.as_bytes()));

        if matches {
            let id = current.id;
            // A code is single-use; drop it so it cannot be replayed.
            *issued = None;
            info!(issue_id = %id, "Code verified");
            return VerifyOutcome::Approved;
        }

        current.attempts += 1;
        let reason = if current.attempts >= self.settings.max_attempts {
            RejectReason::TooManyAttempts
        } else {
            RejectReason::Mismatch
        };
        warn!(
            issue_id = %current.id,
            attempts = current.attempts,
            max_attempts = self.settings.max_attempts,
            reason = %reason,
            "Code rejected"
        );
        VerifyOutcome::Rejected(reason)
    }
}
