//! Completion state machine and submission guard.
//!
//! A completed code can be submitted by two independent triggers: entering the
//! final digit, and an explicit Enter press. Both funnel through
//! [`VerifyFlow::try_dispatch`], which consults a single guard flag before
//! handing out the code. The guard flips synchronously, inside the same
//! keystroke that completed the code, so a fast paste racing a manual verify
//! can never dispatch twice.
//!
//! The guard is the sole record of "an attempt has been dispatched". It is
//! deliberately not derived from the submitting phase, which only changes as
//! part of the same guarded transition, nor from any UI loading indicator.

use super::buffer::CodeEntry;

/// Phase of the verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    /// No attempt in flight; entry is editable.
    #[default]
    Idle,
    /// An attempt has been dispatched and has not resolved yet.
    Submitting,
    /// The collaborator approved the code. Terminal for this screen.
    Verified,
    /// The collaborator rejected the code; a fresh attempt is allowed.
    Failed,
}

/// Result of asking the flow to dispatch a verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The attempt was dispatched; carry this code to the verifier.
    Started(String),
    /// The buffer is not full; surface an inline validation message.
    Incomplete,
    /// The guard is already set; the trigger is silently ignored.
    AlreadyDispatched,
}

/// One verification flow: phase plus the submission guard.
///
/// Owned by the hosting screen next to the [`CodeEntry`]. The flow never
/// touches the buffer or the error message itself; clearing those on failure
/// is the host's responsibility, which keeps this type a pure state machine.
///
/// # Example
///
/// ```
/// use porchlight_verify::otp::{CodeEntry, Dispatch, SubmitPhase, VerifyFlow};
///
/// let mut entry = CodeEntry::new(4);
/// let mut flow = VerifyFlow::new();
///
/// entry.paste("1234");
/// assert_eq!(flow.try_dispatch(&entry), Dispatch::Started("1234".into()));
/// // The racing second trigger hits the guard.
/// assert_eq!(flow.try_dispatch(&entry), Dispatch::AlreadyDispatched);
/// assert_eq!(flow.phase(), SubmitPhase::Submitting);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VerifyFlow {
    phase: SubmitPhase,
    /// True once an attempt has been dispatched for the current code.
    dispatched: bool,
}

impl VerifyFlow {
    /// Creates a flow in the idle phase with the guard unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// Returns `true` while an attempt is unresolved.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    /// Returns `true` once the code has been approved.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.phase == SubmitPhase::Verified
    }

    /// Returns the guard flag.
    #[must_use]
    pub fn dispatched(&self) -> bool {
        self.dispatched
    }

    /// Attempts to dispatch a verification attempt for the entered code.
    ///
    /// Succeeds only when the buffer is full and the guard is unset; the guard
    /// is set before this method returns, so the decision is atomic with
    /// respect to any other trigger processed later in the event order.
    pub fn try_dispatch(&mut self, entry: &CodeEntry) -> Dispatch {
        if !entry.is_full() {
            return Dispatch::Incomplete;
        }
        if self.dispatched {
            return Dispatch::AlreadyDispatched;
        }
        self.dispatched = true;
        self.phase = SubmitPhase::Submitting;
        Dispatch::Started(entry.code().to_string())
    }

    /// Records an approved outcome.
    ///
    /// The guard stays set: a verified screen navigates away and never
    /// dispatches again. Outcomes arriving in any phase other than
    /// `Submitting` are stale and ignored.
    pub fn resolve_approved(&mut self) {
        if self.phase == SubmitPhase::Submitting {
            self.phase = SubmitPhase::Verified;
        }
    }

    /// Records a rejected outcome and reopens the guard for a fresh attempt.
    ///
    /// Stale outcomes (any phase other than `Submitting`) are ignored. The
    /// host clears the buffer and sets the inline error alongside this call.
    pub fn resolve_rejected(&mut self) {
        if self.phase == SubmitPhase::Submitting {
            self.phase = SubmitPhase::Failed;
            self.dispatched = false;
        }
    }

    /// Returns the flow to idle with the guard unset.
    ///
    /// Used when a new code is issued (resend): the previous attempt history
    /// no longer applies to the fresh code.
    pub fn reset(&mut self) {
        self.phase = SubmitPhase::Idle;
        self.dispatched = false;
    }
}
