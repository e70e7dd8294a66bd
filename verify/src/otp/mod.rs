//! Passcode entry state: buffer, completion flow, and resend cooldown.
//!
//! Everything in this module is synchronous, single-owner state mutated by
//! the hosting screen's event handlers. The async pieces that drive it (the
//! 1-second cooldown task, the verification call) live with the TUI plumbing
//! and feed back into these types through the event loop.
//!
//! # Modules
//!
//! - [`buffer`]: the prefix-dense digit buffer with derived per-slot focus
//! - [`flow`]: the Idle → Submitting → Verified/Failed machine and its
//!   submission guard
//! - [`cooldown`]: the seconds-remaining count gating resend

pub mod buffer;
pub mod cooldown;
pub mod flow;

pub use buffer::{CodeEntry, EntryOutcome, DEFAULT_CODE_LENGTH};
pub use cooldown::{CooldownTick, ResendCooldown, DEFAULT_RESEND_COOLDOWN_SECS};
pub use flow::{Dispatch, SubmitPhase, VerifyFlow};
