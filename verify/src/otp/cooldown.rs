//! Resend cooldown countdown.
//!
//! Requesting a fresh code is gated behind a fixed cooldown so a user cannot
//! hammer the resend action. This module owns only the counting: an integer
//! number of seconds that steps down by one per tick and never goes negative.
//! The recurring 1-second task that drives [`ResendCooldown::tick`] lives with
//! the TUI event plumbing, where it is held as a cancellable handle.

use std::fmt;

/// Default cooldown applied between code requests, in seconds.
pub const DEFAULT_RESEND_COOLDOWN_SECS: u32 = 30;

/// Result of advancing the cooldown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownTick {
    /// Still counting down; carries the new remaining value.
    Counting(u32),
    /// This tick reached zero; the driving task should stop and resend is
    /// now permitted.
    Finished,
    /// The cooldown was already at zero; nothing changed.
    Idle,
}

/// Seconds remaining before a resend is permitted.
///
/// Construction starts the count, matching the screen lifecycle: a code is
/// sent the moment the screen mounts, so the wait begins immediately.
///
/// # Example
///
/// ```
/// use porchlight_verify::otp::{CooldownTick, ResendCooldown};
///
/// let mut cooldown = ResendCooldown::new(2);
/// assert!(!cooldown.is_ready());
/// assert_eq!(cooldown.tick(), CooldownTick::Counting(1));
/// assert_eq!(cooldown.tick(), CooldownTick::Finished);
/// assert!(cooldown.is_ready());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendCooldown {
    remaining: u32,
}

impl ResendCooldown {
    /// Creates a cooldown already counting down from `seconds`.
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    /// Restarts the count from `seconds`.
    ///
    /// The caller restarts its driving task in the same action, so the
    /// one-loop-at-a-time rule is preserved at the task layer.
    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
    }

    /// Advances the count by one second.
    ///
    /// Clamped at zero: once the count has finished, further ticks report
    /// [`CooldownTick::Idle`] without changing anything, so a straggling tick
    /// delivered after the driving task was told to stop is harmless.
    pub fn tick(&mut self) -> CooldownTick {
        match self.remaining {
            0 => CooldownTick::Idle,
            1 => {
                self.remaining = 0;
                CooldownTick::Finished
            }
            n => {
                self.remaining = n - 1;
                CooldownTick::Counting(self.remaining)
            }
        }
    }

    /// Returns `true` once the count has reached zero and resend is allowed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    /// Returns the seconds remaining.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// Formats the remaining time as `MM:SS` for the resend status line.
impl fmt::Display for ResendCooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cooldown_is_counting() {
        let cooldown = ResendCooldown::new(30);
        assert_eq!(cooldown.remaining(), 30);
        assert!(!cooldown.is_ready());
    }

    #[test]
    fn thirty_ticks_reach_exactly_zero() {
        let mut cooldown = ResendCooldown::new(30);

        for expected in (1..=29).rev() {
            assert_eq!(cooldown.tick(), CooldownTick::Counting(expected));
            assert!(!cooldown.is_ready());
        }
        assert_eq!(cooldown.tick(), CooldownTick::Finished);
        assert_eq!(cooldown.remaining(), 0);
        assert!(cooldown.is_ready());
    }

    #[test]
    fn count_never_goes_negative() {
        let mut cooldown = ResendCooldown::new(2);
        cooldown.tick();
        cooldown.tick();

        for _ in 0..5 {
            assert_eq!(cooldown.tick(), CooldownTick::Idle);
            assert_eq!(cooldown.remaining(), 0);
        }
    }

    #[test]
    fn ready_only_at_zero() {
        let mut cooldown = ResendCooldown::new(30);
        while !cooldown.is_ready() {
            assert!(cooldown.remaining() > 0);
            cooldown.tick();
        }
        assert_eq!(cooldown.remaining(), 0);
    }

    #[test]
    fn start_restarts_a_finished_count() {
        let mut cooldown = ResendCooldown::new(1);
        cooldown.tick();
        assert!(cooldown.is_ready());

        cooldown.start(30);
        assert_eq!(cooldown.remaining(), 30);
        assert!(!cooldown.is_ready());
    }

    #[test]
    fn start_midway_restarts_the_count() {
        let mut cooldown = ResendCooldown::new(30);
        cooldown.tick();
        cooldown.tick();

        cooldown.start(30);
        assert_eq!(cooldown.remaining(), 30);
    }

    // ============================================
    // Display
    // ============================================

    #[test]
    fn displays_minutes_and_seconds() {
        assert_eq!(ResendCooldown::new(30).to_string(), "00:30");
        assert_eq!(ResendCooldown::new(9).to_string(), "00:09");
        assert_eq!(ResendCooldown::new(65).to_string(), "01:05");
        assert_eq!(ResendCooldown::new(0).to_string(), "00:00");
    }

    #[test]
    fn display_tracks_ticks() {
        let mut cooldown = ResendCooldown::new(30);
        cooldown.tick();
        assert_eq!(cooldown.to_string(), "00:29");
    }
}
