//! Passcode entry buffer with derived per-slot focus.
//!
//! The verification screen renders a row of single-digit slots, but the code
//! itself is owned here as one prefix-dense string. Each slot is a
//! presentational projection into that string, and the focused slot is a pure
//! function of how many digits have been entered: the first empty slot while
//! the buffer is filling, the last slot once it is full. Keeping a single
//! source of truth is what makes paste handling and backspace behave sanely
//! across a row of per-digit fields.
//!
//! # Design
//!
//! - **Prefix-dense**: digits occupy slots `0..filled()` with no gaps, so
//!   [`CodeEntry::code`] is always a plain string of length `0..=length`.
//! - **Derived focus**: [`CodeEntry::cursor`] returns the first empty slot, or
//!   `None` when the code is complete. There is no separately stored focus
//!   index that could drift out of sync with the buffer.
//! - **Paste-aware**: [`CodeEntry::paste`] accepts arbitrary text, keeps the
//!   digits in order, and fills slots from the cursor onward, so a code copied
//!   out of an SMS lands across the row in one action.
//!
//! # Example
//!
//! ```
//! use porchlight_verify::otp::{CodeEntry, EntryOutcome};
//!
//! let mut entry = CodeEntry::new(4);
//! assert_eq!(entry.cursor(), Some(0));
//!
//! entry.push('1');
//! entry.push('2');
//! assert_eq!(entry.code(), "12");
//! assert_eq!(entry.cursor(), Some(2));
//!
//! assert_eq!(entry.paste("3 4"), EntryOutcome::Filled);
//! assert_eq!(entry.code(), "1234");
//! assert_eq!(entry.cursor(), None);
//! ```

/// Default number of digit slots on the verification screen.
pub const DEFAULT_CODE_LENGTH: usize = 4;

/// Result of feeding input into a [`CodeEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// No digit was accepted (non-digit input, or the buffer is already full).
    Ignored,
    /// At least one digit was accepted and empty slots remain.
    Accepted,
    /// This input filled the final slot; the code is now complete and the
    /// completion protocol should run.
    Filled,
}

/// Fixed-length passcode buffer backing the per-digit input row.
///
/// Owns the logical code as a single string and derives slot contents and
/// focus from it. Mutated exclusively by the keystroke handlers of the hosting
/// screen; never shared across screen instances.
///
/// # Example
///
/// ```
/// use porchlight_verify::otp::CodeEntry;
///
/// let mut entry = CodeEntry::new(4);
/// entry.push('7');
/// assert_eq!(entry.slot(0), Some('7'));
/// assert_eq!(entry.slot(1), None);
/// assert_eq!(entry.active_slot(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    /// Entered digits, in order. Length never exceeds `length`.
    digits: String,
    /// Number of slots.
    length: usize,
}

impl Default for CodeEntry {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeEntry {
    /// Creates an empty buffer with `length` digit slots.
    ///
    /// A length of zero is nonsensical for a passcode and is clamped to one;
    /// configuration validation rejects it before it reaches this point.
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            digits: String::with_capacity(length),
            length: length.max(1),
        }
    }

    /// Returns the number of digit slots.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the logical code entered so far.
    ///
    /// Always prefix-dense: filled slots left to right with no gap characters,
    /// so the result is a plain digit string of length `0..=length()`.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.digits
    }

    /// Returns the number of filled slots.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.digits.len()
    }

    /// Returns `true` if no digits have been entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Returns `true` if every slot holds a digit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.digits.len() == self.length
    }

    /// Returns the index of the slot that should receive the next keystroke.
    ///
    /// This is the first empty slot, or `None` once the code is complete.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        if self.is_full() {
            None
        } else {
            Some(self.digits.len())
        }
    }

    /// Returns the slot the UI should highlight.
    ///
    /// Identical to [`cursor`](Self::cursor) while the buffer is filling; once
    /// the code is complete the highlight stays on the last slot.
    #[must_use]
    pub fn active_slot(&self) -> usize {
        self.cursor().unwrap_or(self.length - 1)
    }

    /// Returns the digit in `index`, or `None` if the slot is empty or out of
    /// range.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<char> {
        if index >= self.length {
            return None;
        }
        self.digits.chars().nth(index)
    }

    /// Enters a single keystroke at the focused slot.
    ///
    /// Non-digit characters are rejected without any state change, as is any
    /// input once the buffer is full.
    ///
    /// # Example
    ///
    /// ```
    /// use porchlight_verify::otp::{CodeEntry, EntryOutcome};
    ///
    /// let mut entry = CodeEntry::new(4);
    /// assert_eq!(entry.push('5'), EntryOutcome::Accepted);
    /// assert_eq!(entry.push('x'), EntryOutcome::Ignored);
    /// assert_eq!(entry.code(), "5");
    /// ```
    pub fn push(&mut self, c: char) -> EntryOutcome {
        if !c.is_ascii_digit() || self.is_full() {
            return EntryOutcome::Ignored;
        }
        self.digits.push(c);
        if self.is_full() {
            EntryOutcome::Filled
        } else {
            EntryOutcome::Accepted
        }
    }

    /// Enters pasted text starting at the focused slot.
    ///
    /// Digits are kept in order and spread into the remaining slots; any other
    /// characters (separators, whitespace) are dropped. Digits beyond the last
    /// slot are discarded. Focus lands on the first slot still empty after the
    /// shift, or stays on the last slot if the code is now full.
    pub fn paste(&mut self, text: &str) -> EntryOutcome {
        let mut accepted = false;
        for c in text.chars().filter(char::is_ascii_digit) {
            if self.is_full() {
                break;
            }
            self.digits.push(c);
            accepted = true;
        }
        if !accepted {
            EntryOutcome::Ignored
        } else if self.is_full() {
            EntryOutcome::Filled
        } else {
            EntryOutcome::Accepted
        }
    }

    /// Handles a backspace at the focused slot.
    ///
    /// While the buffer is filling, the focused slot is empty by construction,
    /// so backspace removes the most recently entered digit and the derived
    /// focus steps back with it. Entering "1","2" and pressing backspace twice
    /// therefore leaves the buffer empty with focus on slot 0. When the buffer
    /// is full, backspace clears the final slot. On an empty buffer this is a
    /// no-op.
    ///
    /// Returns `true` if a digit was removed.
    pub fn backspace(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    /// Clears every slot and returns focus to slot 0.
    ///
    /// Used on verification failure and on resend, both of which restart entry
    /// from a blank row.
    pub fn clear(&mut self) {
        self.digits.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // Construction
    // ============================================

    #[test]
    fn new_entry_is_empty_with_cursor_at_zero() {
        let entry = CodeEntry::new(4);
        assert!(entry.is_empty());
        assert!(!entry.is_full());
        assert_eq!(entry.filled(), 0);
        assert_eq!(entry.code(), "");
        assert_eq!(entry.cursor(), Some(0));
        assert_eq!(entry.active_slot(), 0);
    }

    #[test]
    fn default_uses_four_slots() {
        let entry = CodeEntry::default();
        assert_eq!(entry.length(), DEFAULT_CODE_LENGTH);
        assert_eq!(entry.length(), 4);
    }

    #[test]
    fn zero_length_is_clamped_to_one() {
        let mut entry = CodeEntry::new(0);
        assert_eq!(entry.length(), 1);
        assert_eq!(entry.push('9'), EntryOutcome::Filled);
    }

    #[test]
    fn supports_non_default_lengths() {
        let mut entry = CodeEntry::new(6);
        for c in ['1', '2', '3', '4', '5'] {
            assert_eq!(entry.push(c), EntryOutcome::Accepted);
        }
        assert_eq!(entry.push('6'), EntryOutcome::Filled);
        assert_eq!(entry.code(), "123456");
    }

    // ============================================
    // Single keystrokes
    // ============================================

    #[test]
    fn digits_fill_slots_left_to_right() {
        let mut entry = CodeEntry::new(4);
        entry.push('1');
        entry.push('2');
        entry.push('3');

        assert_eq!(entry.code(), "123");
        assert_eq!(entry.slot(0), Some('1'));
        assert_eq!(entry.slot(1), Some('2'));
        assert_eq!(entry.slot(2), Some('3'));
        assert_eq!(entry.slot(3), None);
        assert_eq!(entry.cursor(), Some(3));
    }

    #[test]
    fn code_equals_keystroke_concatenation_and_fills_once() {
        // Entering exactly N digits yields their concatenation, with the
        // final keystroke (and only that one) reporting completion.
        let mut entry = CodeEntry::new(4);
        let outcomes: Vec<EntryOutcome> =
            ['1', '2', '3', '4'].iter().map(|&c| entry.push(c)).collect();

        assert_eq!(entry.code(), "1234");
        assert_eq!(
            outcomes,
            vec![
                EntryOutcome::Accepted,
                EntryOutcome::Accepted,
                EntryOutcome::Accepted,
                EntryOutcome::Filled,
            ]
        );
    }

    #[test]
    fn non_digit_characters_are_ignored() {
        let mut entry = CodeEntry::new(4);
        assert_eq!(entry.push('a'), EntryOutcome::Ignored);
        assert_eq!(entry.push(' '), EntryOutcome::Ignored);
        assert_eq!(entry.push('-'), EntryOutcome::Ignored);
        assert_eq!(entry.push('٤'), EntryOutcome::Ignored); // non-ASCII digit
        assert!(entry.is_empty());
        assert_eq!(entry.cursor(), Some(0));
    }

    #[test]
    fn input_after_full_is_ignored() {
        let mut entry = CodeEntry::new(4);
        entry.paste("1234");
        assert_eq!(entry.push('5'), EntryOutcome::Ignored);
        assert_eq!(entry.code(), "1234");
    }

    #[test]
    fn cursor_is_none_when_full_but_active_slot_is_last() {
        let mut entry = CodeEntry::new(4);
        entry.paste("1234");
        assert_eq!(entry.cursor(), None);
        assert_eq!(entry.active_slot(), 3);
    }

    // ============================================
    // Paste handling
    // ============================================

    #[test]
    fn paste_spreads_digits_across_slots() {
        let mut entry = CodeEntry::new(4);
        assert_eq!(entry.paste("1234"), EntryOutcome::Filled);
        assert_eq!(entry.code(), "1234");
        assert_eq!(entry.cursor(), None);
    }

    #[test]
    fn paste_starts_at_focused_slot() {
        let mut entry = CodeEntry::new(4);
        entry.push('9');
        assert_eq!(entry.paste("876"), EntryOutcome::Filled);
        assert_eq!(entry.code(), "9876");
    }

    #[test]
    fn paste_drops_separators_and_whitespace() {
        let mut entry = CodeEntry::new(4);
        assert_eq!(entry.paste("12 3-4"), EntryOutcome::Filled);
        assert_eq!(entry.code(), "1234");
    }

    #[test]
    fn paste_truncates_overflow() {
        let mut entry = CodeEntry::new(4);
        assert_eq!(entry.paste("123456"), EntryOutcome::Filled);
        assert_eq!(entry.code(), "1234");
    }

    #[test]
    fn paste_without_digits_is_ignored() {
        let mut entry = CodeEntry::new(4);
        assert_eq!(entry.paste("no code here"), EntryOutcome::Ignored);
        assert!(entry.is_empty());
    }

    #[test]
    fn partial_paste_leaves_cursor_on_first_empty_slot() {
        let mut entry = CodeEntry::new(6);
        assert_eq!(entry.paste("12 34"), EntryOutcome::Accepted);
        assert_eq!(entry.cursor(), Some(4));
    }

    #[test]
    fn paste_into_full_buffer_is_ignored() {
        let mut entry = CodeEntry::new(4);
        entry.paste("1234");
        assert_eq!(entry.paste("9999"), EntryOutcome::Ignored);
        assert_eq!(entry.code(), "1234");
    }

    // ============================================
    // Backspace
    // ============================================

    #[test]
    fn backspace_moves_focus_back_one_slot() {
        let mut entry = CodeEntry::new(4);
        entry.push('1');
        entry.push('2');
        assert_eq!(entry.cursor(), Some(2));

        assert!(entry.backspace());
        assert_eq!(entry.cursor(), Some(1));
    }

    #[test]
    fn two_backspaces_after_two_digits_empty_the_buffer() {
        let mut entry = CodeEntry::new(4);
        entry.push('1');
        entry.push('2');

        entry.backspace();
        entry.backspace();

        assert!(entry.is_empty());
        assert_eq!(entry.cursor(), Some(0));
    }

    #[test]
    fn backspace_on_empty_buffer_keeps_focus_at_slot_zero() {
        let mut entry = CodeEntry::new(4);
        assert!(!entry.backspace());
        assert_eq!(entry.cursor(), Some(0));
    }

    #[test]
    fn backspace_on_full_buffer_clears_final_slot() {
        let mut entry = CodeEntry::new(4);
        entry.paste("1234");
        assert!(entry.backspace());
        assert_eq!(entry.code(), "123");
        assert_eq!(entry.cursor(), Some(3));
    }

    // ============================================
    // Clearing
    // ============================================

    #[test]
    fn clear_empties_buffer_and_resets_focus() {
        let mut entry = CodeEntry::new(4);
        entry.paste("1234");
        entry.clear();

        assert!(entry.is_empty());
        assert_eq!(entry.code(), "");
        assert_eq!(entry.cursor(), Some(0));
    }

    #[test]
    fn entry_after_clear_starts_at_slot_zero() {
        let mut entry = CodeEntry::new(4);
        entry.paste("1234");
        entry.clear();
        entry.push('7');
        assert_eq!(entry.slot(0), Some('7'));
    }
}
