//! Phone number parsing, formatting, and masked display.
//!
//! The verification screen shows which number the code went to, so the CLI
//! accepts numbers the way people actually type them: digits mixed with
//! spaces, dashes, dots, and parentheses, with an optional leading `+`.
//! Validation is character-level rather than pattern-based, and normalization
//! keeps only the digits.
//!
//! A bare 10-digit number is assumed to be NANP (the marketplace's home
//! market) and gains the `1` country code; anything else must carry enough
//! digits to stand on its own.

use std::fmt;

use thiserror::Error;

/// Minimum digits for a dialable number (national NANP length).
pub const MIN_PHONE_DIGITS: usize = 10;

/// Maximum digits permitted (E.164 ceiling).
pub const MAX_PHONE_DIGITS: usize = 15;

/// Errors from parsing user-supplied phone numbers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// Input was empty or whitespace.
    #[error("phone number cannot be empty")]
    Empty,

    /// Input contained a character that is not a digit or common separator.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),

    /// A `+` appeared anywhere other than the front.
    #[error("'+' is only allowed at the start of a phone number")]
    MisplacedPlus,

    /// Too few digits to be dialable.
    #[error("phone number has {digits} digits, need at least 10")]
    TooShort {
        /// Number of digits found.
        digits: usize,
    },

    /// More digits than any international number carries.
    #[error("phone number has {digits} digits, maximum is 15")]
    TooLong {
        /// Number of digits found.
        digits: usize,
    },
}

/// A validated, normalized phone number.
///
/// Stores the full digit string including country code; formatting decisions
/// are made at display time. Equality is over the normalized digits, so
/// `"+1 (555) 201-7733"` and `"555.201.7733"` parse to the same value.
///
/// # Example
///
/// ```
/// use porchlight_verify::phone::PhoneNumber;
///
/// let phone = PhoneNumber::parse("(555) 201-7733").unwrap();
/// assert_eq!(phone.e164(), "+15552017733");
/// assert_eq!(phone.national(), "(555) 201-7733");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    /// All digits including country code, no `+`.
    digits: String,
}

impl PhoneNumber {
    /// Parses a user-supplied phone number.
    ///
    /// Accepts digits plus the separators ` `, `-`, `.`, `(`, `)` and an
    /// optional leading `+`. A bare 10-digit number is treated as NANP and
    /// prefixed with country code `1`.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneError`] describing the first problem found: empty
    /// input, an invalid or misplaced character, or a digit count outside
    /// 10..=15.
    pub fn parse(input: &str) -> Result<Self, PhoneError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut digits = String::new();
        for (i, c) in trimmed.chars().enumerate() {
            match c {
                '0'..='9' => digits.push(c),
                '+' if i == 0 => {}
                '+' => return Err(PhoneError::MisplacedPlus),
                ' ' | '-' | '.' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        let has_country_code = trimmed.starts_with('+');
        if digits.len() < MIN_PHONE_DIGITS {
            return Err(PhoneError::TooShort {
                digits: digits.len(),
            });
        }
        if digits.len() > MAX_PHONE_DIGITS {
            return Err(PhoneError::TooLong {
                digits: digits.len(),
            });
        }

        if !has_country_code && digits.len() == MIN_PHONE_DIGITS {
            digits.insert(0, '1');
        }

        Ok(Self { digits })
    }

    /// Returns the normalized digits including country code.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Returns the E.164 form, `+` followed by all digits.
    #[must_use]
    pub fn e164(&self) -> String {
        format!("+{}", self.digits)
    }

    /// Returns a reader-friendly national form.
    ///
    /// NANP numbers render as `(XXX) XXX-XXXX`; other numbers fall back to
    /// the E.164 form, since national conventions vary too much to guess.
    #[must_use]
    pub fn national(&self) -> String {
        match self.nanp_national() {
            Some(national) => {
                format!(
                    "({}) {}-{}",
                    &national[0..3],
                    &national[3..6],
                    &national[6..10]
                )
            }
            None => self.e164(),
        }
    }

    /// Returns the national form with its digits replaced by `mask`, keeping
    /// enough visible to recognize the number: the last two digits always,
    /// and for E.164-rendered numbers the country code too.
    ///
    /// Punctuation is preserved so the shape of the number stays readable:
    /// `(555) 201-7733` masks to `(•••) •••-••33`, `+31612345678` to
    /// `+31•••••••78`.
    #[must_use]
    pub fn masked(&self, mask: char) -> String {
        let formatted = self.national();
        // The NANP national form carries no country code to keep visible.
        let visible_head = if self.nanp_national().is_some() {
            0
        } else {
            self.country_code_len()
        };
        let total_digits = formatted.chars().filter(char::is_ascii_digit).count();
        let mut seen = 0;
        formatted
            .chars()
            .map(|c| {
                if c.is_ascii_digit() {
                    seen += 1;
                    if seen > visible_head && seen <= total_digits.saturating_sub(2) {
                        return mask;
                    }
                }
                c
            })
            .collect()
    }

    /// Returns the 10 national digits for NANP numbers, `None` otherwise.
    fn nanp_national(&self) -> Option<&str> {
        if self.digits.len() == 11 && self.digits.starts_with('1') {
            Some(&self.digits[1..])
        } else {
            None
        }
    }

    /// Length of the ITU country calling code at the front of the digits.
    ///
    /// Calling codes run one to three digits. The one- and two-digit
    /// assignments form a small closed set; everything else is three.
    fn country_code_len(&self) -> usize {
        let digits = self.digits.as_bytes();
        match digits.first() {
            Some(b'1' | b'7') => 1,
            Some(&first) if digits.len() >= 2 => {
                let code = (first - b'0') * 10 + (digits[1] - b'0');
                match code {
                    20 | 27 | 30..=34 | 36 | 39 | 40 | 41 | 43..=49 | 51..=58 | 60..=66 | 81
                    | 82 | 84 | 86 | 90..=95 | 98 => 2,
                    _ => 3,
                }
            }
            _ => digits.len(),
        }
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.national())
    }
}
