//! Phone number type.
//!
//! Customers type phone numbers in every imaginable format:
//! `+7 (999) 123-45-67`, `89991234567`, `8 999 123 45 67`. The SMS channel
//! and the admin views both need one canonical form, so parsing normalizes
//! to `+<digits>` and converts the legacy `8`-prefixed eleven-digit form to
//! the `+7` country code.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input contains a character that is not a digit or phone punctuation.
    #[error("phone contains an invalid character: {0:?}")]
    InvalidCharacter(char),
    /// The digit count is out of range.
    #[error("phone must have between 10 and 15 digits (got {digits})")]
    WrongLength {
        /// Number of digits found in the input.
        digits: usize,
    },
}

/// A normalized phone number.
///
/// ## Examples
///
/// ```
/// use capsulehaus_core::Phone;
///
/// let phone = Phone::parse("+7 (999) 123-45-67").unwrap();
/// assert_eq!(phone.as_str(), "+79991234567");
///
/// // Legacy domestic prefix is converted to the country code.
/// let phone = Phone::parse("8 999 123 45 67").unwrap();
/// assert_eq!(phone.as_str(), "+79991234567");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a free-form string.
    ///
    /// Digits, a leading `+`, spaces, dashes, and parentheses are accepted;
    /// everything else is rejected. The result is `+` followed by 10-15
    /// digits, with an eleven-digit `8...` input rewritten to `7...`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains an invalid
    /// character, or has a digit count outside 10-15.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut digits = String::new();
        for (i, c) in s.chars().enumerate() {
            match c {
                '0'..='9' => digits.push(c),
                '+' if i == 0 => {}
                ' ' | '-' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        // Domestic 8-prefixed numbers are the +7 country code in disguise.
        if digits.len() == 11 && digits.starts_with('8') {
            digits.replace_range(0..1, "7");
        }

        if !(10..=15).contains(&digits.len()) {
            return Err(PhoneError::WrongLength {
                digits: digits.len(),
            });
        }

        Ok(Self(format!("+{digits}")))
    }

    /// Returns the normalized phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
