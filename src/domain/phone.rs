//! Phone number input and validation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{ValidationError, ValidationResult};

/// Number of digits in a valid phone number.
pub const PHONE_LEN: usize = 10;

/// A phone number that is exactly ten ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Strips every non-digit character and accepts the result only if
    /// exactly ten digits remain.
    ///
    /// # Examples
    ///
    /// ```
    /// use fastor::domain::PhoneNumber;
    ///
    /// let phone = PhoneNumber::parse("98765-43210").unwrap();
    /// assert_eq!(phone.as_str(), "9876543210");
    /// assert!(PhoneNumber::parse("12345").is_err());
    /// ```
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        let cleaned = digits_only(raw);
        if cleaned.len() == PHONE_LEN {
            Ok(Self(cleaned))
        } else {
            Err(ValidationError::InvalidPhone)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last four digits with the rest masked, for log lines.
    pub fn masked(&self) -> String {
        let tail = &self.0[PHONE_LEN - 4..];
        format!("******{}", tail)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Editable phone field. Holds digits only, never more than ten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneField {
    value: String,
}

impl PhoneField {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the field with `raw`, keeping only its digits.
    ///
    /// Returns `false` and leaves the field untouched when the cleaned value
    /// would exceed ten digits.
    pub fn set(&mut self, raw: &str) -> bool {
        let cleaned = digits_only(raw);
        if cleaned.len() > PHONE_LEN {
            return false;
        }
        self.value = cleaned;
        true
    }

    /// Appends one keystroke. Non-digits are dropped.
    pub fn push(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.value.len() >= PHONE_LEN {
            return false;
        }
        self.value.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn is_complete(&self) -> bool {
        self.value.len() == PHONE_LEN
    }

    pub fn to_phone(&self) -> ValidationResult<PhoneNumber> {
        PhoneNumber::parse(&self.value)
    }
}
