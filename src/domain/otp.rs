//! Six-slot OTP entry.
//!
//! Each slot holds at most one digit. Focus is a plain index the view reads;
//! there are no widget handles.

use super::errors::{ValidationError, ValidationResult};

pub const OTP_LEN: usize = 6;

/// OTP digits plus the index of the focused slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    slots: [Option<char>; OTP_LEN],
    focus: usize,
}

impl OtpInput {
    pub fn slots(&self) -> &[Option<char>; OTP_LEN] {
        &self.slots
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focus_slot(&mut self, index: usize) {
        self.focus = index.min(OTP_LEN - 1);
    }

    pub fn focus_left(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    pub fn focus_right(&mut self) {
        self.focus = (self.focus + 1).min(OTP_LEN - 1);
    }

    /// Writes `c` into the focused slot and advances focus unless it is the
    /// last slot. Anything other than an ASCII digit is ignored.
    pub fn input(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() {
            return false;
        }
        self.slots[self.focus] = Some(c);
        if self.focus < OTP_LEN - 1 {
            self.focus += 1;
        }
        true
    }

    /// Clears a filled slot in place; on an empty slot moves focus back one.
    pub fn backspace(&mut self) {
        if self.slots[self.focus].is_some() {
            self.slots[self.focus] = None;
        } else if self.focus > 0 {
            self.focus -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.slots = [None; OTP_LEN];
        self.focus = 0;
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Concatenates the slots into a submittable code.
    pub fn code(&self) -> ValidationResult<OtpCode> {
        let code: Option<String> = self.slots.iter().copied().collect();
        code.map(OtpCode).ok_or(ValidationError::IncompleteOtp)
    }
}

/// A complete six-digit code, ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
