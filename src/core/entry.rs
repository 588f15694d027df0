//! Digit accumulation for code entry.

use super::code::{CandidateCode, Digit, CODE_LENGTH};

/// Collects digits into a [`CandidateCode`].
///
/// Emits a candidate as soon as [`CODE_LENGTH`] digits have been pushed and
/// starts over empty. There is no cancel; an unfinished entry simply waits.
///
/// # Example
///
/// ```rust
/// use strongbox::core::CodeEntryCollector;
///
/// let mut entry = CodeEntryCollector::new();
/// assert!(entry.push('1').is_none());
/// assert!(entry.push('#').is_none()); // ignored
/// assert!(entry.push('2').is_none());
/// assert!(entry.push('3').is_none());
/// assert!(entry.push('4').is_some());
/// assert!(entry.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct CodeEntryCollector {
    digits: Vec<Digit>,
}

impl CodeEntryCollector {
    pub fn new() -> Self {
        Self {
            digits: Vec::with_capacity(CODE_LENGTH),
        }
    }

    /// Push a keypad character. Non-digits are ignored.
    pub fn push(&mut self, key: char) -> Option<CandidateCode> {
        Digit::from_char(key).and_then(|d| self.push_digit(d))
    }

    pub fn push_digit(&mut self, digit: Digit) -> Option<CandidateCode> {
        self.digits.push(digit);
        if self.digits.len() < CODE_LENGTH {
            return None;
        }

        let mut complete = [digit; CODE_LENGTH];
        complete.copy_from_slice(&self.digits);
        self.digits.clear();
        Some(CandidateCode::from_digits(complete))
    }

    /// Digits accumulated toward the next candidate.
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}
