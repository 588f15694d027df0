//! Digit and access-code value types.
//!
//! Codes are fixed at [`CODE_LENGTH`] decimal digits. Both [`SecretCode`] and
//! [`CandidateCode`] can only be constructed from valid digit sequences, so a
//! malformed code is unrepresentable once parsing succeeds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of digits in every access code.
pub const CODE_LENGTH: usize = 4;

/// Errors produced when parsing a code from text or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("code must be exactly {expected} digits, got {found}")]
    WrongLength { expected: usize, found: usize },

    #[error("code contains a non-digit character at position {position}")]
    NonDigit { position: usize },
}

/// A single decimal digit, 0 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digit(u8);

impl Digit {
    /// Digit from its numeric value. Returns `None` above 9.
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    /// Digit from a keypad character. Anything outside `'0'..='9'` is `None`.
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    fn ascii(self) -> u8 {
        b'0' + self.0
    }
}

fn parse_ascii(bytes: &[u8]) -> Result<[u8; CODE_LENGTH], CodeError> {
    if bytes.len() != CODE_LENGTH {
        return Err(CodeError::WrongLength {
            expected: CODE_LENGTH,
            found: bytes.len(),
        });
    }
    let mut out = [0u8; CODE_LENGTH];
    for (position, (slot, byte)) in out.iter_mut().zip(bytes).enumerate() {
        if !byte.is_ascii_digit() {
            return Err(CodeError::NonDigit { position });
        }
        *slot = *byte;
    }
    Ok(out)
}

fn parse_str(s: &str) -> Result<[u8; CODE_LENGTH], CodeError> {
    let found = s.chars().count();
    if found != CODE_LENGTH {
        return Err(CodeError::WrongLength {
            expected: CODE_LENGTH,
            found,
        });
    }
    parse_ascii(s.as_bytes())
}

/// The stored access code.
///
/// Stored as ASCII digits, which is also the persisted byte layout. `Debug`
/// output is redacted so the code never ends up in logs.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretCode([u8; CODE_LENGTH]);

impl SecretCode {
    /// Build a code from its persisted ASCII bytes.
    pub fn from_ascii(bytes: [u8; CODE_LENGTH]) -> Result<Self, CodeError> {
        parse_ascii(&bytes).map(Self)
    }

    /// Persisted ASCII representation.
    pub(crate) fn to_ascii(self) -> [u8; CODE_LENGTH] {
        self.0
    }
}

impl FromStr for SecretCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s).map(Self)
    }
}

impl TryFrom<String> for SecretCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SecretCode> for String {
    fn from(code: SecretCode) -> Self {
        code.0.iter().map(|b| char::from(*b)).collect()
    }
}

impl fmt::Debug for SecretCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretCode(****)")
    }
}

/// A complete code typed by the user, not yet evaluated.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CandidateCode([u8; CODE_LENGTH]);

impl CandidateCode {
    pub fn from_digits(digits: [Digit; CODE_LENGTH]) -> Self {
        Self(digits.map(Digit::ascii))
    }

    /// Whether this candidate equals the stored code.
    pub fn matches(&self, code: &SecretCode) -> bool {
        self.0 == code.0
    }
}

impl FromStr for CandidateCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s).map(Self)
    }
}

impl From<CandidateCode> for SecretCode {
    fn from(candidate: CandidateCode) -> Self {
        SecretCode(candidate.0)
    }
}

impl fmt::Debug for CandidateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CandidateCode(****)")
    }
}
