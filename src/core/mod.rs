//! Core value types.
//!
//! Everything here is pure data and logic with no I/O:
//! - Digit and code types with enforced length and alphabet
//! - The persisted [`SafeState`] and derived [`LogicalState`]
//! - The [`CodeEntryCollector`] that turns digit presses into candidates
//! - A bounded [`TransitionLog`]

mod code;
mod entry;
mod history;
mod state;

pub use code::{CandidateCode, CodeError, Digit, SecretCode, CODE_LENGTH};
pub use entry::CodeEntryCollector;
pub use history::{TransitionLog, TransitionRecord, DEFAULT_HISTORY_CAPACITY};
pub use state::{ChangeStep, LogicalState, SafeState, State};
