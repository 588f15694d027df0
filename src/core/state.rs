//! Persisted and logical safe state.
//!
//! [`SafeState`] is the only record that survives a power cycle. The
//! [`LogicalState`] the machine reports is derived from it at boot and then
//! tracked in memory.

use super::code::SecretCode;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A position of a state machine.
///
/// Implementors are plain values: cheap to copy into the transition log,
/// comparable, and serializable for export.
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name used in logs and error messages.
    fn name(&self) -> &str;
}

/// The durable record: the access code and whether the enclosure is locked.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SafeState {
    pub secret_code: SecretCode,
    pub locked: bool,
}

impl SafeState {
    pub fn new(secret_code: SecretCode, locked: bool) -> Self {
        Self {
            secret_code,
            locked,
        }
    }
}

/// Progress through the code-change flow.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ChangeStep {
    /// Waiting for the new code.
    AwaitingNew,
    /// Waiting for the new code to be typed again.
    AwaitingConfirmation,
}

/// Position of the access state machine.
///
/// Never persisted. At boot it is `Locked` or `Unlocked` depending only on
/// [`SafeState::locked`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LogicalState {
    Locked,
    Unlocked,
    ChangingCode(ChangeStep),
}

impl LogicalState {
    /// State to resume in after loading `safe`.
    pub fn from_safe_state(safe: &SafeState) -> Self {
        if safe.locked {
            Self::Locked
        } else {
            Self::Unlocked
        }
    }

    /// Whether the actuator should be engaged in this state.
    ///
    /// Code changes only start from `Unlocked`, so the enclosure stays open
    /// throughout the flow.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }

    pub fn is_changing_code(&self) -> bool {
        matches!(self, Self::ChangingCode(_))
    }

    /// Whether digit input is collected in this state.
    pub fn accepts_digits(&self) -> bool {
        !matches!(self, Self::Unlocked)
    }
}

impl State for LogicalState {
    fn name(&self) -> &str {
        match self {
            Self::Locked => "Locked",
            Self::Unlocked => "Unlocked",
            Self::ChangingCode(ChangeStep::AwaitingNew) => "ChangingCode(AwaitingNew)",
            Self::ChangingCode(ChangeStep::AwaitingConfirmation) => {
                "ChangingCode(AwaitingConfirmation)"
            }
        }
    }
}
