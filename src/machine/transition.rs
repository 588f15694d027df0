//! Events, signals and outcomes of access transitions.

use crate::core::{CandidateCode, LogicalState, State};
use crate::store::StorageError;

/// Input to the access state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MachineEvent {
    /// A full code was typed
    CandidateComplete(CandidateCode),
    /// Request to start changing the code
    BeginCodeChange,
    /// Request to lock immediately
    LockNow,
}

impl MachineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CandidateComplete(_) => "CandidateComplete",
            Self::BeginCodeChange => "BeginCodeChange",
            Self::LockNow => "LockNow",
        }
    }
}

/// User-facing notification for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Locked,
    Unlocked,
    WrongCode,
    CodeChangeMismatch,
    /// Digits typed so far toward the next code
    AwaitingDigits(usize),
    EnterNewCode,
    ConfirmNewCode,
    /// A transition was dropped because storage did not commit
    StorageFault,
}

/// Result of handling one [`MachineEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The machine moved to a new state
    Committed {
        from: LogicalState,
        to: LogicalState,
        signal: Signal,
    },

    /// The entered code was refused; the user may try again
    Rejected { state: LogicalState, signal: Signal },

    /// No transition is defined for this event in this state
    Ignored { state: LogicalState },
}

impl TransitionOutcome {
    /// State the machine is in after the event.
    pub fn state(&self) -> LogicalState {
        match self {
            Self::Committed { to, .. } => *to,
            Self::Rejected { state, .. } | Self::Ignored { state } => *state,
        }
    }

    pub fn signal(&self) -> Option<Signal> {
        match self {
            Self::Committed { signal, .. } | Self::Rejected { signal, .. } => Some(*signal),
            Self::Ignored { .. } => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Errors that abort a transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Transition from '{}' aborted: {source}", .state.name())]
    Storage {
        /// State the machine remains in
        state: LogicalState,
        source: StorageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChangeStep;

    #[test]
    fn committed_outcome_reports_target_state() {
        let outcome = TransitionOutcome::Committed {
            from: LogicalState::Locked,
            to: LogicalState::Unlocked,
            signal: Signal::Unlocked,
        };
        assert_eq!(outcome.state(), LogicalState::Unlocked);
        assert_eq!(outcome.signal(), Some(Signal::Unlocked));
        assert!(outcome.is_committed());
    }

    #[test]
    fn ignored_outcome_has_no_signal() {
        let state = LogicalState::ChangingCode(ChangeStep::AwaitingNew);
        let outcome = TransitionOutcome::Ignored { state };
        assert_eq!(outcome.state(), state);
        assert_eq!(outcome.signal(), None);
        assert!(!outcome.is_committed());
    }

    #[test]
    fn storage_error_message_names_state() {
        let err = TransitionError::Storage {
            state: LogicalState::Unlocked,
            source: StorageError::WriteFailed("disk full".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("Unlocked"));
        assert!(message.contains("disk full"));
    }
}
