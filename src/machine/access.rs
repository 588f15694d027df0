//! The access state machine.

use super::transition::{MachineEvent, Signal, TransitionError, TransitionOutcome};
use crate::core::{
    CandidateCode, ChangeStep, LogicalState, SafeState, SecretCode, State, TransitionLog,
    TransitionRecord, DEFAULT_HISTORY_CAPACITY,
};
use crate::store::PersistentCodeStore;
use chrono::Utc;

/// Behavior switches for [`AccessStateMachine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MachineOptions {
    /// After each boot, the first lock request starts a code change instead.
    pub require_code_change_before_first_lock: bool,
    /// Records kept in the transition log.
    pub history_capacity: usize,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            require_code_change_before_first_lock: false,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Owner of the [`SafeState`] and the rules for changing it.
///
/// Every change to `locked` or the code is written to the store before it is
/// applied in memory. A failed write leaves the machine exactly as it was.
///
/// Wrong codes are accepted without limit; there is no attempt counter and
/// no lockout.
///
/// # Example
///
/// ```rust
/// use strongbox::core::{LogicalState, SafeState};
/// use strongbox::machine::{AccessStateMachine, MachineOptions};
/// use strongbox::store::{MemoryStore, PersistentCodeStore};
///
/// let store = MemoryStore::new(SafeState::new("0000".parse().unwrap(), true));
/// let mut machine = AccessStateMachine::new(store, MachineOptions::default());
///
/// let outcome = machine.unlock(&"0000".parse().unwrap()).unwrap();
/// assert_eq!(outcome.state(), LogicalState::Unlocked);
/// assert!(!machine.store().load().locked);
/// ```
pub struct AccessStateMachine<S: PersistentCodeStore> {
    store: S,
    safe: SafeState,
    state: LogicalState,
    pending_code: Option<SecretCode>,
    code_change_required: bool,
    history: TransitionLog,
}

impl<S: PersistentCodeStore> AccessStateMachine<S> {
    /// Load the persisted state and start in `Locked` or `Unlocked`.
    pub fn new(store: S, options: MachineOptions) -> Self {
        let safe = store.load();
        let state = LogicalState::from_safe_state(&safe);
        tracing::info!(state = state.name(), "access state loaded");

        Self {
            store,
            safe,
            state,
            pending_code: None,
            code_change_required: options.require_code_change_before_first_lock,
            history: TransitionLog::with_capacity(options.history_capacity),
        }
    }

    pub fn current_state(&self) -> LogicalState {
        self.state
    }

    /// The last committed `locked` flag.
    pub fn is_locked(&self) -> bool {
        self.safe.locked
    }

    /// The last committed durable state.
    pub fn safe_state(&self) -> &SafeState {
        &self.safe
    }

    /// Whether a new code has been entered and awaits confirmation.
    pub fn has_pending_code(&self) -> bool {
        self.pending_code.is_some()
    }

    pub fn history(&self) -> &TransitionLog {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply one event.
    pub fn handle(&mut self, event: MachineEvent) -> Result<TransitionOutcome, TransitionError> {
        use LogicalState::{ChangingCode, Locked, Unlocked};

        match (self.state, event) {
            (Locked, MachineEvent::CandidateComplete(candidate)) => {
                if candidate.matches(&self.safe.secret_code) {
                    let next = SafeState::new(self.safe.secret_code, false);
                    self.commit(Unlocked, Some(next), Signal::Unlocked)
                } else {
                    tracing::warn!("wrong code entered");
                    Ok(TransitionOutcome::Rejected {
                        state: Locked,
                        signal: Signal::WrongCode,
                    })
                }
            }

            (Unlocked, MachineEvent::BeginCodeChange) => {
                self.commit(ChangingCode(ChangeStep::AwaitingNew), None, Signal::EnterNewCode)
            }

            (Unlocked, MachineEvent::LockNow) if self.code_change_required => {
                tracing::info!("code change required before first lock");
                self.commit(ChangingCode(ChangeStep::AwaitingNew), None, Signal::EnterNewCode)
            }

            (Unlocked, MachineEvent::LockNow) => {
                let next = SafeState::new(self.safe.secret_code, true);
                self.commit(Locked, Some(next), Signal::Locked)
            }

            (ChangingCode(ChangeStep::AwaitingNew), MachineEvent::CandidateComplete(candidate)) => {
                self.pending_code = Some(candidate.into());
                self.commit(
                    ChangingCode(ChangeStep::AwaitingConfirmation),
                    None,
                    Signal::ConfirmNewCode,
                )
            }

            (
                ChangingCode(ChangeStep::AwaitingConfirmation),
                MachineEvent::CandidateComplete(candidate),
            ) => match self.pending_code {
                Some(pending) if candidate.matches(&pending) => {
                    let next = SafeState::new(pending, true);
                    let outcome = self.commit(Locked, Some(next), Signal::Locked)?;
                    self.pending_code = None;
                    self.code_change_required = false;
                    tracing::info!("access code changed");
                    Ok(outcome)
                }
                _ => {
                    tracing::warn!("code confirmation mismatch, change discarded");
                    self.pending_code = None;
                    self.move_to(Unlocked, false);
                    Ok(TransitionOutcome::Rejected {
                        state: Unlocked,
                        signal: Signal::CodeChangeMismatch,
                    })
                }
            },

            (state, event) => {
                tracing::debug!(state = state.name(), event = event.name(), "event ignored");
                Ok(TransitionOutcome::Ignored { state })
            }
        }
    }

    /// Submit a complete code typed on the keypad.
    pub fn submit_candidate(
        &mut self,
        candidate: CandidateCode,
    ) -> Result<TransitionOutcome, TransitionError> {
        self.handle(MachineEvent::CandidateComplete(candidate))
    }

    /// Try to unlock with `candidate`. Only meaningful while `Locked`.
    pub fn unlock(
        &mut self,
        candidate: &CandidateCode,
    ) -> Result<TransitionOutcome, TransitionError> {
        self.submit_candidate(*candidate)
    }

    pub fn lock(&mut self) -> Result<TransitionOutcome, TransitionError> {
        self.handle(MachineEvent::LockNow)
    }

    pub fn begin_code_change(&mut self) -> Result<TransitionOutcome, TransitionError> {
        self.handle(MachineEvent::BeginCodeChange)
    }

    /// Persist `next` (if any) and then move to `to`.
    fn commit(
        &mut self,
        to: LogicalState,
        next: Option<SafeState>,
        signal: Signal,
    ) -> Result<TransitionOutcome, TransitionError> {
        let from = self.state;

        if let Some(next) = next {
            if let Err(source) = self.store.save(&next) {
                tracing::error!(
                    %source,
                    from = from.name(),
                    to = to.name(),
                    "persist failed, transition aborted"
                );
                return Err(TransitionError::Storage {
                    state: from,
                    source,
                });
            }
            self.safe = next;
        }

        self.move_to(to, next.is_some());
        tracing::info!(from = from.name(), to = to.name(), "transition committed");
        Ok(TransitionOutcome::Committed { from, to, signal })
    }

    fn move_to(&mut self, to: LogicalState, persisted: bool) {
        self.history = self.history.record(TransitionRecord {
            from: self.state,
            to,
            timestamp: Utc::now(),
            persisted,
        });
        self.state = to;
    }
}
