//! The control loop.
//!
//! [`SafeController`] is the imperative shell around the access machine: it
//! pulls events from an [`InputSource`], feeds digits through a
//! [`CodeEntryCollector`], hands complete codes and commands to the
//! [`AccessStateMachine`], keeps the [`Actuator`] in line with the committed
//! lock flag and reports [`Signal`]s to a [`SignalSink`].

mod actuator;
mod input;

pub use actuator::{Actuator, ActuatorCommand, ServoActuator, ServoDriver};
pub use input::{InputEvent, InputSource, KeyMap, RawInput, ScriptedInput};

use crate::core::{CodeEntryCollector, State};
use crate::machine::{
    AccessStateMachine, MachineEvent, Signal, TransitionError, TransitionOutcome,
};
use crate::store::PersistentCodeStore;

/// Receiver of user-facing signals (display, buzzer, log).
pub trait SignalSink {
    fn signal(&mut self, signal: Signal);
}

impl SignalSink for Vec<Signal> {
    fn signal(&mut self, signal: Signal) {
        self.push(signal);
    }
}

/// Result of processing one input event
#[derive(Clone, Debug, PartialEq)]
pub enum StepResult {
    /// Digit accepted; the code is not complete yet
    Collecting { digits: usize },

    /// Input not accepted in the current state
    Discarded,

    /// Event was handled by the access machine
    Applied(TransitionOutcome),

    /// Transition aborted because storage did not commit
    Aborted(TransitionError),
}

/// Runnable controller wiring the machine to its collaborators.
pub struct SafeController<S, A, K>
where
    S: PersistentCodeStore,
    A: Actuator,
    K: SignalSink,
{
    machine: AccessStateMachine<S>,
    entry: CodeEntryCollector,
    actuator: A,
    sink: K,
}

impl<S, A, K> SafeController<S, A, K>
where
    S: PersistentCodeStore,
    A: Actuator,
    K: SignalSink,
{
    /// Bring the actuator in line with the loaded state and announce it.
    pub fn boot(machine: AccessStateMachine<S>, mut actuator: A, mut sink: K) -> Self {
        let locked = machine.is_locked();
        tracing::info!(locked, "booting controller");
        actuator.apply(ActuatorCommand::for_locked(locked));
        sink.signal(if locked {
            Signal::Locked
        } else {
            Signal::Unlocked
        });

        Self {
            machine,
            entry: CodeEntryCollector::new(),
            actuator,
            sink,
        }
    }

    /// Process a single event to completion.
    pub fn step(&mut self, event: InputEvent) -> StepResult {
        match event {
            InputEvent::Digit(digit) => {
                let state = self.machine.current_state();
                if !state.accepts_digits() {
                    tracing::debug!(state = state.name(), "digit ignored");
                    return StepResult::Discarded;
                }
                match self.entry.push_digit(digit) {
                    Some(candidate) => self.apply(MachineEvent::CandidateComplete(candidate)),
                    None => {
                        let digits = self.entry.len();
                        self.sink.signal(Signal::AwaitingDigits(digits));
                        StepResult::Collecting { digits }
                    }
                }
            }
            InputEvent::BeginCodeChange => self.apply(MachineEvent::BeginCodeChange),
            InputEvent::LockNow => self.apply(MachineEvent::LockNow),
        }
    }

    /// Block on `input` and process events until it closes.
    ///
    /// Returns the number of events processed.
    pub fn run<I: InputSource + ?Sized>(&mut self, input: &mut I) -> usize {
        let mut handled = 0;
        while let Some(event) = input.next_event() {
            self.step(event);
            handled += 1;
        }
        tracing::info!(handled, "input closed, controller stopping");
        handled
    }

    pub fn machine(&self) -> &AccessStateMachine<S> {
        &self.machine
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Digits typed toward the next code.
    pub fn pending_digits(&self) -> usize {
        self.entry.len()
    }

    fn apply(&mut self, event: MachineEvent) -> StepResult {
        let was_locked = self.machine.is_locked();

        match self.machine.handle(event) {
            Ok(outcome) => {
                let locked = self.machine.is_locked();
                if locked != was_locked {
                    self.actuator.apply(ActuatorCommand::for_locked(locked));
                }
                if let Some(signal) = outcome.signal() {
                    self.sink.signal(signal);
                }
                StepResult::Applied(outcome)
            }
            Err(err) => {
                self.sink.signal(Signal::StorageFault);
                StepResult::Aborted(err)
            }
        }
    }
}
