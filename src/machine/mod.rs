//! Access control transitions.
//!
//! The [`AccessStateMachine`] decides every change of [`LogicalState`]
//! and writes the [`SafeState`] through a
//! [`PersistentCodeStore`](crate::store::PersistentCodeStore) before
//! acknowledging it.
//!
//! ```text
//!            correct code                BeginCodeChange
//!  Locked ─────────────────▶ Unlocked ─────────────────▶ ChangingCode(AwaitingNew)
//!    ▲  ◀──────────────────────┘ ▲                                │ new code
//!    │         LockNow           │ mismatch                       ▼
//!    └───────────────────────────┴──────────── ChangingCode(AwaitingConfirmation)
//!                  confirmed
//! ```
//!
//! [`LogicalState`]: crate::core::LogicalState
//! [`SafeState`]: crate::core::SafeState

mod access;
mod transition;

pub use access::{AccessStateMachine, MachineOptions};
pub use transition::{MachineEvent, Signal, TransitionError, TransitionOutcome};
