//! Strongbox: a keypad-gated lock controller
//!
//! Strongbox keeps a physical enclosure locked behind a four-digit code. The
//! code and the lock flag survive power loss, and the code can be changed by
//! typing the new one twice while the enclosure is open.
//!
//! The crate follows a "pure core, imperative shell" layout: the access rules
//! are plain values and functions, while storage, the lock mechanism and the
//! keypad sit behind traits the [`controller`] drives.
//!
//! # Modules
//!
//! - [`core`]: code types, persisted and logical state, digit collection
//! - [`store`]: durable storage of the code and lock flag
//! - [`machine`]: the access state machine
//! - [`controller`]: the event loop, actuator and input abstractions
//! - [`config`]: TOML configuration
//! - [`console`]: terminal stand-ins for the hardware
//!
//! # Example
//!
//! ```rust
//! use strongbox::controller::{Actuator, KeyMap, SafeController, ScriptedInput};
//! use strongbox::core::{LogicalState, SafeState};
//! use strongbox::machine::{AccessStateMachine, MachineOptions, Signal};
//! use strongbox::store::MemoryStore;
//!
//! struct Bolt(bool);
//!
//! impl Actuator for Bolt {
//!     fn engage(&mut self) { self.0 = true; }
//!     fn disengage(&mut self) { self.0 = false; }
//! }
//!
//! let store = MemoryStore::new(SafeState::new("0000".parse().unwrap(), true));
//! let machine = AccessStateMachine::new(store, MachineOptions::default());
//! let mut safe = SafeController::boot(machine, Bolt(false), Vec::<Signal>::new());
//! assert!(safe.actuator().0);
//!
//! // Unlock, then change the code to 1234, which locks again.
//! let mut keys = ScriptedInput::from_keys(&KeyMap::default(), "0000A12341234");
//! safe.run(&mut keys);
//!
//! assert_eq!(safe.machine().current_state(), LogicalState::Locked);
//! assert_eq!(safe.machine().safe_state().secret_code, "1234".parse().unwrap());
//! assert!(safe.actuator().0);
//! ```

pub mod config;
pub mod console;
pub mod controller;
pub mod core;
pub mod machine;
pub mod store;

// Re-export commonly used types
pub use config::SafeConfig;
pub use controller::{Actuator, InputEvent, InputSource, SafeController, SignalSink};
pub use core::{CandidateCode, CodeEntryCollector, LogicalState, SafeState, SecretCode, State};
pub use machine::{AccessStateMachine, Signal, TransitionOutcome};
pub use store::{PersistentCodeStore, StorageError};
