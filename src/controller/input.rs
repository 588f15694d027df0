//! Input events and the mapping from raw keys to them.

use crate::core::Digit;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Event consumed by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Digit(Digit),
    BeginCodeChange,
    LockNow,
}

/// Blocking source of input events.
pub trait InputSource {
    /// Wait for the next event. `None` means the source is closed.
    fn next_event(&mut self) -> Option<InputEvent>;
}

/// Input as produced by a device driver, before interpretation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawInput {
    /// A keypad key
    Key(char),
    /// A decoded infrared remote command
    Remote(u16),
}

/// Bindings from keys and remote commands to events.
///
/// Digit keys always map to [`InputEvent::Digit`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMap {
    pub lock_keys: Vec<char>,
    pub change_code_keys: Vec<char>,
    pub remote_lock_commands: Vec<u16>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            lock_keys: vec!['#'],
            change_code_keys: vec!['A'],
            remote_lock_commands: vec![162],
        }
    }
}

impl KeyMap {
    /// Interpret a raw input. Unbound inputs yield `None`.
    pub fn translate(&self, raw: RawInput) -> Option<InputEvent> {
        match raw {
            RawInput::Key(key) => {
                if let Some(digit) = Digit::from_char(key) {
                    Some(InputEvent::Digit(digit))
                } else if self.lock_keys.contains(&key) {
                    Some(InputEvent::LockNow)
                } else if self.change_code_keys.contains(&key) {
                    Some(InputEvent::BeginCodeChange)
                } else {
                    None
                }
            }
            RawInput::Remote(command) => self
                .remote_lock_commands
                .contains(&command)
                .then_some(InputEvent::LockNow),
        }
    }
}

/// Input source replaying a fixed sequence of events.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Events for a string of keypad keys, interpreted through `keymap`.
    pub fn from_keys(keymap: &KeyMap, keys: &str) -> Self {
        Self::new(keys.chars().filter_map(|k| keymap.translate(RawInput::Key(k))))
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}
