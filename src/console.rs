//! Terminal stand-ins for the keypad, remote, display and servo.
//!
//! Each input line is a sequence of keypad keys (`0000`, `A`, `#`), or a
//! remote command written as `ir:<code>` (`ir:162`).

use crate::controller::{InputEvent, InputSource, KeyMap, RawInput, ServoDriver, SignalSink};
use crate::core::CODE_LENGTH;
use crate::machine::Signal;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

const REMOTE_PREFIX: &str = "ir:";

/// Split one console line into raw inputs.
pub fn parse_line(line: &str) -> Vec<RawInput> {
    let line = line.trim();
    if let Some(code) = line.strip_prefix(REMOTE_PREFIX) {
        return match code.trim().parse::<u16>() {
            Ok(command) => vec![RawInput::Remote(command)],
            Err(err) => {
                tracing::warn!(input = line, %err, "unreadable remote command");
                Vec::new()
            }
        };
    }
    line.chars()
        .filter(|c| !c.is_whitespace())
        .map(RawInput::Key)
        .collect()
}

/// Keypad and remote read line by line from a reader.
pub struct ConsoleInput<R: BufRead> {
    reader: R,
    keymap: KeyMap,
    queued: VecDeque<InputEvent>,
}

impl<R: BufRead> ConsoleInput<R> {
    pub fn new(reader: R, keymap: KeyMap) -> Self {
        Self {
            reader,
            keymap,
            queued: VecDeque::new(),
        }
    }
}

impl<R: BufRead> InputSource for ConsoleInput<R> {
    fn next_event(&mut self) -> Option<InputEvent> {
        loop {
            if let Some(event) = self.queued.pop_front() {
                return Some(event);
            }

            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    let keymap = &self.keymap;
                    self.queued.extend(
                        parse_line(&line)
                            .into_iter()
                            .filter_map(|raw| keymap.translate(raw)),
                    );
                }
                Err(err) => {
                    tracing::error!(%err, "console input failed");
                    return None;
                }
            }
        }
    }
}

/// Text rendering of signals, one message per line.
pub struct ConsoleDisplay<W: Write> {
    out: W,
    label: String,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W, label: impl Into<String>) -> Self {
        Self {
            out,
            label: label.into(),
        }
    }

    /// Print the startup banner.
    pub fn banner(&mut self) {
        if let Err(err) = writeln!(self.out, "== {} ==", self.label) {
            tracing::warn!(%err, "display write failed");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            tracing::warn!(%err, "display write failed");
        }
    }
}

/// Progress mask such as `[**__]`.
fn entry_mask(typed: usize) -> String {
    let typed = typed.min(CODE_LENGTH);
    format!("[{}{}]", "*".repeat(typed), "_".repeat(CODE_LENGTH - typed))
}

impl<W: Write> SignalSink for ConsoleDisplay<W> {
    fn signal(&mut self, signal: Signal) {
        let text = match signal {
            Signal::Locked => "Door Locked!".to_string(),
            Signal::Unlocked => "Unlocked! # or Power to lock".to_string(),
            Signal::WrongCode => "Wrong code!".to_string(),
            Signal::CodeChangeMismatch => "Code mismatch. Safe not locked!".to_string(),
            Signal::AwaitingDigits(typed) => entry_mask(typed),
            Signal::EnterNewCode => "Enter new code:".to_string(),
            Signal::ConfirmNewCode => "Confirm new code".to_string(),
            Signal::StorageFault => "Storage error, try again".to_string(),
        };
        self.write_line(&text);
    }
}

/// Servo driver that only logs the requested angle.
#[derive(Debug, Default)]
pub struct LoggingServo;

impl ServoDriver for LoggingServo {
    fn write_angle(&mut self, degrees: u8) {
        tracing::info!(degrees, "servo angle written");
    }
}
