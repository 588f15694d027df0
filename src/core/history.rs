//! Bounded log of committed transitions.
//!
//! The log is an in-memory audit trail only; it is not persisted and carries
//! no code material.

use super::state::LogicalState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of records kept before the oldest is dropped.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// One committed move between logical states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: LogicalState,
    pub to: LogicalState,
    pub timestamp: DateTime<Utc>,
    /// Whether the transition wrote to the persistent store.
    pub persisted: bool,
}

/// Ordered, bounded history of transitions.
///
/// `record` returns a new log and leaves the receiver untouched.
///
/// # Example
///
/// ```rust
/// use strongbox::core::{LogicalState, TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let log = TransitionLog::with_capacity(8);
/// let log = log.record(TransitionRecord {
///     from: LogicalState::Locked,
///     to: LogicalState::Unlocked,
///     timestamp: Utc::now(),
///     persisted: true,
/// });
///
/// assert_eq!(log.get_path(), vec![&LogicalState::Locked, &LogicalState::Unlocked]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionLog {
    capacity: usize,
    records: VecDeque<TransitionRecord>,
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl TransitionLog {
    /// Empty log holding at most `capacity` records (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a transition, returning a new log.
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut records = self.records.clone();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
        Self {
            capacity: self.capacity,
            records,
        }
    }

    /// States traversed: the first retained `from`, then each `to`.
    pub fn get_path(&self) -> Vec<&LogicalState> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        path.extend(self.records.iter().map(|r| &r.to));
        path
    }

    /// Time between the first and last retained records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> impl ExactSizeIterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pretty JSON export of the retained records.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records)
    }
}
