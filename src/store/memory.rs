//! In-memory store simulating a single non-volatile cell.

use super::{decode, encode, PersistentCodeStore, StorageError, StoreFormat};
use crate::core::SafeState;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Cell {
    bytes: Option<Vec<u8>>,
    fail_writes: bool,
    writes: usize,
}

/// Store backed by a shared in-memory cell.
///
/// Clones share the same cell, so dropping a machine and building a new one
/// from a clone behaves like a power cycle. Write failures can be injected
/// with [`fail_writes`](Self::fail_writes).
#[derive(Clone)]
pub struct MemoryStore {
    defaults: SafeState,
    format: StoreFormat,
    cell: Rc<RefCell<Cell>>,
}

impl MemoryStore {
    /// Uninitialized store that loads `defaults` until first written.
    pub fn new(defaults: SafeState) -> Self {
        Self {
            defaults,
            format: StoreFormat::Binary,
            cell: Rc::new(RefCell::new(Cell::default())),
        }
    }

    pub fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.cell.borrow_mut().fail_writes = fail;
    }

    /// Number of committed writes.
    pub fn write_count(&self) -> usize {
        self.cell.borrow().writes
    }

    /// Whether anything has been written yet.
    pub fn is_initialized(&self) -> bool {
        self.cell.borrow().bytes.is_some()
    }

    /// Replace the raw cell contents, bypassing encoding.
    pub fn overwrite_raw(&self, bytes: Vec<u8>) {
        self.cell.borrow_mut().bytes = Some(bytes);
    }
}

impl PersistentCodeStore for MemoryStore {
    fn load(&self) -> SafeState {
        let cell = self.cell.borrow();
        let Some(bytes) = cell.bytes.as_deref() else {
            tracing::debug!("memory store uninitialized, using factory defaults");
            return self.defaults;
        };

        decode(self.format, bytes).unwrap_or_else(|err| {
            tracing::warn!(%err, "stored record unusable, using factory defaults");
            self.defaults
        })
    }

    fn save(&mut self, state: &SafeState) -> Result<(), StorageError> {
        let bytes = encode(self.format, state)?;
        let mut cell = self.cell.borrow_mut();
        if cell.fail_writes {
            return Err(StorageError::WriteFailed("injected write failure".to_string()));
        }
        cell.bytes = Some(bytes);
        cell.writes += 1;
        Ok(())
    }
}
