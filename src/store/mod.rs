//! Durable storage for the access code and lock flag.
//!
//! A store holds exactly one [`SafeState`] record. `load` never fails: when
//! nothing has been written yet, or the stored bytes are unusable, the store
//! hands back its factory default. `save` replaces the whole record at once so
//! a half-written state is never observed.
//!
//! # Record layout
//!
//! The binary format is a fixed 9-byte `bincode` record:
//! `version: u32 LE`, four ASCII digit bytes, `locked: u8`.
//! The JSON format carries the same three fields.

use crate::core::{SafeState, SecretCode, CODE_LENGTH};
use serde::{Deserialize, Serialize};

pub mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Version identifier for the persisted record layout
pub const RECORD_VERSION: u32 = 1;

/// Durable home of the [`SafeState`].
pub trait PersistentCodeStore {
    /// Read the stored state, or the factory default if none is usable.
    fn load(&self) -> SafeState;

    /// Commit both fields. On `Err` the previously stored record is intact.
    fn save(&mut self, state: &SafeState) -> Result<(), StorageError>;
}

/// Encoding used for the persisted record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    /// Compact fixed-size record
    #[default]
    Binary,
    /// Human-readable record
    Json,
}

/// On-storage shape of a [`SafeState`].
///
/// Not `Debug`: the code bytes are in the clear.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct StoredRecord {
    version: u32,
    code: [u8; CODE_LENGTH],
    locked: bool,
}

impl StoredRecord {
    fn from_state(state: &SafeState) -> Self {
        Self {
            version: RECORD_VERSION,
            code: state.secret_code.to_ascii(),
            locked: state.locked,
        }
    }

    fn into_state(self) -> Result<SafeState, StorageError> {
        if self.version != RECORD_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: self.version,
                supported: RECORD_VERSION,
            });
        }
        let secret_code = SecretCode::from_ascii(self.code)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        Ok(SafeState::new(secret_code, self.locked))
    }
}

pub(crate) fn encode(format: StoreFormat, state: &SafeState) -> Result<Vec<u8>, StorageError> {
    let record = StoredRecord::from_state(state);
    match format {
        StoreFormat::Binary => {
            bincode::serialize(&record).map_err(|e| StorageError::Encode(e.to_string()))
        }
        StoreFormat::Json => {
            serde_json::to_vec(&record).map_err(|e| StorageError::Encode(e.to_string()))
        }
    }
}

pub(crate) fn decode(format: StoreFormat, bytes: &[u8]) -> Result<SafeState, StorageError> {
    let record: StoredRecord = match format {
        StoreFormat::Binary => {
            bincode::deserialize(bytes).map_err(|e| StorageError::Corrupt(e.to_string()))?
        }
        StoreFormat::Json => {
            serde_json::from_slice(bytes).map_err(|e| StorageError::Corrupt(e.to_string()))?
        }
    };
    record.into_state()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(code: &str, locked: bool) -> SafeState {
        SafeState::new(code.parse().unwrap(), locked)
    }

    #[test]
    fn binary_record_is_fixed_size() {
        let a = encode(StoreFormat::Binary, &state("0000", false)).unwrap();
        let b = encode(StoreFormat::Binary, &state("9999", true)).unwrap();

        assert_eq!(a.len(), 9);
        assert_eq!(b.len(), 9);
        assert_eq!(&b[4..8], b"9999");
        assert_eq!(b[8], 1);
    }

    #[test]
    fn binary_decode_restores_state() {
        let original = state("2580", true);
        let bytes = encode(StoreFormat::Binary, &original).unwrap();
        assert_eq!(decode(StoreFormat::Binary, &bytes).unwrap(), original);
    }

    #[test]
    fn json_record_is_readable() {
        let bytes = encode(StoreFormat::Json, &state("1357", false)).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert!(text.contains("\"version\":1"));
        assert!(text.contains("\"locked\":false"));
        assert_eq!(decode(StoreFormat::Json, &bytes).unwrap(), state("1357", false));
    }

    #[test]
    fn non_digit_code_bytes_are_corrupt() {
        let mut bytes = encode(StoreFormat::Binary, &state("1234", false)).unwrap();
        bytes[5] = b'x';

        assert!(matches!(
            decode(StoreFormat::Binary, &bytes),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut bytes = encode(StoreFormat::Binary, &state("1234", false)).unwrap();
        bytes[0] = 7;

        assert_eq!(
            decode(StoreFormat::Binary, &bytes),
            Err(StorageError::UnsupportedVersion {
                found: 7,
                supported: RECORD_VERSION
            })
        );
    }

    #[test]
    fn truncated_record_is_corrupt() {
        assert!(matches!(
            decode(StoreFormat::Binary, &[1, 0, 0]),
            Err(StorageError::Corrupt(_))
        ));
    }
}
