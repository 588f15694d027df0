//! Storage error types.

use thiserror::Error;

/// Errors raised by a [`PersistentCodeStore`](super::PersistentCodeStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The record could not be committed to non-volatile memory
    #[error("Persistent write failed: {0}")]
    WriteFailed(String),

    /// The record could not be encoded
    #[error("Record encoding failed: {0}")]
    Encode(String),

    /// The stored bytes do not decode to a valid record
    #[error("Stored record is corrupt: {0}")]
    Corrupt(String),

    /// The stored record was written by an unsupported layout version
    #[error("Unsupported record version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
