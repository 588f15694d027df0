//! File-backed store with atomic replacement.

use super::{decode, encode, PersistentCodeStore, StorageError, StoreFormat};
use crate::core::SafeState;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Store that keeps the record in a single file.
///
/// Writes go to a sibling `.tmp` file which is synced and then renamed over
/// the target, so a crash mid-write leaves either the old or the new record.
/// The parent directory is synced after the rename so an acknowledged save
/// survives power loss.
pub struct FileStore {
    path: PathBuf,
    format: StoreFormat,
    defaults: SafeState,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, format: StoreFormat, defaults: SafeState) -> Self {
        Self {
            path: path.into(),
            format,
            defaults,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_atomically(&self, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(self.parent_dir())?;

        let temp = self.temp_path();
        let mut file = File::create(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &self.path)?;
        File::open(self.parent_dir())?.sync_all()
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl PersistentCodeStore for FileStore {
    fn load(&self) -> SafeState {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "no state file, using factory defaults");
                return self.defaults;
            }
            Err(err) => {
                tracing::warn!(path = ?self.path, %err, "failed to read state file, using factory defaults");
                return self.defaults;
            }
        };

        match decode(self.format, &bytes) {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(path = ?self.path, %err, "state file unusable, using factory defaults");
                self.defaults
            }
        }
    }

    fn save(&mut self, state: &SafeState) -> Result<(), StorageError> {
        let bytes = encode(self.format, state)?;
        self.write_atomically(&bytes).map_err(|err| {
            let _ = fs::remove_file(self.temp_path());
            StorageError::WriteFailed(format!("{}: {err}", self.path.display()))
        })
    }
}
