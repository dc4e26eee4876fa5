//! Credential jar persisted as a JSON document.
//!
//! ```json
//! {
//!   "entries": {
//!     "access_token": {
//!       "value": "eyJ...",
//!       "expires_at": "2026-10-24T09:00:00Z",
//!       "secure": true
//!     }
//!   }
//! }
//! ```
//!
//! Every entry carries its own horizon. An entry past its horizon reads as
//! absent and is dropped on the next write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use folio_application::ports::{Clock, CredentialStorage, EntryOptions, StorageError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{storage_error, write_atomic};
use crate::serialization::{from_json_bytes, to_json_stable_bytes};

const FILE_NAME: &str = "credentials.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct JarFile {
    #[serde(default)]
    entries: BTreeMap<String, JarEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JarEntry {
    value: String,
    expires_at: DateTime<Utc>,
    #[serde(default)]
    secure: bool,
}

impl JarEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Credential jar stored at `<data_dir>/credentials.json`.
pub struct FileCredentialStorage {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl FileCredentialStorage {
    /// Creates a jar inside `data_dir`. Nothing is touched until the first write.
    #[must_use]
    pub fn new(data_dir: &Path, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: data_dir.join(FILE_NAME),
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the jar file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<JarFile, StorageError> {
        match std::fs::read(&self.path) {
            Ok(content) => from_json_bytes(&content).map_err(storage_error),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(JarFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut JarFile)) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut jar = match self.load() {
            Ok(jar) => jar,
            Err(StorageError::Serialization(error)) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "replacing unreadable credential jar"
                );
                JarFile::default()
            }
            Err(error) => return Err(error),
        };
        let now = self.clock.now();
        jar.entries.retain(|_, entry| entry.is_live(now));
        apply(&mut jar);
        let content = to_json_stable_bytes(&jar).map_err(storage_error)?;
        write_atomic(&self.path, &content)
    }
}

impl std::fmt::Debug for FileCredentialStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCredentialStorage")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl CredentialStorage for FileCredentialStorage {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        let now = self.clock.now();
        Ok(self
            .load()?
            .entries
            .remove(name)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value))
    }

    fn set(&self, name: &str, value: &str, options: EntryOptions) -> Result<(), StorageError> {
        let expires_at = self.clock.now() + options.max_age;
        self.update(|jar| {
            jar.entries.insert(
                name.to_string(),
                JarEntry {
                    value: value.to_string(),
                    expires_at,
                    secure: options.secure,
                },
            );
        })
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.update(|jar| {
            jar.entries.remove(name);
        })
    }
}
