//! Persisted session identity.
//!
//! Stored at `<data_dir>/auth-storage.json`:
//!
//! ```json
//! {
//!   "state": {
//!     "identity": { "user_id": "42", "username": "ada" }
//!   },
//!   "version": 1
//! }
//! ```

use std::path::{Path, PathBuf};

use folio_application::ports::{SessionStorage, StorageError};
use folio_domain::Identity;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{storage_error, write_atomic};
use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Namespace of the persisted session.
pub const SESSION_NAMESPACE: &str = "auth-storage";

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    state: SessionSnapshot,
    version: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionSnapshot {
    #[serde(default)]
    identity: Option<Identity>,
}

/// Session storage backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Creates the storage inside `data_dir`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{SESSION_NAMESPACE}.json")),
        }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<Identity>, StorageError> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: SessionFile = from_json_bytes(&content).map_err(storage_error)?;
        if file.version != SCHEMA_VERSION {
            warn!(version = file.version, "discarding session stored by another version");
            return Ok(None);
        }
        Ok(file.state.identity)
    }

    fn save(&self, identity: Option<&Identity>) -> Result<(), StorageError> {
        let file = SessionFile {
            state: SessionSnapshot {
                identity: identity.cloned(),
            },
            version: SCHEMA_VERSION,
        };
        let content = to_json_stable_bytes(&file).map_err(storage_error)?;
        write_atomic(&self.path, &content)
    }
}
