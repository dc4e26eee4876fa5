//! File-backed storage for credentials and the session identity.
//!
//! Both live in the Folio data directory:
//! - `credentials.json`: the credential jar
//! - `auth-storage.json`: the persisted session identity

mod credential_jar;
mod session_repository;

pub use credential_jar::FileCredentialStorage;
pub use session_repository::FileSessionStorage;

use std::path::Path;

use folio_application::ports::StorageError;

use crate::serialization::SerializationError;

fn storage_error(error: SerializationError) -> StorageError {
    StorageError::Serialization(error.to_string())
}

/// Writes `content` next to `path` and renames it into place.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
