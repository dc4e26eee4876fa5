//! Session identity storage port

use folio_domain::Identity;

use super::StorageError;

/// Durable home of the persisted session identity.
///
/// Holds the identity only, never raw credentials.
pub trait SessionStorage: Send + Sync {
    /// Loads the last persisted identity.
    ///
    /// # Errors
    /// Returns an error if the medium cannot be read or decoded.
    fn load(&self) -> Result<Option<Identity>, StorageError>;

    /// Persists `identity`; `None` persists the signed-out state.
    ///
    /// # Errors
    /// Returns an error if the medium cannot be written.
    fn save(&self, identity: Option<&Identity>) -> Result<(), StorageError>;
}
