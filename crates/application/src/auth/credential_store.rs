//! Durable store for the access and renewal tokens.

use std::sync::Arc;

use folio_domain::{AccessClaims, CredentialKind, CredentialPair};
use tracing::warn;

use crate::ports::{Clock, CredentialStorage, EntryOptions, StorageError};

/// Holds the credential pair in a durable jar and answers freshness questions.
///
/// The jar horizon ([`EntryOptions::CREDENTIALS`]) is independent of the
/// expiry embedded in the access token.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn CredentialStorage>,
    clock: Arc<dyn Clock>,
}

impl CredentialStore {
    /// Create a store over `storage`, reading time from `clock`.
    #[must_use]
    pub fn new(storage: Arc<dyn CredentialStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Returns the stored token of `kind`.
    ///
    /// Storage failures are logged and read as absent.
    #[must_use]
    pub fn get(&self, kind: CredentialKind) -> Option<String> {
        match self.storage.get(kind.entry_name()) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(error) => {
                warn!(entry = %kind, %error, "credential read failed");
                None
            }
        }
    }

    /// Persists both tokens, overwriting prior values.
    ///
    /// # Errors
    /// Returns an error if either entry cannot be written.
    pub fn set(&self, pair: &CredentialPair) -> Result<(), StorageError> {
        self.write(CredentialKind::Access, &pair.access)?;
        self.write(CredentialKind::Renewal, &pair.renewal)
    }

    /// Persists a new access token, keeping the current renewal token.
    ///
    /// # Errors
    /// Returns an error if the entry cannot be written.
    pub fn set_access(&self, access: &str) -> Result<(), StorageError> {
        self.write(CredentialKind::Access, access)
    }

    /// Removes both entries. Idempotent.
    ///
    /// # Errors
    /// Returns the first failure; the other entry is still attempted.
    pub fn clear(&self) -> Result<(), StorageError> {
        let access = self.storage.remove(CredentialKind::Access.entry_name());
        let renewal = self.storage.remove(CredentialKind::Renewal.entry_name());
        access.and(renewal)
    }

    /// Returns true if `access` is past its embedded expiry or cannot be decoded.
    #[must_use]
    pub fn is_expired(&self, access: &str) -> bool {
        AccessClaims::token_expired_at(access, self.clock.now())
    }

    /// The stored access token, if present and not expired.
    #[must_use]
    pub fn fresh_access(&self) -> Option<String> {
        self.get(CredentialKind::Access)
            .filter(|token| !self.is_expired(token))
    }

    fn write(&self, kind: CredentialKind, value: &str) -> Result<(), StorageError> {
        self.storage
            .set(kind.entry_name(), value, EntryOptions::CREDENTIALS)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}
