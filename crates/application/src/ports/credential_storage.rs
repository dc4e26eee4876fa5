//! Durable credential storage port
//!
//! The cookie-equivalent medium that keeps tokens across restarts.

use chrono::Duration;

/// Errors that can occur while reading or writing durable storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Attributes applied to a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryOptions {
    /// How long the medium keeps the entry, independent of token contents.
    pub max_age: Duration,
    /// Whether the entry may only travel over a secure transport.
    pub secure: bool,
}

impl EntryOptions {
    /// Seven-day horizon, secure only.
    pub const CREDENTIALS: Self = Self {
        max_age: Duration::days(7),
        secure: true,
    };
}

impl Default for EntryOptions {
    fn default() -> Self {
        Self::CREDENTIALS
    }
}

/// Named string entries with a per-entry expiry horizon.
///
/// Implementations must treat entries past their horizon as absent.
pub trait CredentialStorage: Send + Sync {
    /// Reads an entry.
    ///
    /// # Errors
    /// Returns an error if the medium cannot be read.
    fn get(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Writes an entry, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the medium cannot be written.
    fn set(&self, name: &str, value: &str, options: EntryOptions) -> Result<(), StorageError>;

    /// Removes an entry. Removing a missing entry is not an error.
    ///
    /// # Errors
    /// Returns an error if the medium cannot be written.
    fn remove(&self, name: &str) -> Result<(), StorageError>;
}
