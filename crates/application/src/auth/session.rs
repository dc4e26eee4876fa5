//! Persisted, observable session state.

use std::sync::Arc;

use folio_domain::Identity;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::ports::SessionStorage;

/// Process-wide record of who is signed in.
///
/// Every mutation is written through to [`SessionStorage`] before it becomes
/// visible to subscribers. The identity is not cross-checked against the
/// credential store; the two are owned independently.
pub struct SessionState {
    identity: watch::Sender<Option<Identity>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionState {
    /// Rehydrates the last persisted identity from `storage`.
    ///
    /// An unreadable store starts the session signed out.
    #[must_use]
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let identity = storage.load().unwrap_or_else(|error| {
            warn!(%error, "failed to restore session; starting signed out");
            None
        });
        debug!(authenticated = identity.is_some(), "session restored");
        let (identity, _) = watch::channel(identity);
        Self { identity, storage }
    }

    /// Replaces the identity atomically; `None` signs out.
    ///
    /// Persistence failures are logged; the in-memory state still changes.
    pub fn set_identity(&self, identity: Option<Identity>) {
        let storage = &self.storage;
        self.identity.send_modify(|current| {
            if let Err(error) = storage.save(identity.as_ref()) {
                warn!(%error, "failed to persist session");
            }
            *current = identity;
        });
    }

    /// Signs out.
    pub fn clear(&self) {
        self.set_identity(None);
    }

    /// Snapshot of the current identity.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    /// Returns true if someone is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.borrow().is_some()
    }

    /// Receiver notified after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("identity", &*self.identity.borrow())
            .finish_non_exhaustive()
    }
}
