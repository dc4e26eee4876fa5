//! Navigator for headless front ends.
//!
//! There is no router to drive, so navigation is recorded and reported
//! through `tracing`.

use folio_application::ports::Navigator;
use parking_lot::Mutex;
use tracing::info;

/// Keeps the current path in memory and logs every navigation.
#[derive(Debug)]
pub struct TracingNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl TracingNavigator {
    /// Starts at `current_path`.
    #[must_use]
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(current_path.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Every path navigated to, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }
}

impl Navigator for TracingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().clone()
    }

    fn navigate(&self, path: &str) {
        let from = std::mem::replace(&mut *self.current.lock(), path.to_string());
        info!(%from, to = %path, "navigating");
        self.history.lock().push(path.to_string());
    }
}
