//! Navigation port

/// Port for the surrounding application's navigation.
pub trait Navigator: Send + Sync {
    /// Path the user is currently on, e.g. `/en/posts`.
    fn current_path(&self) -> String;

    /// Sends the user to `path`.
    fn navigate(&self, path: &str);
}
