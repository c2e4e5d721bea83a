//! Store open configuration.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Busy timeout applied to every new connection unless overridden.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Backing location of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Database file on disk.
    File(PathBuf),
    /// Private in-memory database, gone once the connection closes.
    Memory,
}

impl StoreLocation {
    /// Label used in log events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path.as_path()),
            Self::Memory => None,
        }
    }
}

impl Display for StoreLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "`{}`", path.display()),
            Self::Memory => f.write_str("`:memory:`"),
        }
    }
}

/// Options for opening a [`crate::DataStore`].
///
/// # Invariants
/// - `truncate_on_open` defaults to `false`; existing data is only deleted
///   when a caller asks for it.
/// - `truncate_on_open` has no effect on in-memory stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// Delete any existing database file (and its sidecars) before opening.
    pub truncate_on_open: bool,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Value of `PRAGMA foreign_keys` on the new connection.
    pub foreign_keys: bool,
}

impl StoreConfig {
    /// Config for a file-backed store with default options.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::with_location(StoreLocation::File(path.into()))
    }

    /// Config for an in-memory store with default options.
    pub fn in_memory() -> Self {
        Self::with_location(StoreLocation::Memory)
    }

    fn with_location(location: StoreLocation) -> Self {
        Self {
            location,
            truncate_on_open: false,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            foreign_keys: true,
        }
    }

    pub fn with_truncate_on_open(mut self, truncate: bool) -> Self {
        self.truncate_on_open = truncate;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreConfig, StoreLocation, DEFAULT_BUSY_TIMEOUT};
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn file_config_defaults_are_non_destructive() {
        let config = StoreConfig::file("/tmp/store.db");
        assert_eq!(config.location.path(), Some(Path::new("/tmp/store.db")));
        assert!(!config.truncate_on_open);
        assert!(config.foreign_keys);
        assert_eq!(config.busy_timeout, DEFAULT_BUSY_TIMEOUT);
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = StoreConfig::in_memory()
            .with_truncate_on_open(true)
            .with_busy_timeout(Duration::from_millis(250))
            .with_foreign_keys(false);
        assert_eq!(config.location, StoreLocation::Memory);
        assert!(config.truncate_on_open);
        assert!(!config.foreign_keys);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
    }

    #[test]
    fn location_display_names_target() {
        assert_eq!(StoreLocation::Memory.to_string(), "`:memory:`");
        assert_eq!(
            StoreLocation::File("/data/app.db".into()).to_string(),
            "`/data/app.db`"
        );
        assert_eq!(StoreLocation::Memory.mode(), "memory");
    }
}
