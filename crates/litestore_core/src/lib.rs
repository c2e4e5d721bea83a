//! Core storage facade for litestore.
//! One embedded SQLite connection behind a raw-statement query/execute API.

pub mod db;
pub mod logging;
pub mod model;
pub mod store;

pub use db::{StoreConfig, StoreError, StoreLocation, StoreResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::row::{Record, RecordSet, Row, RowSet, TypedRow, TypedRowSet};
pub use model::value::{ColumnValue, NULL_TEXT};
pub use store::{DataStore, ExecSummary};

/// Minimal health-check API for smoke probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
