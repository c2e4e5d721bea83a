//! SQLite connection bootstrap, configuration and store errors.
//!
//! # Responsibility
//! - Describe where and how a store connection is opened.
//! - Open and configure the single SQLite connection owned by a store.
//! - Define the error type shared by every store operation.
//!
//! # Invariants
//! - Library code never terminates the process; every failure is returned.
//! - Engine errors are kept as `source`, never flattened into strings.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod config;
mod open;

pub use config::{StoreConfig, StoreLocation, DEFAULT_BUSY_TIMEOUT};
pub use open::{open_connection, remove_database_files};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store operation.
#[derive(Debug)]
pub enum StoreError {
    /// Removing a pre-existing database file before open failed.
    Truncate { path: PathBuf, source: io::Error },
    /// Opening or configuring the connection failed.
    Open {
        location: StoreLocation,
        source: rusqlite::Error,
    },
    /// A query statement could not be prepared or started.
    QueryExecute { source: rusqlite::Error },
    /// A result row could not be stepped to or decoded.
    RowScan { source: rusqlite::Error },
    /// A statement passed to `execute` failed.
    Execute { source: rusqlite::Error },
    /// Closing the connection failed.
    Close { source: rusqlite::Error },
}

impl StoreError {
    /// Returns the underlying engine error, when there is one.
    pub fn sqlite_error(&self) -> Option<&rusqlite::Error> {
        match self {
            Self::Truncate { .. } => None,
            Self::Open { source, .. }
            | Self::QueryExecute { source }
            | Self::RowScan { source }
            | Self::Execute { source }
            | Self::Close { source } => Some(source),
        }
    }

    /// Returns the SQLite primary error code, when the engine reported one.
    pub fn sqlite_code(&self) -> Option<rusqlite::ErrorCode> {
        self.sqlite_error()
            .and_then(rusqlite::Error::sqlite_error_code)
    }

    /// Stable machine-readable tag used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Truncate { .. } => "store_truncate_failed",
            Self::Open { .. } => "store_open_failed",
            Self::QueryExecute { .. } => "query_execute_failed",
            Self::RowScan { .. } => "row_scan_failed",
            Self::Execute { .. } => "execute_failed",
            Self::Close { .. } => "store_close_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncate { path, source } => write!(
                f,
                "failed to remove existing database `{}`: {source}",
                path.display()
            ),
            Self::Open { location, source } => {
                write!(f, "failed to open database {location}: {source}")
            }
            Self::QueryExecute { source } => write!(f, "query execute error: {source}"),
            Self::RowScan { source } => write!(f, "row scan failure: {source}"),
            Self::Execute { source } => write!(f, "{source}"),
            Self::Close { source } => write!(f, "failed to close database: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Truncate { source, .. } => Some(source),
            Self::Open { source, .. }
            | Self::QueryExecute { source }
            | Self::RowScan { source }
            | Self::Execute { source }
            | Self::Close { source } => Some(source),
        }
    }
}
