//! Connection bootstrap for the store.
//!
//! # Responsibility
//! - Optionally remove a pre-existing database before opening.
//! - Open file or in-memory SQLite connections.
//! - Apply connection pragmas from [`StoreConfig`].
//!
//! # Invariants
//! - Returned connections have the configured busy timeout and
//!   `foreign_keys` setting applied.
//! - A missing file is never an error for truncation.

use super::{StoreConfig, StoreError, StoreLocation, StoreResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const SIDECAR_SUFFIXES: &[&str] = &["-wal", "-shm", "-journal"];

/// Opens the connection described by `config`.
///
/// # Side effects
/// - With `truncate_on_open`, deletes the database file and its sidecars.
/// - Emits `store_open` logging events with duration and status.
pub fn open_connection(config: &StoreConfig) -> StoreResult<Connection> {
    let started_at = Instant::now();
    let mode = config.location.mode();
    info!(
        "event=store_open module=db status=start mode={} truncate={}",
        mode, config.truncate_on_open
    );

    if config.truncate_on_open {
        match &config.location {
            StoreLocation::File(path) => {
                if let Err(err) = remove_database_files(path) {
                    error!(
                        "event=store_open module=db status=error mode={} duration_ms={} error_code={} error={}",
                        mode,
                        started_at.elapsed().as_millis(),
                        err.code(),
                        err
                    );
                    return Err(err);
                }
            }
            StoreLocation::Memory => {
                warn!("event=store_open module=db status=skip mode=memory reason=truncate_not_applicable");
            }
        }
    }

    let opened = match &config.location {
        StoreLocation::File(path) => Connection::open(path),
        StoreLocation::Memory => Connection::open_in_memory(),
    };

    let result = opened
        .and_then(|conn| configure_connection(&conn, config).map(|()| conn))
        .map_err(|source| StoreError::Open {
            location: config.location.clone(),
            source,
        });

    match &result {
        Ok(_) => info!(
            "event=store_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=store_open module=db status=error mode={} duration_ms={} error_code={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

/// Deletes the database file at `path` plus its `-wal`, `-shm` and
/// `-journal` sidecars. Files that do not exist are skipped.
///
/// Returns `true` when the main database file existed and was removed.
pub fn remove_database_files(path: &Path) -> StoreResult<bool> {
    let removed = remove_if_exists(path)?;
    for suffix in SIDECAR_SUFFIXES {
        remove_if_exists(&sidecar_path(path, suffix))?;
    }
    if removed {
        info!(
            "event=store_truncate module=db status=ok path={}",
            path.display()
        );
    }
    Ok(removed)
}

fn remove_if_exists(path: &Path) -> StoreResult<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StoreError::Truncate {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn configure_connection(conn: &Connection, config: &StoreConfig) -> rusqlite::Result<()> {
    conn.busy_timeout(config.busy_timeout)?;
    let pragma = if config.foreign_keys {
        "PRAGMA foreign_keys = ON;"
    } else {
        "PRAGMA foreign_keys = OFF;"
    };
    conn.execute_batch(pragma)?;
    Ok(())
}
