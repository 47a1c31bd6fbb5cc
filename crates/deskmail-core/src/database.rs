//! Database connection.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::{Error, Result};

/// How the connection will be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Export and reporting only.
    ReadOnly,
    /// Ticket maintenance.
    ReadWrite,
}

/// Opens a single-connection pool on an existing `SQLite` database.
///
/// `target` is either an `sqlite:` URL or a plain file path. The database is
/// never created; a missing file is a connection error.
///
/// # Errors
///
/// Returns [`Error::Connection`] if the target is malformed or cannot be
/// opened.
pub async fn connect(target: &str, mode: AccessMode) -> Result<SqlitePool> {
    let connection_error = |reason: String| Error::Connection {
        target: target.to_string(),
        reason,
    };

    let options = if target.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(target).map_err(|e| connection_error(e.to_string()))?
    } else {
        if !Path::new(target).is_file() {
            return Err(connection_error("database file does not exist".to_string()));
        }
        SqliteConnectOptions::new().filename(target)
    };

    let options = options
        .create_if_missing(false)
        .read_only(mode == AccessMode::ReadOnly);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| connection_error(e.to_string()))?;

    tracing::debug!("Connected to {target} ({mode:?})");
    Ok(pool)
}

/// Opens an in-memory database for tests.
///
/// # Errors
///
/// Returns an error if the connection fails.
#[cfg(test)]
pub async fn in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    Ok(pool)
}
