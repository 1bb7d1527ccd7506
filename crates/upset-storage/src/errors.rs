//! rusqlite → StorageError mapping.

use rusqlite::ErrorCode;
use upset_core::errors::StorageError;

/// Busy and locked databases are transient; everything else is a plain SQLite failure.
pub fn storage_err(e: rusqlite::Error) -> StorageError {
    match &e {
        rusqlite::Error::SqliteFailure(inner, _)
            if matches!(inner.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) =>
        {
            StorageError::Busy(e.to_string())
        }
        _ => StorageError::Sqlite(e.to_string()),
    }
}

pub fn corrupt(what: impl std::fmt::Display) -> StorageError {
    StorageError::Corrupt(what.to_string())
}
