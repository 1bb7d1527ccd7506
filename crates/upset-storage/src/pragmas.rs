//! SQLite PRAGMA configuration. Applied to every connection right after opening.

use rusqlite::Connection;

use upset_core::errors::StorageResult;

use crate::errors::storage_err;

/// Writer connection: WAL for concurrent readers, busy_timeout as the
/// primary contention mechanism.
pub fn configure_connection(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA cache_size = -8000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(storage_err)
}

/// Reader connection: same settings plus `query_only`.
pub fn configure_readonly_connection(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA cache_size = -8000;
        PRAGMA temp_store = MEMORY;
        PRAGMA query_only = ON;
        ",
    )
    .map_err(storage_err)
}
