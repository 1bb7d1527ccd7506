//! Schema versioning with `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::info;

use upset_core::errors::{StorageError, StorageResult};

use crate::errors::storage_err;
use crate::schema::{TABLES_V1, TABLES_V2};

/// Bump when adding a migration.
pub const CURRENT_VERSION: u32 = 2;

pub fn get_schema_version(conn: &Connection) -> StorageResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(storage_err)
}

fn set_schema_version(conn: &Connection, version: u32) -> StorageResult<()> {
    conn.pragma_update(None, "user_version", version)
        .map_err(storage_err)
}

/// Apply pending migrations. Returns the resulting version.
pub fn migrate(conn: &Connection) -> StorageResult<u32> {
    let current = get_schema_version(conn)?;
    if current > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "database schema v{current} is newer than supported v{CURRENT_VERSION}"
        )));
    }
    if current == CURRENT_VERSION {
        return Ok(current);
    }

    if current < 1 {
        info!("Migrating schema: 0 → 1 (initial tables)");
        conn.execute_batch(TABLES_V1)
            .map_err(|e| StorageError::Migration(format!("v1: {e}")))?;
        set_schema_version(conn, 1)?;
    }

    if current < 2 {
        info!("Migrating schema: 1 → 2 (outcome claims)");
        conn.execute_batch(TABLES_V2)
            .map_err(|e| StorageError::Migration(format!("v2: {e}")))?;
        set_schema_version(conn, 2)?;
    }

    let version = get_schema_version(conn)?;
    info!(from = current, to = version, "Schema migration complete");
    Ok(version)
}
