//! # upset-storage
//!
//! SQLite persistence: a pattern repository with atomic per-name updates and
//! a log of issued predictions and their settled outcomes.
//!
//! All connections go through [`ConnectionPool`]: one writer, N readers.

pub mod errors;
pub mod migrations;
pub mod pattern_store;
pub mod pool;
pub mod pragmas;
pub mod schema;
pub mod prediction_log;

use std::path::Path;
use std::sync::Arc;

use upset_core::config::StorageConfig;
use upset_core::errors::StorageResult;

pub use pattern_store::SqlitePatternRepository;
pub use pool::ConnectionPool;
pub use prediction_log::PredictionLog;

/// Open (or create) the database described by `config` and bring its schema
/// up to date. `db_path = None` opens a private in-memory database.
pub fn open_database(config: &StorageConfig) -> StorageResult<Arc<ConnectionPool>> {
    let pool = match &config.db_path {
        Some(path) => ConnectionPool::open(Path::new(path), config.read_pool_size)?,
        None => ConnectionPool::open_in_memory()?,
    };
    pool.with_writer(migrations::migrate)?;
    Ok(Arc::new(pool))
}
