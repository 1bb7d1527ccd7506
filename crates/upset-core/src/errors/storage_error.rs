/// Persistence errors raised by pattern repositories and prediction logs.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(String),

    #[error("database busy: {0}")]
    Busy(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
