mod engine_error;
mod recovery;
mod storage_error;

pub use engine_error::{EngineError, EngineResult};
pub use recovery::RecoveryAction;
pub use storage_error::{StorageError, StorageResult};
