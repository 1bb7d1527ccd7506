//! # upset-core
//!
//! Shared foundation for the upset-prediction engine: the data model,
//! configuration, error types, and the collaborator contracts the engine
//! consumes (data provider, pattern repository, team directory, injection guard,
//! confidence signals). No algorithms live here.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::EngineConfig;
pub use errors::{EngineError, EngineResult, RecoveryAction, StorageError, StorageResult};
