//! RecoveryAction enum: what to do when an engine operation fails.

use std::fmt;

use super::{EngineError, StorageError};

/// Recommended recovery action for a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Retry the operation (transient failure like a busy database or a contended pattern).
    Retry,
    /// Fall back to a degraded but functional alternative.
    Fallback,
    /// Escalate to the caller. This error cannot be handled silently.
    Escalate,
    /// Ignore the error. The operation was best-effort.
    Ignore,
}

impl RecoveryAction {
    /// Determine the recommended recovery action for an EngineError.
    pub fn for_error(error: &EngineError) -> Self {
        match error {
            // Request validation: the caller must fix the request
            EngineError::UnknownTeam { .. } => Self::Escalate,
            EngineError::InvalidMatchContext { .. } => Self::Escalate,

            // Feedback bookkeeping
            EngineError::OutcomeAlreadyRecorded { .. } => Self::Ignore,
            EngineError::PatternNotFound { .. } => Self::Ignore,
            EngineError::PatternUpdateConflict { .. } => Self::Retry,

            // Repository hiccups are transient until proven otherwise
            EngineError::Repository(_) => Self::Retry,

            // Storage: busy retries, everything else falls back or escalates
            EngineError::Storage(StorageError::Busy(_)) => Self::Retry,
            EngineError::Storage(StorageError::LockPoisoned(_)) => Self::Fallback,
            EngineError::Storage(StorageError::Sqlite(_)) => Self::Retry,
            EngineError::Storage(StorageError::Migration(_)) => Self::Escalate,
            EngineError::Storage(StorageError::Corrupt(_)) => Self::Escalate,

            EngineError::Config(_) => Self::Escalate,
            EngineError::InvalidTransition { .. } => Self::Escalate,
            EngineError::Serialization(_) => Self::Escalate,
        }
    }

    /// Whether the operation should be attempted again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retry)
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retry => write!(f, "Retry"),
            Self::Fallback => write!(f, "Fallback"),
            Self::Escalate => write!(f, "Escalate"),
            Self::Ignore => write!(f, "Ignore"),
        }
    }
}
