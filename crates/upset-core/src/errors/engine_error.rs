use super::StorageError;

/// Top-level error type for the upset-prediction engine.
/// Soft failures (missing factors, malformed patterns) never surface here;
/// only request validation, feedback bookkeeping and infrastructure do.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown team: {team_id}")]
    UnknownTeam { team_id: String },

    #[error("invalid match context: {reason}")]
    InvalidMatchContext { reason: String },

    #[error("outcome already recorded for prediction {prediction_id}")]
    OutcomeAlreadyRecorded { prediction_id: String },

    #[error("pattern not found: {name}")]
    PatternNotFound { name: String },

    #[error("pattern update for {name} failed after {attempts} attempts")]
    PatternUpdateConflict { name: String, attempts: u32 },

    #[error("pattern repository error: {0}")]
    Repository(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid persona transition: {from} → {to}")]
    InvalidTransition { from: String, to: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether this error rejects the request before any calculation ran.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTeam { .. } | Self::InvalidMatchContext { .. }
        )
    }
}

/// Convenience type alias.
pub type EngineResult<T> = Result<T, EngineError>;
