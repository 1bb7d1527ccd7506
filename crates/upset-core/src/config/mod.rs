pub mod confidence_config;
pub mod persona_config;
pub mod prediction_config;
pub mod storage_config;
pub mod validation_config;

use serde::{Deserialize, Serialize};

pub use confidence_config::ConfidenceConfig;
pub use persona_config::PersonaConfig;
pub use prediction_config::PredictionConfig;
pub use storage_config::StorageConfig;
pub use validation_config::{ValidationConfig, WeightLearningConfig};

use crate::errors::{EngineError, EngineResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub prediction: PredictionConfig,
    pub confidence: ConfidenceConfig,
    pub validation: ValidationConfig,
    pub persona: PersonaConfig,
    pub storage: StorageConfig,
}

impl EngineConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Check every subsystem config. Called once at engine construction.
    pub fn validate(&self) -> EngineResult<()> {
        self.prediction.validate()?;
        self.confidence.validate()?;
        self.validation.validate()?;
        self.persona.validate()?;
        Ok(())
    }
}

/// Shared check for values that must be probabilities.
pub(crate) fn ensure_unit(name: &str, value: f64) -> EngineResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::Config(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}
