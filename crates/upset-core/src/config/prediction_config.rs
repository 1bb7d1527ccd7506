//! Prediction pipeline configuration.

use serde::{Deserialize, Serialize};

use super::ensure_unit;
use crate::errors::{EngineError, EngineResult};

/// Configuration for side scoring, pattern detection and score combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Per-factor data-provider timeout. A timed-out factor counts as missing.
    pub factor_timeout_ms: u64,
    /// Normalized value above which a factor is flagged as contributing.
    pub activation_threshold: f64,
    /// Side score used when no factor on that side was observed.
    pub neutral_score: f64,
    /// Optional ceiling on the summed interaction boost. `None` leaves only the final clamp.
    pub max_interaction_boost: Option<f64>,
    /// Final probability at or above which the upset is called "likely".
    pub alert_threshold: f64,
    /// How many factors the key insight names.
    pub max_insight_factors: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            factor_timeout_ms: 250,
            activation_threshold: 0.5,
            neutral_score: 0.5,
            max_interaction_boost: None,
            alert_threshold: 0.5,
            max_insight_factors: 3,
        }
    }
}

impl PredictionConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.factor_timeout_ms == 0 {
            return Err(EngineError::Config(
                "factor_timeout_ms must be positive".to_string(),
            ));
        }
        ensure_unit("activation_threshold", self.activation_threshold)?;
        ensure_unit("neutral_score", self.neutral_score)?;
        ensure_unit("alert_threshold", self.alert_threshold)?;
        if let Some(cap) = self.max_interaction_boost {
            if !cap.is_finite() || cap < 0.0 {
                return Err(EngineError::Config(format!(
                    "max_interaction_boost must be a non-negative number, got {cap}"
                )));
            }
        }
        Ok(())
    }
}
