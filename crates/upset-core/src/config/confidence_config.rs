//! Confidence blending configuration.

use serde::{Deserialize, Serialize};

use super::ensure_unit;
use crate::errors::{EngineError, EngineResult};

/// Weights and thresholds for the four-signal confidence blend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub data_quality_weight: f64,
    pub historical_accuracy_weight: f64,
    pub pattern_confidence_weight: f64,
    pub market_alignment_weight: f64,
    /// Value substituted for a signal nobody could supply.
    pub neutral_signal: f64,
    /// Scores at or above this are `medium`.
    pub medium_threshold: f64,
    /// Scores at or above this are `high`.
    pub high_threshold: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            data_quality_weight: 0.25,
            historical_accuracy_weight: 0.25,
            pattern_confidence_weight: 0.30,
            market_alignment_weight: 0.20,
            neutral_signal: 0.5,
            medium_threshold: 0.5,
            high_threshold: 0.7,
        }
    }
}

impl ConfidenceConfig {
    pub fn weight_sum(&self) -> f64 {
        self.data_quality_weight
            + self.historical_accuracy_weight
            + self.pattern_confidence_weight
            + self.market_alignment_weight
    }

    pub fn validate(&self) -> EngineResult<()> {
        ensure_unit("data_quality_weight", self.data_quality_weight)?;
        ensure_unit("historical_accuracy_weight", self.historical_accuracy_weight)?;
        ensure_unit("pattern_confidence_weight", self.pattern_confidence_weight)?;
        ensure_unit("market_alignment_weight", self.market_alignment_weight)?;
        ensure_unit("neutral_signal", self.neutral_signal)?;
        ensure_unit("medium_threshold", self.medium_threshold)?;
        ensure_unit("high_threshold", self.high_threshold)?;

        let sum = self.weight_sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(EngineError::Config(format!(
                "confidence weights must sum to 1.0, got {sum}"
            )));
        }
        if self.medium_threshold > self.high_threshold {
            return Err(EngineError::Config(format!(
                "medium_threshold ({}) exceeds high_threshold ({})",
                self.medium_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}
