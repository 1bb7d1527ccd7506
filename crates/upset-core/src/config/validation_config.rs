//! Outcome validation (feedback loop) configuration.

use serde::{Deserialize, Serialize};

use super::ensure_unit;
use crate::errors::{EngineError, EngineResult};

/// Configuration for pattern track-record updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// `final_upset_prob` at or above this counts as an upset call.
    pub decision_boundary: f64,
    /// Fraction of the gap between confidence and success rate closed per outcome.
    pub confidence_learning_rate: f64,
    /// Pattern confidence never drops below this.
    pub confidence_floor: f64,
    /// Triggers required before a pattern is marked validated.
    pub min_samples_for_validation: u32,
    /// Attempts per pattern update before the conflict is escalated.
    pub max_update_attempts: u32,
    pub weight_learning: WeightLearningConfig,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            decision_boundary: 0.5,
            confidence_learning_rate: 0.1,
            confidence_floor: 0.05,
            min_samples_for_validation: 10,
            max_update_attempts: 3,
            weight_learning: WeightLearningConfig::default(),
        }
    }
}

impl ValidationConfig {
    pub fn validate(&self) -> EngineResult<()> {
        ensure_unit("decision_boundary", self.decision_boundary)?;
        ensure_unit("confidence_learning_rate", self.confidence_learning_rate)?;
        ensure_unit("confidence_floor", self.confidence_floor)?;
        if self.max_update_attempts == 0 {
            return Err(EngineError::Config(
                "max_update_attempts must be at least 1".to_string(),
            ));
        }
        self.weight_learning.validate()
    }
}

/// Factor weight damping from observed failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightLearningConfig {
    /// Feedback records required before learned weights replace the catalog defaults.
    pub min_sample_size: usize,
    /// Share of the weight removed from a factor responsible for every failure.
    pub damping: f64,
    /// Lower bound for any learned weight.
    pub min_weight: f64,
    /// Most recent feedback records kept; older ones are evicted first.
    pub max_feedback_records: usize,
}

impl Default for WeightLearningConfig {
    fn default() -> Self {
        Self {
            min_sample_size: 15,
            damping: 0.5,
            min_weight: 0.1,
            max_feedback_records: 4096,
        }
    }
}

impl WeightLearningConfig {
    pub fn validate(&self) -> EngineResult<()> {
        ensure_unit("weight_learning.damping", self.damping)?;
        if !self.min_weight.is_finite() || self.min_weight < 0.0 {
            return Err(EngineError::Config(format!(
                "weight_learning.min_weight must be non-negative, got {}",
                self.min_weight
            )));
        }
        if self.max_feedback_records < self.min_sample_size.max(1) {
            return Err(EngineError::Config(format!(
                "weight_learning.max_feedback_records ({}) must be at least min_sample_size ({})",
                self.max_feedback_records, self.min_sample_size
            )));
        }
        Ok(())
    }
}
