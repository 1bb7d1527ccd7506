//! "Third Knowledge" interaction patterns and their track record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How two factors interact. Closed set: every variant has exactly one
/// evaluation rule in the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    /// Both factors high.
    Multiplicative,
    /// Either factor above the pattern's threshold.
    Threshold,
    /// One factor high while the other is low.
    Inverse,
}

impl InteractionType {
    pub const ALL: [InteractionType; 3] = [Self::Multiplicative, Self::Threshold, Self::Inverse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Multiplicative => "multiplicative",
            Self::Threshold => "threshold",
            Self::Inverse => "inverse",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiplicative" => Ok(Self::Multiplicative),
            "threshold" => Ok(Self::Threshold),
            "inverse" => Ok(Self::Inverse),
            other => Err(format!("unknown interaction type: {other}")),
        }
    }
}

/// A cross-factor interaction pattern with its observed track record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThirdKnowledgePattern {
    /// Unique.
    pub name: String,
    pub factor_a_code: String,
    pub factor_b_code: String,
    pub interaction_type: InteractionType,
    /// Boost contributed is `(multiplier - 1) × confidence`.
    pub multiplier: f64,
    /// Only read by `Threshold` patterns.
    #[serde(default = "default_threshold")]
    pub threshold_value: f64,
    pub confidence: f64,
    #[serde(default)]
    pub sample_size: u32,
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub validated: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_threshold() -> f64 {
    0.5
}

fn default_active() -> bool {
    true
}

impl ThirdKnowledgePattern {
    pub fn new(
        name: impl Into<String>,
        factor_a_code: impl Into<String>,
        factor_b_code: impl Into<String>,
        interaction_type: InteractionType,
        multiplier: f64,
        confidence: f64,
    ) -> Self {
        Self {
            name: name.into(),
            factor_a_code: factor_a_code.into(),
            factor_b_code: factor_b_code.into(),
            interaction_type,
            multiplier,
            threshold_value: default_threshold(),
            confidence,
            sample_size: 0,
            success_rate: None,
            validated: false,
            active: true,
        }
    }

    pub fn with_threshold(mut self, threshold_value: f64) -> Self {
        self.threshold_value = threshold_value;
        self
    }

    /// Structural checks. A pattern failing these is skipped by the detector.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("pattern name is empty".to_string());
        }
        if self.factor_a_code.is_empty() || self.factor_b_code.is_empty() {
            return Err(format!("{}: missing factor code", self.name));
        }
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return Err(format!("{}: multiplier {} is invalid", self.name, self.multiplier));
        }
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("{}: confidence {} outside [0, 1]", self.name, self.confidence));
        }
        if !self.threshold_value.is_finite() || !(0.0..=1.0).contains(&self.threshold_value) {
            return Err(format!(
                "{}: threshold {} outside [0, 1]",
                self.name, self.threshold_value
            ));
        }
        if let Some(rate) = self.success_rate {
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(format!("{}: success rate {rate} outside [0, 1]", self.name));
            }
        }
        Ok(())
    }

    /// Fold one validated outcome into the track record.
    ///
    /// `success_rate` is the cumulative average of correctness over `sample_size`
    /// triggers; confidence moves toward it by the learning rate, bounded below
    /// by the floor.
    pub fn apply_outcome(&mut self, delta: &PatternOutcomeDelta) {
        let previous = self.sample_size as f64;
        let hit = if delta.prediction_correct { 1.0 } else { 0.0 };
        let rate = match self.success_rate {
            Some(rate) => (rate * previous + hit) / (previous + 1.0),
            None => hit,
        };

        self.sample_size = self.sample_size.saturating_add(1);
        self.success_rate = Some(rate.clamp(0.0, 1.0));

        let moved = self.confidence + delta.confidence_learning_rate * (rate - self.confidence);
        self.confidence = moved.clamp(delta.confidence_floor, 1.0);
        self.validated = self.sample_size >= delta.min_samples_for_validation;
    }

    /// Snapshot for attaching to a prediction.
    pub fn snapshot(&self) -> TriggeredPattern {
        TriggeredPattern {
            name: self.name.clone(),
            interaction_type: self.interaction_type,
            multiplier: self.multiplier,
            confidence: self.confidence,
        }
    }
}

/// Read-only snapshot of a pattern that activated for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredPattern {
    pub name: String,
    pub interaction_type: InteractionType,
    pub multiplier: f64,
    pub confidence: f64,
}

impl TriggeredPattern {
    /// `(multiplier - 1) × confidence`.
    pub fn boost(&self) -> f64 {
        (self.multiplier - 1.0) * self.confidence
    }
}

/// The update applied to one pattern when an outcome is validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternOutcomeDelta {
    pub prediction_correct: bool,
    pub confidence_learning_rate: f64,
    pub confidence_floor: f64,
    pub min_samples_for_validation: u32,
}
