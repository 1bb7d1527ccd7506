//! Prediction: the engine's immutable output for one match.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FactorObservation, TriggeredPattern};

/// Coarse confidence bucket. Wire names are exactly `low`, `medium`, `high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// `< medium → low`, `[medium, high) → medium`, `≥ high → high`.
    pub fn from_score(score: f64, medium_threshold: f64, high_threshold: f64) -> Self {
        if score >= high_threshold {
            Self::High
        } else if score >= medium_threshold {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four signals blended into `confidence_score`, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub data_quality: f64,
    pub historical_accuracy: f64,
    pub pattern_confidence: f64,
    pub market_alignment: f64,
}

/// Result of one `predict` call. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// blake3 digest of the inputs; identical inputs yield identical fingerprints.
    pub fingerprint: String,

    /// Team identifiers as passed to `predict`.
    pub home_team: String,
    pub away_team: String,
    pub favorite: String,
    pub underdog: String,
    /// Display labels resolved by the team directory.
    pub fixture: String,
    pub favorite_name: String,
    pub underdog_name: String,

    pub side_a_score: f64,
    pub side_b_score: f64,
    pub naive_upset_prob: f64,
    pub interaction_boost: f64,
    pub final_upset_prob: f64,

    pub triggered_patterns: Vec<TriggeredPattern>,
    pub side_a_factors: Vec<FactorObservation>,
    pub side_b_factors: Vec<FactorObservation>,

    pub confidence_score: f64,
    pub confidence_level: ConfidenceLevel,
    pub confidence_breakdown: ConfidenceBreakdown,
    pub key_insight: String,
}

impl Prediction {
    /// Whether this prediction calls an upset at the given decision boundary.
    pub fn predicts_upset(&self, decision_boundary: f64) -> bool {
        self.final_upset_prob >= decision_boundary
    }

    /// All observations from both sides, side A first.
    pub fn observations(&self) -> impl Iterator<Item = &FactorObservation> {
        self.side_a_factors.iter().chain(self.side_b_factors.iter())
    }

    pub fn favorite_at_home(&self) -> bool {
        self.favorite == self.home_team
    }

    /// Numeric fields in a fixed order, for tolerance comparisons.
    pub fn numeric_fields(&self) -> [f64; 6] {
        [
            self.side_a_score,
            self.side_b_score,
            self.naive_upset_prob,
            self.interaction_boost,
            self.final_upset_prob,
            self.confidence_score,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(ConfidenceLevel::from_score(0.49, 0.5, 0.7), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.5, 0.5, 0.7), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.69, 0.5, 0.7), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.7, 0.5, 0.7), ConfidenceLevel::High);
    }

    #[test]
    fn level_wire_names() {
        assert_eq!(serde_json::to_string(&ConfidenceLevel::Low).unwrap(), "\"low\"");
        assert_eq!(serde_json::to_string(&ConfidenceLevel::Medium).unwrap(), "\"medium\"");
        assert_eq!(serde_json::to_string(&ConfidenceLevel::High).unwrap(), "\"high\"");
    }
}
