//! Settled match results and the outcome records derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Final score of a settled match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_score: u32,
    pub away_score: u32,
}

impl MatchResult {
    pub fn new(home_score: u32, away_score: u32) -> Self {
        Self {
            home_score,
            away_score,
        }
    }
}

/// Comparison of a prediction against reality. Consumed once by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub prediction_ref: Uuid,
    pub actual_home_score: u32,
    pub actual_away_score: u32,
    /// The favorite did not win.
    pub was_upset: bool,
    pub prediction_correct: bool,
    /// `|final_upset_prob − indicator(was_upset)|`, in `[0, 1]`.
    pub probability_error: f64,
    /// Patterns whose track record was updated.
    pub updated_patterns: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}
