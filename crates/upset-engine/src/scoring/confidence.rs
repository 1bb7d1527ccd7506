//! ConfidenceScorer: four-signal confidence blend.
//!
//! confidence = 0.25 × data_quality + 0.25 × historical_accuracy
//!            + 0.30 × pattern_confidence + 0.20 × market_alignment

use upset_core::config::ConfidenceConfig;
use upset_core::models::{ConfidenceBreakdown, ConfidenceLevel};

/// Raw inputs; `None` means the signal's source was unavailable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInputs {
    /// Factors observed across both sides.
    pub observed_factors: usize,
    /// Active factor definitions across both sides.
    pub active_factors: usize,
    pub historical_accuracy: Option<f64>,
    /// Mean confidence of triggered patterns.
    pub pattern_confidence: Option<f64>,
    /// Market-implied upset probability.
    pub market_implied_upset: Option<f64>,
    pub final_upset_prob: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceRating {
    pub score: f64,
    pub level: ConfidenceLevel,
    pub breakdown: ConfidenceBreakdown,
}

#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    config: ConfidenceConfig,
}

impl ConfidenceScorer {
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    pub fn rate(&self, inputs: &ConfidenceInputs) -> ConfidenceRating {
        let breakdown = self.breakdown(inputs);
        let c = &self.config;
        let score = (c.data_quality_weight * breakdown.data_quality
            + c.historical_accuracy_weight * breakdown.historical_accuracy
            + c.pattern_confidence_weight * breakdown.pattern_confidence
            + c.market_alignment_weight * breakdown.market_alignment)
            .clamp(0.0, 1.0);
        ConfidenceRating {
            score,
            level: ConfidenceLevel::from_score(score, c.medium_threshold, c.high_threshold),
            breakdown,
        }
    }

    /// Resolve each signal into `[0, 1]`, substituting the neutral value for
    /// missing or non-finite inputs.
    pub fn breakdown(&self, inputs: &ConfidenceInputs) -> ConfidenceBreakdown {
        let neutral = self.config.neutral_signal;
        let unit = |v: Option<f64>| match v {
            Some(x) if x.is_finite() => x.clamp(0.0, 1.0),
            _ => neutral,
        };

        // An empty catalog has no data to speak of.
        let data_quality = if inputs.active_factors == 0 {
            0.0
        } else {
            (inputs.observed_factors as f64 / inputs.active_factors as f64).clamp(0.0, 1.0)
        };

        let market_alignment = match inputs.market_implied_upset {
            Some(implied) if implied.is_finite() => {
                1.0 - (inputs.final_upset_prob - implied.clamp(0.0, 1.0)).abs()
            }
            _ => neutral,
        };

        ConfidenceBreakdown {
            data_quality,
            historical_accuracy: unit(inputs.historical_accuracy),
            pattern_confidence: unit(inputs.pattern_confidence),
            market_alignment: market_alignment.clamp(0.0, 1.0),
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(ConfidenceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ConfidenceInputs {
        ConfidenceInputs {
            observed_factors: 0,
            active_factors: 16,
            historical_accuracy: None,
            pattern_confidence: None,
            market_implied_upset: None,
            final_upset_prob: 0.5,
        }
    }

    #[test]
    fn default_weights_sum_to_one() {
        assert!((ConfidenceConfig::default().weight_sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_data_is_low() {
        let rating = ConfidenceScorer::default().rate(&inputs());
        assert!((rating.score - 0.375).abs() < 1e-12);
        assert_eq!(rating.level, ConfidenceLevel::Low);
    }

    #[test]
    fn full_agreement_is_high() {
        let rating = ConfidenceScorer::default().rate(&ConfidenceInputs {
            observed_factors: 16,
            historical_accuracy: Some(0.8),
            pattern_confidence: Some(0.9),
            market_implied_upset: Some(0.5),
            ..inputs()
        });
        // 0.25 + 0.2 + 0.27 + 0.2
        assert!((rating.score - 0.92).abs() < 1e-12);
        assert_eq!(rating.level, ConfidenceLevel::High);
    }

    #[test]
    fn market_disagreement_lowers_alignment() {
        let b = ConfidenceScorer::default().breakdown(&ConfidenceInputs {
            market_implied_upset: Some(0.2),
            final_upset_prob: 0.7,
            ..inputs()
        });
        assert!((b.market_alignment - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_catalog_has_zero_data_quality() {
        let b = ConfidenceScorer::default().breakdown(&ConfidenceInputs {
            active_factors: 0,
            ..inputs()
        });
        assert_eq!(b.data_quality, 0.0);
    }

    #[test]
    fn out_of_range_signals_are_clamped() {
        let rating = ConfidenceScorer::default().rate(&ConfidenceInputs {
            historical_accuracy: Some(4.0),
            pattern_confidence: Some(f64::NAN),
            ..inputs()
        });
        assert_eq!(rating.breakdown.historical_accuracy, 1.0);
        assert_eq!(rating.breakdown.pattern_confidence, 0.5);
        assert!((0.0..=1.0).contains(&rating.score));
    }
}
