//! PatternDetector: evaluates registered patterns against both factor sets.

use std::collections::HashMap;

use tracing::{debug, warn};

use upset_core::config::PredictionConfig;
use upset_core::models::{FactorObservation, ThirdKnowledgePattern, TriggeredPattern};

use super::interaction::evaluate;
use crate::catalog::FactorCatalog;

/// A pattern the detector refused to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPattern {
    pub name: String,
    pub reason: String,
}

/// Outcome of one detection pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectionResult {
    pub triggered: Vec<TriggeredPattern>,
    /// `Σ (multiplier − 1) × confidence`, never negative, capped if configured.
    pub interaction_boost: f64,
    /// Patterns whose factors were both observed.
    pub evaluated: usize,
    pub malformed: Vec<SkippedPattern>,
}

impl DetectionResult {
    /// Mean confidence of triggered patterns, `None` if nothing triggered.
    pub fn mean_confidence(&self) -> Option<f64> {
        if self.triggered.is_empty() {
            return None;
        }
        let total: f64 = self.triggered.iter().map(|p| p.confidence).sum();
        Some(total / self.triggered.len() as f64)
    }
}

#[derive(Debug, Clone)]
pub struct PatternDetector {
    activation_threshold: f64,
    max_boost: Option<f64>,
}

impl PatternDetector {
    pub fn new(config: &PredictionConfig) -> Self {
        Self {
            activation_threshold: config.activation_threshold,
            max_boost: config.max_interaction_boost,
        }
    }

    /// Evaluate every pattern. Malformed patterns are logged and skipped;
    /// patterns whose factors were not observed are skipped silently.
    pub fn detect(
        &self,
        patterns: &[ThirdKnowledgePattern],
        side_a: &[FactorObservation],
        side_b: &[FactorObservation],
        catalog: &FactorCatalog,
    ) -> DetectionResult {
        let observed: HashMap<&str, f64> = side_a
            .iter()
            .chain(side_b.iter())
            .map(|o| (o.code.as_str(), o.normalized_value))
            .collect();

        let mut result = DetectionResult::default();
        let mut raw_boost = 0.0;

        for pattern in patterns {
            if let Err(reason) = self.check(pattern, catalog) {
                warn!(pattern = %pattern.name, reason = %reason, "Skipping malformed pattern");
                result.malformed.push(SkippedPattern {
                    name: pattern.name.clone(),
                    reason,
                });
                continue;
            }

            let (Some(&a), Some(&b)) = (
                observed.get(pattern.factor_a_code.as_str()),
                observed.get(pattern.factor_b_code.as_str()),
            ) else {
                continue;
            };
            result.evaluated += 1;

            if evaluate(
                pattern.interaction_type,
                a,
                b,
                pattern.threshold_value,
                self.activation_threshold,
            ) {
                let snapshot = pattern.snapshot();
                raw_boost = (raw_boost + snapshot.boost()).min(f64::MAX);
                debug!(
                    pattern = %pattern.name,
                    interaction = %pattern.interaction_type,
                    factor_a = a,
                    factor_b = b,
                    "Pattern triggered"
                );
                result.triggered.push(snapshot);
            }
        }

        let mut boost = raw_boost.max(0.0);
        if let Some(cap) = self.max_boost {
            boost = boost.min(cap);
        }
        result.interaction_boost = boost;
        result
    }

    fn check(&self, pattern: &ThirdKnowledgePattern, catalog: &FactorCatalog) -> Result<(), String> {
        pattern.validate()?;
        for code in [&pattern.factor_a_code, &pattern.factor_b_code] {
            if !catalog.contains(code) {
                return Err(format!("references unknown factor {code}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upset_core::models::{InteractionType, Side};

    fn obs(code: &str, value: f64) -> FactorObservation {
        let side = if code.starts_with('A') { Side::A } else { Side::B };
        FactorObservation {
            code: code.to_string(),
            name: code.to_string(),
            side,
            normalized_value: value,
            raw_value: value,
            weight: 1.0,
            contributed_to_upset: value > 0.5,
        }
    }

    fn detector() -> PatternDetector {
        PatternDetector::new(&PredictionConfig::default())
    }

    #[test]
    fn nothing_triggered_means_zero_boost() {
        let patterns = vec![ThirdKnowledgePattern::new(
            "derby_caution",
            "A05",
            "B02",
            InteractionType::Multiplicative,
            1.15,
            0.7,
        )];
        let result = detector().detect(
            &patterns,
            &[obs("A05", 0.4)],
            &[obs("B02", 1.0)],
            &FactorCatalog::builtin(),
        );
        assert!(result.triggered.is_empty());
        assert_eq!(result.interaction_boost, 0.0);
        assert_eq!(result.evaluated, 1);
        assert_eq!(result.mean_confidence(), None);
    }

    #[test]
    fn boosts_accumulate() {
        let patterns = vec![
            ThirdKnowledgePattern::new("p1", "A05", "B02", InteractionType::Multiplicative, 1.15, 0.8),
            ThirdKnowledgePattern::new("p2", "A04", "B03", InteractionType::Multiplicative, 1.5, 0.5),
        ];
        let result = detector().detect(
            &patterns,
            &[obs("A05", 0.9), obs("A04", 0.7)],
            &[obs("B02", 0.9), obs("B03", 0.8)],
            &FactorCatalog::builtin(),
        );
        assert_eq!(result.triggered.len(), 2);
        assert!((result.interaction_boost - (0.12 + 0.25)).abs() < 1e-12);
        assert!((result.mean_confidence().unwrap() - 0.65).abs() < 1e-12);
    }

    #[test]
    fn unknown_factor_is_malformed_not_fatal() {
        let patterns = vec![
            ThirdKnowledgePattern::new("ghost", "Z99", "B02", InteractionType::Threshold, 1.3, 0.9),
            ThirdKnowledgePattern::new("real", "A05", "B02", InteractionType::Threshold, 1.1, 0.5),
        ];
        let result = detector().detect(
            &patterns,
            &[obs("A05", 0.9)],
            &[obs("B02", 0.2)],
            &FactorCatalog::builtin(),
        );
        assert_eq!(result.malformed.len(), 1);
        assert_eq!(result.malformed[0].name, "ghost");
        assert_eq!(result.triggered.len(), 1);
        assert_eq!(result.triggered[0].name, "real");
    }

    #[test]
    fn missing_observation_skips_silently() {
        let patterns = vec![ThirdKnowledgePattern::new(
            "p",
            "A05",
            "B02",
            InteractionType::Threshold,
            1.1,
            0.5,
        )];
        let result = detector().detect(&patterns, &[obs("A05", 0.9)], &[], &FactorCatalog::builtin());
        assert!(result.triggered.is_empty());
        assert!(result.malformed.is_empty());
        assert_eq!(result.evaluated, 0);
    }

    #[test]
    fn dampening_patterns_cannot_make_boost_negative() {
        let patterns = vec![ThirdKnowledgePattern::new(
            "damp",
            "A05",
            "B02",
            InteractionType::Multiplicative,
            0.5,
            1.0,
        )];
        let result = detector().detect(
            &patterns,
            &[obs("A05", 0.9)],
            &[obs("B02", 0.9)],
            &FactorCatalog::builtin(),
        );
        assert_eq!(result.triggered.len(), 1);
        assert_eq!(result.interaction_boost, 0.0);
    }

    #[test]
    fn configured_cap_limits_boost() {
        let config = PredictionConfig {
            max_interaction_boost: Some(0.1),
            ..PredictionConfig::default()
        };
        let patterns = vec![ThirdKnowledgePattern::new(
            "big",
            "A05",
            "B02",
            InteractionType::Multiplicative,
            3.0,
            1.0,
        )];
        let result = PatternDetector::new(&config).detect(
            &patterns,
            &[obs("A05", 0.9)],
            &[obs("B02", 0.9)],
            &FactorCatalog::builtin(),
        );
        assert!((result.interaction_boost - 0.1).abs() < 1e-12);
    }

    #[test]
    fn overflowing_boosts_saturate() {
        let patterns = vec![
            ThirdKnowledgePattern::new("p1", "A05", "B02", InteractionType::Multiplicative, 1e308, 1.0),
            ThirdKnowledgePattern::new("p2", "A04", "B03", InteractionType::Multiplicative, 1e308, 1.0),
        ];
        let result = detector().detect(
            &patterns,
            &[obs("A05", 0.9), obs("A04", 0.9)],
            &[obs("B02", 0.9), obs("B03", 0.9)],
            &FactorCatalog::builtin(),
        );
        assert_eq!(result.triggered.len(), 2);
        assert_eq!(result.interaction_boost, f64::MAX);
    }
}
