//! FactorWeightLearner: damp the weight of factors that keep backing wrong calls.
//!
//! Formula: adjusted = base × (1 − failure_rate × damping), clamped to
//! `[min_weight, base]`, where failure_rate is the factor's share of all failures.
//! A factor fails when it contributed to the upset call and the prediction
//! was wrong. Learned weights are only produced once `min_sample_size`
//! feedback records exist. Only the most recent `max_feedback_records`
//! records are kept.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use upset_core::config::WeightLearningConfig;
use upset_core::errors::{EngineError, EngineResult, StorageError};
use upset_core::models::Prediction;

use crate::catalog::FactorCatalog;

/// A learned weight table.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnedWeights {
    pub weights: HashMap<String, f64>,
    /// Share of all failures attributed to each factor.
    pub failure_distribution: HashMap<String, f64>,
    pub sample_size: usize,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct FactorWeightLearner {
    config: WeightLearningConfig,
    feedback: Mutex<VecDeque<(String, bool)>>,
}

impl FactorWeightLearner {
    pub fn new(config: WeightLearningConfig) -> Self {
        Self {
            config,
            feedback: Mutex::new(VecDeque::new()),
        }
    }

    /// Add one `(factor_code, was_failure)` record per observed factor.
    pub fn record(&self, prediction: &Prediction, prediction_correct: bool) -> EngineResult<()> {
        self.push(
            prediction
                .observations()
                .map(|obs| (obs.code.clone(), obs.contributed_to_upset && !prediction_correct)),
        )
    }

    fn push(&self, records: impl IntoIterator<Item = (String, bool)>) -> EngineResult<()> {
        let mut feedback = self.feedback.lock().map_err(|e| {
            EngineError::Storage(StorageError::LockPoisoned(format!("weight feedback: {e}")))
        })?;
        for record in records {
            if feedback.len() >= self.config.max_feedback_records {
                feedback.pop_front();
            }
            feedback.push_back(record);
        }
        debug!(records = feedback.len(), "Weight feedback recorded");
        Ok(())
    }

    pub fn sample_size(&self) -> usize {
        self.feedback.lock().map(|f| f.len()).unwrap_or(0)
    }

    /// Learned weights for `catalog`, or `None` while the sample is too small.
    pub fn learned_weights(&self, catalog: &FactorCatalog) -> EngineResult<Option<LearnedWeights>> {
        let mut feedback = self.feedback.lock().map_err(|e| {
            EngineError::Storage(StorageError::LockPoisoned(format!("weight feedback: {e}")))
        })?;
        Ok(compute_weights(&self.config, catalog, feedback.make_contiguous()))
    }
}

/// Pure weight computation over a feedback sample.
pub fn compute_weights(
    config: &WeightLearningConfig,
    catalog: &FactorCatalog,
    feedback: &[(String, bool)],
) -> Option<LearnedWeights> {
    if feedback.len() < config.min_sample_size {
        info!(
            sample_size = feedback.len(),
            min = config.min_sample_size,
            "Insufficient sample size for learned weights, using catalog defaults"
        );
        return None;
    }

    let mut weights: HashMap<String, f64> = catalog
        .definitions()
        .iter()
        .map(|d| (d.code.clone(), d.default_weight))
        .collect();
    let mut failure_distribution = HashMap::new();

    let mut failure_counts: HashMap<&str, u32> = HashMap::new();
    for (code, failed) in feedback {
        if *failed {
            *failure_counts.entry(code.as_str()).or_insert(0) += 1;
        }
    }
    let total_failures: u32 = failure_counts.values().sum();

    if total_failures > 0 {
        for (code, count) in failure_counts {
            let failure_rate = count as f64 / total_failures as f64;
            failure_distribution.insert(code.to_string(), failure_rate);

            // Codes outside the catalog have nothing to damp.
            if let Some(base) = weights.get(code).copied() {
                let adjusted = base * (1.0 - failure_rate * config.damping);
                let floor = config.min_weight.min(base);
                weights.insert(code.to_string(), adjusted.clamp(floor, base));
            }
        }
    }

    Some(LearnedWeights {
        weights,
        failure_distribution,
        sample_size: feedback.len(),
        computed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WeightLearningConfig {
        WeightLearningConfig::default()
    }

    fn sample(failures: &[(&str, usize)], passes: usize) -> Vec<(String, bool)> {
        let mut out = Vec::new();
        for (code, n) in failures {
            for _ in 0..*n {
                out.push((code.to_string(), true));
            }
        }
        for _ in 0..passes {
            out.push(("B07".to_string(), false));
        }
        out
    }

    #[test]
    fn insufficient_sample_returns_none() {
        let catalog = FactorCatalog::builtin();
        assert!(compute_weights(&config(), &catalog, &sample(&[("A05", 3)], 5)).is_none());
    }

    #[test]
    fn all_passes_keep_defaults() {
        let catalog = FactorCatalog::builtin();
        let learned = compute_weights(&config(), &catalog, &sample(&[], 20)).unwrap();
        assert!(learned.failure_distribution.is_empty());
        assert_eq!(learned.weights["A05"], catalog.get("A05").unwrap().default_weight);
    }

    #[test]
    fn failing_factor_is_damped() {
        let catalog = FactorCatalog::builtin();
        let learned =
            compute_weights(&config(), &catalog, &sample(&[("A05", 3), ("B02", 1)], 12)).unwrap();
        // A05: base 1.0, failure rate 0.75, damping 0.5.
        assert!((learned.weights["A05"] - 0.625).abs() < 1e-12);
        // B02: base 0.9, failure rate 0.25.
        assert!((learned.weights["B02"] - 0.9 * 0.875).abs() < 1e-12);
        assert!((learned.failure_distribution["A05"] - 0.75).abs() < 1e-12);
        assert_eq!(learned.sample_size, 16);
    }

    #[test]
    fn weight_never_drops_below_floor() {
        let catalog = FactorCatalog::builtin();
        let cfg = WeightLearningConfig {
            damping: 1.0,
            min_weight: 0.2,
            ..config()
        };
        let learned = compute_weights(&cfg, &catalog, &sample(&[("A05", 20)], 0)).unwrap();
        assert!((learned.weights["A05"] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn learned_table_applies_to_catalog() {
        let catalog = FactorCatalog::builtin();
        let learned = compute_weights(&config(), &catalog, &sample(&[("A01", 4)], 11)).unwrap();
        let tuned = catalog.with_weights(&learned.weights).unwrap();
        assert!(tuned.get("A01").unwrap().default_weight < catalog.get("A01").unwrap().default_weight);
    }

    #[test]
    fn feedback_window_keeps_most_recent_records() {
        let learner = FactorWeightLearner::new(WeightLearningConfig {
            min_sample_size: 4,
            max_feedback_records: 4,
            ..config()
        });
        learner.push(sample(&[("A05", 6)], 0)).unwrap();
        learner.push(sample(&[], 4)).unwrap();
        assert_eq!(learner.sample_size(), 4);

        // The old A05 failures have aged out.
        let learned = learner.learned_weights(&FactorCatalog::builtin()).unwrap().unwrap();
        assert!(learned.failure_distribution.is_empty());
        assert_eq!(learned.sample_size, 4);
    }

    #[test]
    fn window_smaller_than_sample_is_rejected() {
        let cfg = WeightLearningConfig {
            max_feedback_records: 10,
            ..config()
        };
        assert!(matches!(cfg.validate(), Err(EngineError::Config(_))));
    }
}
