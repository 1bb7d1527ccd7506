//! OutcomeValidator: compares a settled result with the prediction issued for
//! it and folds the outcome into every triggered pattern's track record.
//!
//! Writes are serialized per pattern name. A failed update is retried when
//! `RecoveryAction` says so; exhausted retries surface as
//! `PatternUpdateConflict` and leave the outcome resumable, as does a
//! cancelled `record_outcome` future.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use upset_core::config::ValidationConfig;
use upset_core::errors::{EngineError, EngineResult, RecoveryAction};
use upset_core::models::{
    MatchResult, PatternOutcomeDelta, Prediction, PredictionOutcome, ThirdKnowledgePattern,
};
use upset_core::traits::IPatternRepository;

use super::ledger::OutcomeLedger;
use super::locks::PatternLocks;
use super::weight_learner::{FactorWeightLearner, LearnedWeights};
use crate::catalog::FactorCatalog;

/// Base delay between update attempts; multiplied by the attempt number.
const RETRY_BACKOFF_MS: u64 = 10;

/// `(was_upset, prediction_correct, probability_error)` for a settled match.
/// A draw counts as an upset: the favorite did not win.
pub fn classify_result(
    prediction: &Prediction,
    result: &MatchResult,
    decision_boundary: f64,
) -> (bool, bool, f64) {
    let (favorite_goals, underdog_goals) = if prediction.favorite_at_home() {
        (result.home_score, result.away_score)
    } else {
        (result.away_score, result.home_score)
    };
    let was_upset = favorite_goals <= underdog_goals;
    let prediction_correct = prediction.predicts_upset(decision_boundary) == was_upset;
    let indicator = if was_upset { 1.0 } else { 0.0 };
    let probability_error = (prediction.final_upset_prob - indicator).abs().clamp(0.0, 1.0);
    (was_upset, prediction_correct, probability_error)
}

pub struct OutcomeValidator<R> {
    repository: Arc<R>,
    config: ValidationConfig,
    ledger: OutcomeLedger,
    locks: PatternLocks,
    learner: FactorWeightLearner,
}

impl<R: IPatternRepository> OutcomeValidator<R> {
    pub fn new(repository: Arc<R>, config: ValidationConfig) -> Self {
        Self {
            repository,
            learner: FactorWeightLearner::new(config.weight_learning.clone()),
            config,
            ledger: OutcomeLedger::new(),
            locks: PatternLocks::new(),
        }
    }

    /// Record the result of a settled match. Each prediction is consumed once.
    pub async fn record_outcome(
        &self,
        prediction: &Prediction,
        result: MatchResult,
    ) -> EngineResult<PredictionOutcome> {
        let prediction_id = prediction.prediction_id;
        let mut claim = self.ledger.claim(prediction_id)?;

        let (was_upset, prediction_correct, probability_error) =
            classify_result(prediction, &result, self.config.decision_boundary);

        let delta = PatternOutcomeDelta {
            prediction_correct,
            confidence_learning_rate: self.config.confidence_learning_rate,
            confidence_floor: self.config.confidence_floor,
            min_samples_for_validation: self.config.min_samples_for_validation,
        };

        // A pattern listed twice is still one trigger.
        let names: BTreeSet<&str> = prediction
            .triggered_patterns
            .iter()
            .map(|p| p.name.as_str())
            .collect();

        for name in names {
            if claim.applied().contains(name) {
                continue;
            }
            match self.apply_with_retry(name, &delta).await {
                Ok(Some(updated)) => {
                    info!(
                        pattern = %updated.name,
                        sample_size = updated.sample_size,
                        success_rate = format!("{:.3}", updated.success_rate.unwrap_or(0.0)),
                        confidence = format!("{:.3}", updated.confidence),
                        validated = updated.validated,
                        "Pattern track record updated"
                    );
                    claim.mark_applied(updated.name);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        prediction_id = %prediction_id,
                        pattern = name,
                        error = %e,
                        applied = claim.applied().len(),
                        "Outcome recording interrupted, can be resumed"
                    );
                    return Err(e);
                }
            }
        }

        if let Err(e) = self.learner.record(prediction, prediction_correct) {
            warn!(error = %e, "Weight feedback not recorded");
        }
        let applied = claim.complete();

        info!(
            prediction_id = %prediction_id,
            was_upset,
            prediction_correct,
            probability_error = format!("{:.3}", probability_error),
            updated_patterns = applied.len(),
            "Outcome recorded"
        );

        Ok(PredictionOutcome {
            prediction_ref: prediction_id,
            actual_home_score: result.home_score,
            actual_away_score: result.away_score,
            was_upset,
            prediction_correct,
            probability_error,
            updated_patterns: applied.into_iter().collect(),
            recorded_at: Utc::now(),
        })
    }

    /// Update one pattern under its lock. `Ok(None)` when the pattern no
    /// longer exists in the repository.
    async fn apply_with_retry(
        &self,
        name: &str,
        delta: &PatternOutcomeDelta,
    ) -> EngineResult<Option<ThirdKnowledgePattern>> {
        let _guard = self.locks.acquire(name).await;
        let max_attempts = self.config.max_update_attempts.max(1);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let err = match self.repository.update_pattern(name, delta).await {
                Ok(updated) => return Ok(Some(updated)),
                Err(EngineError::PatternNotFound { .. }) => {
                    warn!(pattern = name, "Triggered pattern no longer in repository, skipping");
                    return Ok(None);
                }
                Err(e) => e,
            };

            let action = RecoveryAction::for_error(&err);
            if !action.is_retryable() {
                return Err(err);
            }
            if attempt >= max_attempts {
                return Err(EngineError::PatternUpdateConflict {
                    name: name.to_string(),
                    attempts: attempt,
                });
            }
            warn!(
                pattern = name,
                attempt,
                max_attempts,
                error = %err,
                action = %action,
                "Pattern update failed, retrying"
            );
            tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64)).await;
        }
    }

    /// Carry over the patterns an earlier attempt (possibly in another
    /// process) already updated, so resuming does not count them twice.
    pub fn resume(&self, prediction_id: Uuid, applied: BTreeSet<String>) -> bool {
        self.ledger.resume(prediction_id, applied)
    }

    /// Patterns already updated for an outcome whose recording was cut short.
    pub fn interrupted_patterns(&self, prediction_id: &Uuid) -> Option<BTreeSet<String>> {
        self.ledger.interrupted(prediction_id)
    }

    pub fn is_recorded(&self, prediction: &Prediction) -> bool {
        self.ledger.is_completed(&prediction.prediction_id)
    }

    /// Learned factor weights, once enough outcomes have been recorded.
    pub fn learned_weights(&self, catalog: &FactorCatalog) -> EngineResult<Option<LearnedWeights>> {
        self.learner.learned_weights(catalog)
    }

    pub fn feedback_sample_size(&self) -> usize {
        self.learner.sample_size()
    }
}
