//! Outcome recording against the prediction log. The claim lives in SQLite,
//! so a logged prediction is consumed once even across separate runs.

use anyhow::Result;
use tracing::{info, warn};

use upset_core::models::{MatchResult, Prediction, PredictionOutcome};
use upset_core::traits::{IDataProvider, IPatternRepository};
use upset_engine::PredictionEngine;
use upset_storage::PredictionLog;

/// Record `result` for a logged prediction.
///
/// `Ok(None)` when the outcome is already recorded or another run holds the
/// claim. A failed attempt releases the claim with the patterns it already
/// updated, so the next run resumes instead of counting them twice.
pub async fn record_logged_outcome<D, R>(
    engine: &PredictionEngine<D, R>,
    log: &PredictionLog,
    prediction: &Prediction,
    result: MatchResult,
) -> Result<Option<PredictionOutcome>>
where
    D: IDataProvider,
    R: IPatternRepository,
{
    let prediction_id = prediction.prediction_id;
    let Some(applied) = log.claim_outcome(prediction_id)? else {
        return Ok(None);
    };
    if !applied.is_empty() {
        info!(%prediction_id, applied = applied.len(), "Resuming interrupted outcome");
    }
    engine.resume_outcome(prediction_id, applied);

    let outcome = match engine.record_outcome(prediction, result).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let applied = engine
                .interrupted_patterns(&prediction_id)
                .unwrap_or_default();
            if let Err(release) = log.interrupt_outcome(prediction_id, &applied) {
                warn!(%prediction_id, error = %release, "Outcome claim not released");
            }
            return Err(e.into());
        }
    };

    if let Err(e) = log.store_outcome(&outcome) {
        // Every pattern is already updated; a rerun only has to store the row.
        let applied = outcome.updated_patterns.iter().cloned().collect();
        if let Err(release) = log.interrupt_outcome(prediction_id, &applied) {
            warn!(%prediction_id, error = %release, "Outcome claim not released");
        }
        return Err(e.into());
    }
    Ok(Some(outcome))
}
