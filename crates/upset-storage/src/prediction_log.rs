//! PredictionLog: issued predictions and their settled outcomes.
//!
//! Predictions are stored whole as JSON plus the headline numbers as columns
//! for querying. Reloading returns the JSON body, so every field round-trips.

use std::collections::BTreeSet;
use std::sync::Arc;

use rusqlite::{params, OptionalExtension};
use tracing::warn;
use uuid::Uuid;

use upset_core::errors::StorageResult;
use upset_core::models::{Prediction, PredictionOutcome};
use upset_core::traits::IHistoricalAccuracy;

use crate::errors::{corrupt, storage_err};
use crate::pool::ConnectionPool;

pub struct PredictionLog {
    pool: Arc<ConnectionPool>,
}

impl PredictionLog {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    pub fn store_prediction(&self, p: &Prediction) -> StorageResult<()> {
        let body = serde_json::to_string(p).map_err(|e| corrupt(format!("encode prediction: {e}")))?;
        self.pool.with_writer(|conn| {
            conn.execute(
                "INSERT INTO predictions (prediction_id, created_at, fingerprint, home_team,
                     away_team, favorite, underdog, side_a_score, side_b_score, naive_upset_prob,
                     interaction_boost, final_upset_prob, confidence_score, confidence_level, body)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    p.prediction_id.to_string(),
                    p.created_at.to_rfc3339(),
                    p.fingerprint,
                    p.home_team,
                    p.away_team,
                    p.favorite,
                    p.underdog,
                    p.side_a_score,
                    p.side_b_score,
                    p.naive_upset_prob,
                    p.interaction_boost,
                    p.final_upset_prob,
                    p.confidence_score,
                    p.confidence_level.as_str(),
                    body,
                ],
            )
            .map_err(storage_err)?;
            Ok(())
        })
    }

    pub fn load_prediction(&self, prediction_id: Uuid) -> StorageResult<Option<Prediction>> {
        let body: Option<String> = self.pool.with_reader(|conn| {
            conn.query_row(
                "SELECT body FROM predictions WHERE prediction_id = ?1",
                params![prediction_id.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_err)
        })?;
        body.map(|b| {
            serde_json::from_str(&b)
                .map_err(|e| corrupt(format!("prediction {prediction_id}: {e}")))
        })
        .transpose()
    }

    /// Predictions for a fixture, newest first.
    pub fn predictions_for_fixture(
        &self,
        home_team: &str,
        away_team: &str,
    ) -> StorageResult<Vec<Prediction>> {
        let bodies: Vec<String> = self.pool.with_reader(|conn| {
            let mut stmt = conn
                .prepare_cached(
                    "SELECT body FROM predictions WHERE home_team = ?1 AND away_team = ?2
                     ORDER BY created_at DESC",
                )
                .map_err(storage_err)?;
            let rows = stmt
                .query_map(params![home_team, away_team], |row| row.get(0))
                .map_err(storage_err)?;
            rows.collect::<rusqlite::Result<Vec<String>>>()
                .map_err(storage_err)
        })?;
        bodies
            .iter()
            .map(|b| serde_json::from_str(b).map_err(|e| corrupt(format!("prediction body: {e}"))))
            .collect()
    }

    /// Claim a prediction for outcome recording.
    ///
    /// Returns the patterns an interrupted earlier attempt already updated
    /// (empty on first claim), or `None` when the outcome is recorded or
    /// another recorder holds the claim.
    pub fn claim_outcome(&self, prediction_id: Uuid) -> StorageResult<Option<BTreeSet<String>>> {
        let id = prediction_id.to_string();
        self.pool.with_writer(|conn| {
            let tx = conn.unchecked_transaction().map_err(storage_err)?;
            let existing: Option<(String, String)> = tx
                .query_row(
                    "SELECT state, applied FROM outcome_claims WHERE prediction_id = ?1",
                    params![id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(storage_err)?;

            let applied = match existing {
                None => {
                    tx.execute(
                        "INSERT INTO outcome_claims (prediction_id, state) VALUES (?1, 'in_flight')",
                        params![id],
                    )
                    .map_err(storage_err)?;
                    BTreeSet::new()
                }
                Some((state, applied)) if state == "interrupted" => {
                    tx.execute(
                        "UPDATE outcome_claims SET state = 'in_flight', updated_at = unixepoch()
                         WHERE prediction_id = ?1",
                        params![id],
                    )
                    .map_err(storage_err)?;
                    serde_json::from_str(&applied)
                        .map_err(|e| corrupt(format!("claim {prediction_id} patterns: {e}")))?
                }
                Some(_) => return Ok(None),
            };
            tx.commit().map_err(storage_err)?;
            Ok(Some(applied))
        })
    }

    /// Release a claim after a failed attempt, keeping the patterns it
    /// already updated so a later attempt skips them.
    pub fn interrupt_outcome(
        &self,
        prediction_id: Uuid,
        applied: &BTreeSet<String>,
    ) -> StorageResult<()> {
        let applied = serde_json::to_string(applied)
            .map_err(|e| corrupt(format!("encode applied patterns: {e}")))?;
        self.pool.with_writer(|conn| {
            conn.execute(
                "UPDATE outcome_claims SET state = 'interrupted', applied = ?2, updated_at = unixepoch()
                 WHERE prediction_id = ?1 AND state = 'in_flight'",
                params![prediction_id.to_string(), applied],
            )
            .map_err(storage_err)?;
            Ok(())
        })
    }

    /// Store an outcome and mark its claim completed in one transaction.
    /// Returns `false` if one was already stored for the prediction.
    pub fn store_outcome(&self, outcome: &PredictionOutcome) -> StorageResult<bool> {
        let updated = serde_json::to_string(&outcome.updated_patterns)
            .map_err(|e| corrupt(format!("encode updated patterns: {e}")))?;
        let id = outcome.prediction_ref.to_string();
        self.pool.with_writer(|conn| {
            let tx = conn.unchecked_transaction().map_err(storage_err)?;
            let inserted = tx
                .execute(
                    "INSERT OR IGNORE INTO outcomes (prediction_id, actual_home_score,
                         actual_away_score, was_upset, prediction_correct, probability_error,
                         updated_patterns, recorded_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        id,
                        outcome.actual_home_score,
                        outcome.actual_away_score,
                        outcome.was_upset,
                        outcome.prediction_correct,
                        outcome.probability_error,
                        updated,
                        outcome.recorded_at.to_rfc3339(),
                    ],
                )
                .map_err(storage_err)?;
            tx.execute(
                "INSERT INTO outcome_claims (prediction_id, state, applied)
                 VALUES (?1, 'completed', ?2)
                 ON CONFLICT(prediction_id) DO UPDATE SET
                     state = 'completed', applied = excluded.applied, updated_at = unixepoch()",
                params![id, updated],
            )
            .map_err(storage_err)?;
            tx.commit().map_err(storage_err)?;
            Ok(inserted == 1)
        })
    }

    pub fn load_outcome(&self, prediction_id: Uuid) -> StorageResult<Option<PredictionOutcome>> {
        self.pool.with_reader(|conn| {
            let row = conn
                .query_row(
                    "SELECT actual_home_score, actual_away_score, was_upset, prediction_correct,
                         probability_error, updated_patterns, recorded_at
                     FROM outcomes WHERE prediction_id = ?1",
                    params![prediction_id.to_string()],
                    |row| {
                        Ok((
                            row.get::<_, u32>(0)?,
                            row.get::<_, u32>(1)?,
                            row.get::<_, bool>(2)?,
                            row.get::<_, bool>(3)?,
                            row.get::<_, f64>(4)?,
                            row.get::<_, String>(5)?,
                            row.get::<_, String>(6)?,
                        ))
                    },
                )
                .optional()
                .map_err(storage_err)?;

            let Some((home, away, was_upset, correct, error, updated, recorded_at)) = row else {
                return Ok(None);
            };
            let updated_patterns: Vec<String> = serde_json::from_str(&updated)
                .map_err(|e| corrupt(format!("outcome {prediction_id} patterns: {e}")))?;
            let recorded_at = chrono::DateTime::parse_from_rfc3339(&recorded_at)
                .map_err(|e| corrupt(format!("outcome {prediction_id} timestamp: {e}")))?
                .with_timezone(&chrono::Utc);

            Ok(Some(PredictionOutcome {
                prediction_ref: prediction_id,
                actual_home_score: home,
                actual_away_score: away,
                was_upset,
                prediction_correct: correct,
                probability_error: error,
                updated_patterns,
                recorded_at,
            }))
        })
    }

    /// Share of recorded outcomes that were called correctly. `None` before
    /// any outcome exists.
    pub fn accuracy(&self) -> StorageResult<Option<f64>> {
        self.pool.with_reader(|conn| {
            let (total, correct): (i64, i64) = conn
                .query_row(
                    "SELECT COUNT(*), COALESCE(SUM(prediction_correct), 0) FROM outcomes",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .map_err(storage_err)?;
            Ok((total > 0).then(|| correct as f64 / total as f64))
        })
    }
}

impl IHistoricalAccuracy for PredictionLog {
    fn historical_accuracy(&self) -> Option<f64> {
        self.accuracy().unwrap_or_else(|e| {
            warn!(error = %e, "Historical accuracy unavailable");
            None
        })
    }
}
