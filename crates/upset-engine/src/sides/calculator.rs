//! SideCalculator: raw measurements → bounded weakness/strength score.
//!
//! Weighted average of normalized factor values. Missing or timed-out
//! measurements are skipped (excluded from both sums); a side with nothing
//! observed scores the neutral 0.5.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use upset_core::config::PredictionConfig;
use upset_core::models::{FactorDefinition, FactorObservation, MatchContext, RawValue, Side};
use upset_core::traits::IDataProvider;

use crate::catalog::FactorCatalog;

/// Score for one side plus the evidence behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct SideScore {
    pub side: Side,
    /// Always in `[0, 1]`.
    pub score: f64,
    pub observations: Vec<FactorObservation>,
    /// Active definitions requested from the provider.
    pub requested: usize,
    /// Codes with no usable measurement (absent, non-finite, or timed out).
    pub missing: Vec<String>,
    /// Subset of `missing` that hit the provider timeout.
    pub timed_out: Vec<String>,
}

impl SideScore {
    pub fn observed(&self) -> usize {
        self.observations.len()
    }
}

/// Computes one side's score. Two instances (A and B) run independently.
#[derive(Debug, Clone)]
pub struct SideCalculator {
    side: Side,
    activation_threshold: f64,
    neutral_score: f64,
    timeout: Duration,
}

impl SideCalculator {
    pub fn new(side: Side, config: &PredictionConfig) -> Self {
        Self {
            side,
            activation_threshold: config.activation_threshold,
            neutral_score: config.neutral_score,
            timeout: Duration::from_millis(config.factor_timeout_ms),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Request every active factor for this side and score the results.
    pub async fn calculate<P: IDataProvider>(
        &self,
        catalog: &FactorCatalog,
        provider: &P,
        ctx: &MatchContext,
    ) -> SideScore {
        let mut observations = Vec::new();
        let mut missing = Vec::new();
        let mut timed_out = Vec::new();

        // All requests are in flight at once, each under its own timeout, so
        // a side never waits longer than one timeout. Results keep catalog order.
        let defs: Vec<&FactorDefinition> = catalog.active(self.side).collect();
        let requested = defs.len();
        let measurements = join_all(defs.iter().map(|def| {
            tokio::time::timeout(self.timeout, provider.get_measurement(&def.code, ctx))
        }))
        .await;

        for (def, measurement) in defs.into_iter().zip(measurements) {
            match measurement {
                Ok(Some(raw)) => match self.observe(def, raw) {
                    Some(obs) => observations.push(obs),
                    None => {
                        debug!(factor = %def.code, "Measurement not usable, skipping factor");
                        missing.push(def.code.clone());
                    }
                },
                Ok(None) => {
                    debug!(factor = %def.code, "No measurement available, skipping factor");
                    missing.push(def.code.clone());
                }
                Err(_) => {
                    warn!(
                        factor = %def.code,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Data provider timed out, treating factor as missing"
                    );
                    missing.push(def.code.clone());
                    timed_out.push(def.code.clone());
                }
            }
        }

        let score = self.score_observations(&observations);
        debug!(
            side = %self.side,
            score = format!("{:.3}", score),
            observed = observations.len(),
            requested,
            "Side score computed"
        );

        SideScore {
            side: self.side,
            score,
            observations,
            requested,
            missing,
            timed_out,
        }
    }

    /// Normalize one measurement. `None` when the raw value is unusable.
    pub fn observe(&self, def: &FactorDefinition, raw: RawValue) -> Option<FactorObservation> {
        let normalized_value = def.normalize(raw)?;
        Some(FactorObservation {
            code: def.code.clone(),
            name: def.name.clone(),
            side: def.side,
            normalized_value,
            raw_value: raw.as_f64(),
            weight: def.default_weight,
            contributed_to_upset: normalized_value > self.activation_threshold,
        })
    }

    /// `weighted_sum / weight_total`, or the neutral score when nothing carries weight.
    pub fn score_observations(&self, observations: &[FactorObservation]) -> f64 {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for obs in observations {
            if !obs.weight.is_finite() || obs.weight <= 0.0 || !obs.normalized_value.is_finite() {
                continue;
            }
            weighted_sum += obs.normalized_value * obs.weight;
            weight_total += obs.weight;
        }

        if weight_total > 0.0 {
            (weighted_sum / weight_total).clamp(0.0, 1.0)
        } else {
            self.neutral_score
        }
    }
}
