//! PredictionEngine: orchestrates side scoring, pattern detection, score
//! combination and confidence, and owns the outcome feedback loop.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use upset_core::config::EngineConfig;
use upset_core::errors::{EngineError, EngineResult};
use upset_core::models::{MatchContext, MatchResult, Prediction, PredictionOutcome, Side};
use upset_core::traits::{
    IDataProvider, IHistoricalAccuracy, IMarketSignal, IPatternRepository, ITeamDirectory,
};

use crate::catalog::FactorCatalog;
use crate::scoring::{
    compose_key_insight, prediction_fingerprint, ConfidenceInputs, ConfidenceScorer, ScoreCombiner,
};
use crate::sides::SideCalculator;
use crate::third_knowledge::PatternDetector;
use crate::validation::{LearnedWeights, OutcomeValidator};

/// Stateless across requests: everything it holds is read-only apart from
/// the pattern repository, which only `record_outcome` writes.
pub struct PredictionEngine<D, R> {
    config: EngineConfig,
    catalog: Arc<FactorCatalog>,
    provider: Arc<D>,
    repository: Arc<R>,
    teams: Arc<dyn ITeamDirectory>,
    historical: Option<Arc<dyn IHistoricalAccuracy>>,
    market: Option<Arc<dyn IMarketSignal>>,
    side_a: SideCalculator,
    side_b: SideCalculator,
    detector: PatternDetector,
    combiner: ScoreCombiner,
    scorer: ConfidenceScorer,
    validator: OutcomeValidator<R>,
}

impl<D, R> PredictionEngine<D, R>
where
    D: IDataProvider,
    R: IPatternRepository,
{
    /// Validates `config` and wires the components.
    pub fn new(
        config: EngineConfig,
        catalog: Arc<FactorCatalog>,
        provider: Arc<D>,
        repository: Arc<R>,
        teams: Arc<dyn ITeamDirectory>,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            side_a: SideCalculator::new(Side::A, &config.prediction),
            side_b: SideCalculator::new(Side::B, &config.prediction),
            detector: PatternDetector::new(&config.prediction),
            combiner: ScoreCombiner::new(),
            scorer: ConfidenceScorer::new(config.confidence.clone()),
            validator: OutcomeValidator::new(Arc::clone(&repository), config.validation.clone()),
            config,
            catalog,
            provider,
            repository,
            teams,
            historical: None,
            market: None,
        })
    }

    pub fn with_historical_accuracy(mut self, source: Arc<dyn IHistoricalAccuracy>) -> Self {
        self.historical = Some(source);
        self
    }

    pub fn with_market_signal(mut self, source: Arc<dyn IMarketSignal>) -> Self {
        self.market = Some(source);
        self
    }

    /// Predict whether `underdog` avoids defeat against `favorite`.
    ///
    /// Fails only when the request itself is invalid; data gaps, timeouts and
    /// bad patterns degrade the prediction instead.
    pub async fn predict(
        &self,
        home_team: &str,
        away_team: &str,
        favorite: &str,
        underdog: &str,
    ) -> EngineResult<Prediction> {
        let ctx = self.resolve_context(home_team, away_team, favorite, underdog)?;
        let catalog = self.catalog.as_ref();
        let provider = self.provider.as_ref();

        let (side_a, side_b, patterns) = tokio::join!(
            self.side_a.calculate(catalog, provider, &ctx),
            self.side_b.calculate(catalog, provider, &ctx),
            self.repository.list_active_patterns(),
        );

        let patterns = patterns.unwrap_or_else(|e| {
            warn!(error = %e, "Pattern repository unavailable, predicting without interactions");
            Vec::new()
        });

        let detection =
            self.detector
                .detect(&patterns, &side_a.observations, &side_b.observations, catalog);
        let combined = self
            .combiner
            .combine(side_a.score, side_b.score, detection.interaction_boost);

        let rating = self.scorer.rate(&ConfidenceInputs {
            observed_factors: side_a.observed() + side_b.observed(),
            active_factors: catalog.active_count(),
            historical_accuracy: self.historical.as_ref().and_then(|h| h.historical_accuracy()),
            pattern_confidence: detection.mean_confidence(),
            market_implied_upset: self
                .market
                .as_ref()
                .and_then(|m| m.implied_upset_probability(&ctx)),
            final_upset_prob: combined.final_upset_prob,
        });

        let observations: Vec<_> = side_a
            .observations
            .iter()
            .chain(side_b.observations.iter())
            .collect();
        let key_insight = compose_key_insight(
            &ctx,
            combined.final_upset_prob,
            self.config.prediction.alert_threshold,
            rating.level,
            &observations,
            &detection.triggered,
            self.config.prediction.max_insight_factors,
        );
        let fingerprint = prediction_fingerprint(&ctx, &observations, &detection.triggered);

        let prediction = Prediction {
            prediction_id: Uuid::new_v4(),
            created_at: Utc::now(),
            fingerprint,
            home_team: ctx.home.id.clone(),
            away_team: ctx.away.id.clone(),
            favorite: ctx.favorite.id.clone(),
            underdog: ctx.underdog.id.clone(),
            fixture: ctx.fixture_label(),
            favorite_name: ctx.favorite.display_name.clone(),
            underdog_name: ctx.underdog.display_name.clone(),
            side_a_score: side_a.score,
            side_b_score: side_b.score,
            naive_upset_prob: combined.naive_upset_prob,
            interaction_boost: combined.interaction_boost,
            final_upset_prob: combined.final_upset_prob,
            triggered_patterns: detection.triggered,
            side_a_factors: side_a.observations,
            side_b_factors: side_b.observations,
            confidence_score: rating.score,
            confidence_level: rating.level,
            confidence_breakdown: rating.breakdown,
            key_insight,
        };

        info!(
            prediction_id = %prediction.prediction_id,
            fixture = %prediction.fixture,
            side_a = format!("{:.3}", prediction.side_a_score),
            side_b = format!("{:.3}", prediction.side_b_score),
            final_upset_prob = format!("{:.3}", prediction.final_upset_prob),
            triggered = prediction.triggered_patterns.len(),
            skipped_patterns = detection.malformed.len(),
            missing_factors = side_a.missing.len() + side_b.missing.len(),
            confidence = %prediction.confidence_level,
            "Prediction complete"
        );

        Ok(prediction)
    }

    /// Feed a settled result back into the pattern track records.
    pub async fn record_outcome(
        &self,
        prediction: &Prediction,
        actual_result: MatchResult,
    ) -> EngineResult<PredictionOutcome> {
        self.validator.record_outcome(prediction, actual_result).await
    }

    /// Seed patterns already updated for `prediction_id` by an earlier,
    /// interrupted attempt recorded outside this engine.
    pub fn resume_outcome(&self, prediction_id: Uuid, applied: BTreeSet<String>) -> bool {
        self.validator.resume(prediction_id, applied)
    }

    /// Patterns already updated for an outcome whose recording was cut short.
    pub fn interrupted_patterns(&self, prediction_id: &Uuid) -> Option<BTreeSet<String>> {
        self.validator.interrupted_patterns(prediction_id)
    }

    /// Reject unknown teams and inconsistent roles before any calculation.
    pub fn resolve_context(
        &self,
        home_team: &str,
        away_team: &str,
        favorite: &str,
        underdog: &str,
    ) -> EngineResult<MatchContext> {
        let resolve = |id: &str| {
            self.teams.resolve(id).ok_or_else(|| EngineError::UnknownTeam {
                team_id: id.to_string(),
            })
        };
        let home = resolve(home_team)?;
        let away = resolve(away_team)?;
        MatchContext::new(home, away, favorite, underdog)
    }

    /// Factor weights learned from recorded outcomes, if enough exist.
    /// Apply them with [`FactorCatalog::with_weights`].
    pub fn learned_weights(&self) -> EngineResult<Option<LearnedWeights>> {
        self.validator.learned_weights(&self.catalog)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &FactorCatalog {
        &self.catalog
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }
}
