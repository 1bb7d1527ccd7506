//! End-to-end prediction tests: documented scenarios, degradation paths,
//! request validation and determinism.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::*;
use upset_core::config::EngineConfig;
use upset_core::errors::EngineError;
use upset_core::models::{ConfidenceLevel, FactorDefinition, Normalization, Side};
use upset_engine::providers::MatchOdds;
use upset_engine::{
    FactorCatalog, InMemoryPatternRepository, StaticDataProvider, StaticMarketSignal,
};

// =============================================================================
// SECTION 1: Documented scenarios
// =============================================================================

#[tokio::test]
async fn scenario_1_low_form_does_not_trigger_derby_caution() {
    let engine = derby_engine(0.4, 1.0, 1.15, 0.7);
    let p = engine.predict("arsenal", "man-city", "arsenal", "man-city").await.unwrap();

    assert_close(p.side_a_score, 0.4);
    assert_close(p.side_b_score, 1.0);
    assert_close(p.naive_upset_prob, 0.7);
    assert!(p.triggered_patterns.is_empty());
    assert_eq!(p.interaction_boost, 0.0);
    assert_close(p.final_upset_prob, 0.7);
    assert_eq!(p.favorite_name, "Arsenal");
    assert_eq!(p.fixture, "Arsenal vs Man City");
}

#[tokio::test]
async fn scenario_2_no_data_is_neutral_and_low_confidence() {
    let engine = engine_with(
        FactorCatalog::builtin(),
        StaticDataProvider::new(),
        Arc::new(InMemoryPatternRepository::builtin()),
    );
    let p = engine.predict("arsenal", "man-city", "arsenal", "man-city").await.unwrap();

    assert_eq!(p.side_a_score, 0.5);
    assert_eq!(p.side_b_score, 0.5);
    assert_eq!(p.naive_upset_prob, 0.5);
    assert!(p.triggered_patterns.is_empty());
    assert_eq!(p.final_upset_prob, 0.5);
    assert_eq!(p.confidence_breakdown.data_quality, 0.0);
    assert_eq!(p.confidence_level, ConfidenceLevel::Low);
    assert!(p.side_a_factors.is_empty() && p.side_b_factors.is_empty());
}

#[tokio::test]
async fn scenario_3_multiplicative_pattern_boosts_final() {
    let engine = derby_engine(0.6, 0.6, 1.15, 0.8);
    let p = engine.predict("arsenal", "man-city", "arsenal", "man-city").await.unwrap();

    assert_eq!(p.triggered_patterns.len(), 1);
    assert_eq!(p.triggered_patterns[0].name, "derby_caution");
    assert_close(p.naive_upset_prob, 0.6);
    assert_close(p.interaction_boost, 0.12);
    assert_close(p.final_upset_prob, 0.672);
    assert_close(p.confidence_breakdown.pattern_confidence, 0.8);
    assert!(p.key_insight.contains("derby_caution"));
}

#[tokio::test]
async fn builtin_catalog_normalizes_raw_measurements() {
    // 6 points from 15 is bad form of 0.6; a 90% home non-loss rate.
    let provider = StaticDataProvider::new()
        .with("A05", 6.0)
        .with("A06", false)
        .with("B02", 0.9);
    let engine = engine_with(
        FactorCatalog::builtin(),
        provider,
        Arc::new(InMemoryPatternRepository::builtin()),
    );
    let p = engine.predict("man-city", "arsenal", "man-city", "arsenal").await.unwrap();

    assert_close(p.side_a_factors[0].normalized_value, 0.6);
    // A05 0.6 at weight 1.0, A06 0.0 at weight 0.6.
    assert_close(p.side_a_score, 0.6 / 1.6);
    assert_close(p.side_b_score, 0.9);
    let names: Vec<_> = p.triggered_patterns.iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"derby_caution"));
    // fortress_under_pressure: B02 = 0.9 clears its 0.8 threshold.
    assert!(names.contains(&"fortress_under_pressure"));
}

// =============================================================================
// SECTION 2: Degradation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn slow_provider_times_out_factor_as_missing() {
    let provider = StaticDataProvider::new()
        .with("A05", 0.9)
        .with("B02", 1.0)
        .with_delay("A05", Duration::from_secs(10));
    let engine = engine_with(
        two_factor_catalog(),
        provider,
        Arc::new(InMemoryPatternRepository::with_patterns([derby_caution(1.15, 0.8)])),
    );
    let p = engine.predict("arsenal", "man-city", "arsenal", "man-city").await.unwrap();

    assert_eq!(p.side_a_score, 0.5);
    assert!(p.side_a_factors.is_empty());
    assert_close(p.side_b_score, 1.0);
    assert!(p.triggered_patterns.is_empty());
    assert_close(p.confidence_breakdown.data_quality, 0.5);
}

#[tokio::test(start_paused = true)]
async fn factor_requests_run_concurrently() {
    let catalog = FactorCatalog::new(vec![
        FactorDefinition::new("A01", "Key player injuries", Side::A, Normalization::Identity, 1.0),
        FactorDefinition::new("A04", "Defensive instability", Side::A, Normalization::Identity, 1.0),
        FactorDefinition::new("A05", "Bad form", Side::A, Normalization::Identity, 1.0),
    ])
    .unwrap();
    let mut provider = StaticDataProvider::new();
    for code in ["A01", "A04", "A05"] {
        provider = provider
            .with(code, 0.8)
            .with_delay(code, Duration::from_millis(200));
    }
    let engine = engine_with(catalog, provider, Arc::new(InMemoryPatternRepository::new()));

    let started = tokio::time::Instant::now();
    let p = engine.predict("arsenal", "man-city", "arsenal", "man-city").await.unwrap();

    // Three 200ms lookups under a 250ms timeout: all observed, one wait total.
    assert_eq!(p.side_a_factors.len(), 3);
    assert_eq!(
        p.side_a_factors.iter().map(|o| o.code.as_str()).collect::<Vec<_>>(),
        ["A01", "A04", "A05"]
    );
    assert!(started.elapsed() < Duration::from_millis(250));
}

#[tokio::test]
async fn non_finite_measurement_is_skipped() {
    let engine = derby_engine(f64::NAN, 0.8, 1.15, 0.8);
    let p = engine.predict("arsenal", "man-city", "arsenal", "man-city").await.unwrap();
    assert_eq!(p.side_a_score, 0.5);
    assert_close(p.side_b_score, 0.8);
}

#[tokio::test]
async fn empty_catalog_is_neutral_not_an_error() {
    let engine = engine_with(
        FactorCatalog::empty(),
        StaticDataProvider::new().with("A05", 1.0),
        Arc::new(InMemoryPatternRepository::builtin()),
    );
    let p = engine.predict("arsenal", "man-city", "arsenal", "man-city").await.unwrap();
    assert_eq!(p.final_upset_prob, 0.5);
    assert_eq!(p.confidence_level, ConfidenceLevel::Low);
    // Every builtin pattern references factors outside the empty catalog.
    assert!(p.triggered_patterns.is_empty());
}

#[tokio::test]
async fn repository_outage_predicts_without_patterns() {
    let repo = Arc::new(FlakyRepository::new([derby_caution(1.15, 0.8)]));
    repo.fail_listing.store(true, Ordering::SeqCst);
    let engine = engine_with(
        two_factor_catalog(),
        StaticDataProvider::new().with("A05", 0.9).with("B02", 0.9),
        repo,
    );
    let p = engine.predict("arsenal", "man-city", "arsenal", "man-city").await.unwrap();
    assert!(p.triggered_patterns.is_empty());
    assert_close(p.final_upset_prob, 0.9);
}

#[tokio::test]
async fn overflowing_interaction_boost_still_clamps_final() {
    let mut second = derby_caution(1e308, 1.0);
    second.name = "derby_caution_again".to_string();
    let engine = engine_with(
        two_factor_catalog(),
        StaticDataProvider::new().with("A05", 0.6).with("B02", 0.6),
        Arc::new(InMemoryPatternRepository::with_patterns([
            derby_caution(1e308, 1.0),
            second,
        ])),
    );
    let p = engine.predict("arsenal", "man-city", "arsenal", "man-city").await.unwrap();
    assert_eq!(p.triggered_patterns.len(), 2);
    assert_eq!(p.interaction_boost, f64::MAX);
    assert_eq!(p.final_upset_prob, 1.0);
}

#[tokio::test]
async fn market_signal_feeds_alignment() {
    let engine = derby_engine(0.4, 1.0, 1.15, 0.7).with_market_signal(Arc::new(
        StaticMarketSignal::new().with_odds(
            "arsenal",
            "man-city",
            MatchOdds {
                home: 2.0,
                draw: 4.0,
                away: 4.0,
            },
        ),
    ));
    let p = engine.predict("arsenal", "man-city", "arsenal", "man-city").await.unwrap();
    // Implied upset 0.5, final 0.7.
    assert_close(p.confidence_breakdown.market_alignment, 0.8);
}

// =============================================================================
// SECTION 3: Request validation
// =============================================================================

#[tokio::test]
async fn unknown_team_is_rejected() {
    let engine = derby_engine(0.4, 1.0, 1.15, 0.7);
    let err = engine
        .predict("arsenal", "nowhere-fc", "arsenal", "nowhere-fc")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownTeam { ref team_id } if team_id == "nowhere-fc"));
    assert!(err.is_validation_error());
}

#[tokio::test]
async fn favorite_must_be_a_participant() {
    let engine = derby_engine(0.4, 1.0, 1.15, 0.7);
    let err = engine
        .predict("arsenal", "man-city", "chelsea", "man-city")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidMatchContext { .. }));
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let mut config = EngineConfig::default();
    config.confidence.market_alignment_weight = 0.5;
    let result = upset_engine::PredictionEngine::new(
        config,
        Arc::new(two_factor_catalog()),
        Arc::new(StaticDataProvider::new()),
        Arc::new(InMemoryPatternRepository::new()),
        Arc::new(teams()),
    );
    assert!(matches!(result, Err(EngineError::Config(_))));
}

// =============================================================================
// SECTION 4: Determinism
// =============================================================================

#[tokio::test]
async fn repeated_calls_are_identical() {
    let provider = StaticDataProvider::new()
        .with("A01", 2.0)
        .with("A05", 4.0)
        .with("A07", true)
        .with("B01", 11.0)
        .with("B02", 0.85)
        .with("B06", true);
    let engine = engine_with(
        FactorCatalog::builtin(),
        provider,
        Arc::new(InMemoryPatternRepository::builtin()),
    );

    let first = engine.predict("chelsea", "arsenal", "chelsea", "arsenal").await.unwrap();
    for _ in 0..5 {
        let again = engine.predict("chelsea", "arsenal", "chelsea", "arsenal").await.unwrap();
        for (a, b) in first.numeric_fields().iter().zip(again.numeric_fields()) {
            assert!((a - b).abs() < 1e-9);
        }
        assert_eq!(again.fingerprint, first.fingerprint);
        assert_eq!(again.triggered_patterns, first.triggered_patterns);
        assert_eq!(again.key_insight, first.key_insight);
        assert_ne!(again.prediction_id, first.prediction_id);
    }
}
