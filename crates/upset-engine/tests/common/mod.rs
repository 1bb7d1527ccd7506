//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use upset_core::config::EngineConfig;
use upset_core::errors::{EngineError, EngineResult};
use upset_core::models::{
    FactorDefinition, InteractionType, Normalization, PatternOutcomeDelta, Side,
    ThirdKnowledgePattern,
};
use upset_core::traits::IPatternRepository;
use upset_engine::{
    FactorCatalog, InMemoryPatternRepository, PredictionEngine, StaticDataProvider,
    StaticTeamDirectory,
};

pub type TestEngine<R = InMemoryPatternRepository> = PredictionEngine<StaticDataProvider, R>;

pub fn teams() -> StaticTeamDirectory {
    StaticTeamDirectory::new()
        .with_team("arsenal", "Arsenal")
        .with_team("man-city", "Man City")
        .with_team("chelsea", "Chelsea")
}

/// A05 and B02 only, both already normalized, weight 1.
pub fn two_factor_catalog() -> FactorCatalog {
    FactorCatalog::new(vec![
        FactorDefinition::new("A05", "Bad form", Side::A, Normalization::Identity, 1.0),
        FactorDefinition::new("B02", "Home fortress", Side::B, Normalization::Identity, 1.0),
    ])
    .unwrap()
}

pub fn derby_caution(multiplier: f64, confidence: f64) -> ThirdKnowledgePattern {
    ThirdKnowledgePattern::new(
        "derby_caution",
        "A05",
        "B02",
        InteractionType::Multiplicative,
        multiplier,
        confidence,
    )
}

pub fn engine_with<R: IPatternRepository>(
    catalog: FactorCatalog,
    provider: StaticDataProvider,
    repository: Arc<R>,
) -> PredictionEngine<StaticDataProvider, R> {
    engine_with_config(EngineConfig::default(), catalog, provider, repository)
}

pub fn engine_with_config<R: IPatternRepository>(
    config: EngineConfig,
    catalog: FactorCatalog,
    provider: StaticDataProvider,
    repository: Arc<R>,
) -> PredictionEngine<StaticDataProvider, R> {
    PredictionEngine::new(
        config,
        Arc::new(catalog),
        Arc::new(provider),
        repository,
        Arc::new(teams()),
    )
    .unwrap()
}

/// Two-factor engine with the given measurements and a single derby_caution pattern.
pub fn derby_engine(a05: f64, b02: f64, multiplier: f64, confidence: f64) -> TestEngine {
    engine_with(
        two_factor_catalog(),
        StaticDataProvider::new().with("A05", a05).with("B02", b02),
        Arc::new(InMemoryPatternRepository::with_patterns([derby_caution(
            multiplier, confidence,
        )])),
    )
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Wraps the in-memory repository with injectable failures.
#[derive(Default)]
pub struct FlakyRepository {
    pub inner: InMemoryPatternRepository,
    /// Update calls that fail before one succeeds.
    pub update_failures: AtomicU32,
    pub fail_listing: AtomicBool,
    pub update_calls: AtomicU32,
}

impl FlakyRepository {
    pub fn new(patterns: impl IntoIterator<Item = ThirdKnowledgePattern>) -> Self {
        Self {
            inner: InMemoryPatternRepository::with_patterns(patterns),
            ..Self::default()
        }
    }

    pub fn failing_updates(self, n: u32) -> Self {
        self.update_failures.store(n, Ordering::SeqCst);
        self
    }
}

impl IPatternRepository for FlakyRepository {
    async fn list_active_patterns(&self) -> EngineResult<Vec<ThirdKnowledgePattern>> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(EngineError::Repository("listing unavailable".into()));
        }
        self.inner.list_active_patterns().await
    }

    async fn get_pattern(&self, name: &str) -> EngineResult<Option<ThirdKnowledgePattern>> {
        self.inner.get_pattern(name).await
    }

    async fn upsert_pattern(&self, pattern: ThirdKnowledgePattern) -> EngineResult<()> {
        self.inner.upsert_pattern(pattern).await
    }

    async fn update_pattern(
        &self,
        name: &str,
        delta: &PatternOutcomeDelta,
    ) -> EngineResult<ThirdKnowledgePattern> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.update_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.update_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(EngineError::Repository("write contention".into()));
        }
        self.inner.update_pattern(name, delta).await
    }
}
