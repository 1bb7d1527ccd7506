//! # upset-engine
//!
//! Predicts whether an underdog avoids defeat against a favorite.
//!
//! Side A scores the favorite's weaknesses, Side B the underdog's strengths.
//! "Third Knowledge" patterns add a boost when specific factor pairs interact.
//! The combined probability is blended with data quality, track record and
//! market signals into a confidence level, and a persona layer renders the
//! result for users. Settled results flow back through the outcome validator.

pub mod catalog;
pub mod engine;
pub mod persona;
pub mod providers;
pub mod scoring;
pub mod sides;
pub mod third_knowledge;
pub mod validation;

pub use catalog::FactorCatalog;
pub use engine::PredictionEngine;
pub use persona::{PersonaLayer, PersonaResponse, PersonaState};
pub use providers::{
    InMemoryPatternRepository, KeywordInjectionGuard, StaticDataProvider, StaticMarketSignal,
    StaticTeamDirectory,
};
