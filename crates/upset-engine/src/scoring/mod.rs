//! Score combination, confidence blending, and the human-readable summary.

pub mod combiner;
pub mod confidence;
pub mod fingerprint;
pub mod insight;

pub use combiner::{CombinedScore, ScoreCombiner};
pub use confidence::{ConfidenceInputs, ConfidenceRating, ConfidenceScorer};
pub use fingerprint::prediction_fingerprint;
pub use insight::compose_key_insight;
