//! "Third Knowledge": cross-factor interaction patterns not visible from
//! either side alone.

pub mod detector;
pub mod interaction;

pub use detector::{DetectionResult, PatternDetector, SkippedPattern};
pub use interaction::evaluate;
