mod factor;
mod match_context;
mod outcome;
mod pattern;
mod prediction;

pub use factor::{FactorDefinition, FactorObservation, Normalization, RawValue, Side};
pub use match_context::{MatchContext, TeamInfo, Venue};
pub use outcome::{MatchResult, PredictionOutcome};
pub use pattern::{InteractionType, PatternOutcomeDelta, ThirdKnowledgePattern, TriggeredPattern};
pub use prediction::{ConfidenceBreakdown, ConfidenceLevel, Prediction};
