//! In-process collaborator implementations: fixture-backed data, a static
//! team directory, an in-memory pattern repository, the keyword injection
//! guard, and odds-derived market signals.

pub mod keyword_guard;
pub mod market;
pub mod memory_repository;
pub mod static_data;
pub mod team_directory;

pub use keyword_guard::KeywordInjectionGuard;
pub use market::{implied_probabilities, ImpliedProbabilities, MatchOdds, StaticMarketSignal};
pub use memory_repository::InMemoryPatternRepository;
pub use static_data::StaticDataProvider;
pub use team_directory::StaticTeamDirectory;
