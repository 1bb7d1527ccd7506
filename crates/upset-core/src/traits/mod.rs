mod data_provider;
mod injection_guard;
mod pattern_repository;
mod signals;
mod team_directory;

pub use data_provider::IDataProvider;
pub use injection_guard::IInjectionGuard;
pub use pattern_repository::IPatternRepository;
pub use signals::{IHistoricalAccuracy, IMarketSignal};
pub use team_directory::ITeamDirectory;
