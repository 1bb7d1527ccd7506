//! JSON fixture files: one match with its raw measurements and optional odds.

use std::collections::HashMap;

use serde::Deserialize;

use upset_core::models::{RawValue, TeamInfo};
use upset_engine::providers::MatchOdds;
use upset_engine::{StaticDataProvider, StaticMarketSignal, StaticTeamDirectory};

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureTeam {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub home: FixtureTeam,
    pub away: FixtureTeam,
    pub favorite: String,
    pub underdog: String,
    #[serde(default)]
    pub measurements: HashMap<String, RawValue>,
    #[serde(default)]
    pub odds: Option<MatchOdds>,
}

impl Fixture {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn teams(&self) -> StaticTeamDirectory {
        [&self.home, &self.away]
            .into_iter()
            .map(|t| TeamInfo::new(t.id.clone(), t.name.clone()))
            .collect()
    }

    pub fn provider(&self) -> StaticDataProvider {
        StaticDataProvider::from_measurements(self.measurements.clone())
    }

    pub fn market(&self) -> Option<StaticMarketSignal> {
        self.odds
            .map(|odds| StaticMarketSignal::new().with_odds(&self.home.id, &self.away.id, odds))
    }
}
