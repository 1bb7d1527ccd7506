//! Match context: the two teams, venue, and the nominated favorite/underdog.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// A resolved team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: String,
    pub display_name: String,
}

impl TeamInfo {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    Home,
    Away,
}

/// Everything a data provider needs to answer a measurement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchContext {
    pub home: TeamInfo,
    pub away: TeamInfo,
    pub favorite: TeamInfo,
    pub underdog: TeamInfo,
}

impl MatchContext {
    /// Build a context from resolved teams. The favorite and underdog must be
    /// the two distinct participants.
    pub fn new(
        home: TeamInfo,
        away: TeamInfo,
        favorite_id: &str,
        underdog_id: &str,
    ) -> EngineResult<Self> {
        if home.id == away.id {
            return Err(EngineError::InvalidMatchContext {
                reason: format!("{} cannot play itself", home.id),
            });
        }
        if favorite_id == underdog_id {
            return Err(EngineError::InvalidMatchContext {
                reason: format!("{favorite_id} is both favorite and underdog"),
            });
        }

        let pick = |id: &str, role: &str| -> EngineResult<TeamInfo> {
            if id == home.id {
                Ok(home.clone())
            } else if id == away.id {
                Ok(away.clone())
            } else {
                Err(EngineError::InvalidMatchContext {
                    reason: format!(
                        "{role} {id} is not playing in {} vs {}",
                        home.id, away.id
                    ),
                })
            }
        };
        let favorite = pick(favorite_id, "favorite")?;
        let underdog = pick(underdog_id, "underdog")?;

        Ok(Self {
            home,
            away,
            favorite,
            underdog,
        })
    }

    pub fn favorite_venue(&self) -> Venue {
        if self.favorite.id == self.home.id {
            Venue::Home
        } else {
            Venue::Away
        }
    }

    pub fn underdog_venue(&self) -> Venue {
        match self.favorite_venue() {
            Venue::Home => Venue::Away,
            Venue::Away => Venue::Home,
        }
    }

    /// `"Home FC vs Away FC"`.
    pub fn fixture_label(&self) -> String {
        format!("{} vs {}", self.home.display_name, self.away.display_name)
    }
}
