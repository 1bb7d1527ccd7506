use std::collections::HashMap;

use upset_core::models::TeamInfo;
use upset_core::traits::ITeamDirectory;

/// Fixed id → display-name table.
#[derive(Debug, Clone, Default)]
pub struct StaticTeamDirectory {
    teams: HashMap<String, TeamInfo>,
}

impl StaticTeamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_team(mut self, id: impl Into<String>, display_name: impl Into<String>) -> Self {
        self.insert(TeamInfo::new(id, display_name));
        self
    }

    pub fn insert(&mut self, team: TeamInfo) {
        self.teams.insert(team.id.clone(), team);
    }
}

impl FromIterator<TeamInfo> for StaticTeamDirectory {
    fn from_iter<I: IntoIterator<Item = TeamInfo>>(iter: I) -> Self {
        let mut directory = Self::new();
        for team in iter {
            directory.insert(team);
        }
        directory
    }
}

impl ITeamDirectory for StaticTeamDirectory {
    fn resolve(&self, team_id: &str) -> Option<TeamInfo> {
        self.teams.get(team_id).cloned()
    }
}
