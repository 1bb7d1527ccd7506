use std::sync::Arc;

use crate::models::TeamInfo;

/// Resolves team identifiers to display metadata.
pub trait ITeamDirectory: Send + Sync {
    fn resolve(&self, team_id: &str) -> Option<TeamInfo>;
}

impl<T: ITeamDirectory + ?Sized> ITeamDirectory for Arc<T> {
    fn resolve(&self, team_id: &str) -> Option<TeamInfo> {
        (**self).resolve(team_id)
    }
}
