//! Mood: closed set of presentation moods with a total mapping to display
//! attributes.

use serde::{Deserialize, Serialize};

use upset_core::models::ConfidenceLevel;

use super::state_machine::PersonaState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Composed,
    Assured,
    Alarmed,
    Wary,
    Guarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodDisplay {
    pub label: &'static str,
    pub emoji: &'static str,
    pub tone: &'static str,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Self::Composed,
        Self::Assured,
        Self::Alarmed,
        Self::Wary,
        Self::Guarded,
    ];

    /// Mood for a terminal state. Non-terminal states read as composed.
    pub fn for_state(state: PersonaState, level: Option<ConfidenceLevel>) -> Self {
        match state {
            PersonaState::Summary if level == Some(ConfidenceLevel::High) => Self::Assured,
            PersonaState::Summary => Self::Composed,
            PersonaState::Alert => Self::Alarmed,
            PersonaState::Uncertain => Self::Wary,
            PersonaState::Defensive => Self::Guarded,
            PersonaState::Neutral | PersonaState::Analytical => Self::Composed,
        }
    }

    pub fn display(&self) -> MoodDisplay {
        match self {
            Self::Composed => MoodDisplay {
                label: "Composed",
                emoji: "🙂",
                tone: "measured",
            },
            Self::Assured => MoodDisplay {
                label: "Assured",
                emoji: "😎",
                tone: "confident",
            },
            Self::Alarmed => MoodDisplay {
                label: "Alarmed",
                emoji: "🚨",
                tone: "urgent",
            },
            Self::Wary => MoodDisplay {
                label: "Wary",
                emoji: "🤔",
                tone: "hedged",
            },
            Self::Guarded => MoodDisplay {
                label: "Guarded",
                emoji: "🛡️",
                tone: "neutral",
            },
        }
    }
}
