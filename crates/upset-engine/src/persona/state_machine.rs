//! Persona state machine.
//!
//! NEUTRAL → ANALYTICAL | DEFENSIVE
//! ANALYTICAL → SUMMARY | ALERT | UNCERTAIN
//! SUMMARY, ALERT, UNCERTAIN and DEFENSIVE are terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

use upset_core::errors::{EngineError, EngineResult};
use upset_core::models::ConfidenceLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonaState {
    Neutral,
    Analytical,
    Summary,
    Alert,
    Uncertain,
    Defensive,
}

impl PersonaState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Summary | Self::Alert | Self::Uncertain | Self::Defensive
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "NEUTRAL",
            Self::Analytical => "ANALYTICAL",
            Self::Summary => "SUMMARY",
            Self::Alert => "ALERT",
            Self::Uncertain => "UNCERTAIN",
            Self::Defensive => "DEFENSIVE",
        }
    }
}

impl fmt::Display for PersonaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PersonaEvent {
    /// The guard cleared the inbound message.
    RequestCleared,
    /// The guard flagged the inbound message as adversarial.
    InjectionDetected,
    /// The prediction is available.
    PredictionReady {
        final_upset_prob: f64,
        confidence_level: ConfidenceLevel,
        alert_threshold: f64,
    },
}

impl PersonaEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::RequestCleared => "request_cleared",
            Self::InjectionDetected => "injection_detected",
            Self::PredictionReady { .. } => "prediction_ready",
        }
    }
}

/// Apply one event. Any move not in the diagram is `InvalidTransition`.
pub fn transition(state: PersonaState, event: &PersonaEvent) -> EngineResult<PersonaState> {
    use PersonaState::*;

    match (state, event) {
        (Neutral, PersonaEvent::RequestCleared) => Ok(Analytical),
        (Neutral, PersonaEvent::InjectionDetected) => Ok(Defensive),
        (
            Analytical,
            PersonaEvent::PredictionReady {
                final_upset_prob,
                confidence_level,
                alert_threshold,
            },
        ) => Ok(if *confidence_level == ConfidenceLevel::Low {
            // Low confidence overrides the probability branch.
            Uncertain
        } else if final_upset_prob >= alert_threshold {
            Alert
        } else {
            Summary
        }),
        (from, event) => Err(EngineError::InvalidTransition {
            from: from.to_string(),
            to: event.name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(prob: f64, level: ConfidenceLevel) -> PersonaEvent {
        PersonaEvent::PredictionReady {
            final_upset_prob: prob,
            confidence_level: level,
            alert_threshold: 0.5,
        }
    }

    #[test]
    fn neutral_branches_on_guard() {
        assert_eq!(
            transition(PersonaState::Neutral, &PersonaEvent::RequestCleared).unwrap(),
            PersonaState::Analytical
        );
        assert_eq!(
            transition(PersonaState::Neutral, &PersonaEvent::InjectionDetected).unwrap(),
            PersonaState::Defensive
        );
    }

    #[test]
    fn analytical_resolves_by_probability() {
        let s = PersonaState::Analytical;
        assert_eq!(transition(s, &ready(0.49, ConfidenceLevel::Medium)).unwrap(), PersonaState::Summary);
        assert_eq!(transition(s, &ready(0.5, ConfidenceLevel::High)).unwrap(), PersonaState::Alert);
    }

    #[test]
    fn low_confidence_overrides_alert() {
        assert_eq!(
            transition(PersonaState::Analytical, &ready(0.95, ConfidenceLevel::Low)).unwrap(),
            PersonaState::Uncertain
        );
    }

    #[test]
    fn terminal_states_reject_events() {
        for state in [
            PersonaState::Summary,
            PersonaState::Alert,
            PersonaState::Uncertain,
            PersonaState::Defensive,
        ] {
            assert!(state.is_terminal());
            assert!(matches!(
                transition(state, &PersonaEvent::RequestCleared),
                Err(EngineError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn skipping_analysis_is_rejected() {
        assert!(transition(PersonaState::Neutral, &ready(0.7, ConfidenceLevel::High)).is_err());
        assert!(transition(PersonaState::Analytical, &PersonaEvent::InjectionDetected).is_err());
    }
}
