//! PersonaLayer: screens the inbound message, drives the state machine, and
//! renders the response text.

use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use upset_core::config::{EngineConfig, PersonaConfig};
use upset_core::errors::EngineResult;
use upset_core::models::{ConfidenceLevel, Prediction};
use upset_core::traits::IInjectionGuard;

use super::mood::{Mood, MoodDisplay};
use super::state_machine::{transition, PersonaEvent, PersonaState};

/// What the caller shows the user.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaResponse {
    pub state: PersonaState,
    pub mood: Mood,
    pub display: MoodDisplay,
    pub text: String,
    /// Absent for defensive responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

pub struct PersonaLayer<G> {
    guard: G,
    config: PersonaConfig,
    alert_threshold: f64,
}

impl<G: IInjectionGuard> PersonaLayer<G> {
    /// Takes the persona section plus `prediction.alert_threshold`, so the
    /// ALERT state and the "Upset likely" insight band always agree.
    pub fn new(guard: G, config: &EngineConfig) -> Self {
        Self {
            guard,
            config: config.persona.clone(),
            alert_threshold: config.prediction.alert_threshold,
        }
    }

    pub fn alert_threshold(&self) -> f64 {
        self.alert_threshold
    }

    /// Answer one request.
    ///
    /// `prediction` is only awaited for cleared messages; a flagged message
    /// gets the configured generic reply and the future is dropped unpolled.
    pub async fn respond<F>(&self, message: &str, prediction: F) -> EngineResult<PersonaResponse>
    where
        F: Future<Output = EngineResult<Prediction>>,
    {
        let state = PersonaState::Neutral;

        if self.guard.is_injection(message) {
            let state = transition(state, &PersonaEvent::InjectionDetected)?;
            warn!(state = %state, "Request flagged as adversarial, sending generic reply");
            let mood = Mood::for_state(state, None);
            return Ok(PersonaResponse {
                state,
                mood,
                display: mood.display(),
                text: self.config.defensive_message.clone(),
                prediction: None,
            });
        }

        let state = transition(state, &PersonaEvent::RequestCleared)?;
        let prediction = prediction.await?;
        let state = transition(
            state,
            &PersonaEvent::PredictionReady {
                final_upset_prob: prediction.final_upset_prob,
                confidence_level: prediction.confidence_level,
                alert_threshold: self.alert_threshold,
            },
        )?;

        let mood = Mood::for_state(state, Some(prediction.confidence_level));
        let text = render(state, &prediction);
        info!(state = %state, mood = ?mood, fixture = %prediction.fixture, "Persona response rendered");

        Ok(PersonaResponse {
            state,
            mood,
            display: mood.display(),
            text,
            prediction: Some(prediction),
        })
    }
}

fn render(state: PersonaState, prediction: &Prediction) -> String {
    let pct = (prediction.final_upset_prob * 100.0).round() as i64;
    let confidence = prediction.confidence_level;
    match state {
        PersonaState::Alert => format!(
            "Upset alert for {}: {} have a {pct}% chance of avoiding defeat against {} ({confidence} confidence). {}",
            prediction.fixture, prediction.underdog_name, prediction.favorite_name, prediction.key_insight
        ),
        PersonaState::Uncertain => format!(
            "Hard to call {}. The data is thin, but the model puts {}'s chances of avoiding defeat at {pct}%. {}",
            prediction.fixture, prediction.underdog_name, prediction.key_insight
        ),
        _ => {
            let lean = if confidence == ConfidenceLevel::High {
                "expect"
            } else {
                "lean towards"
            };
            format!(
                "{}: {lean} {} to take care of business; upset chance {pct}%. {}",
                prediction.fixture, prediction.favorite_name, prediction.key_insight
            )
        }
    }
}
