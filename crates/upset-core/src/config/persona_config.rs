//! Persona (presentation) configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// Configuration for the persona response layer. The ALERT/SUMMARY split
/// uses `prediction.alert_threshold`, the same cut the key insight uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Generic reply for requests flagged as adversarial. Must not mention internals.
    pub defensive_message: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            defensive_message: "I can only help with match previews. Ask me about an upcoming fixture."
                .to_string(),
        }
    }
}

impl PersonaConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.defensive_message.trim().is_empty() {
            return Err(EngineError::Config(
                "persona.defensive_message must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
