//! Persona: renders a prediction as commentary, with a bounded,
//! information-free response for adversarial requests.
//!
//! The machine is re-entered fresh for every request; nothing carries over.

pub mod layer;
pub mod mood;
pub mod state_machine;

pub use layer::{PersonaLayer, PersonaResponse};
pub use mood::{Mood, MoodDisplay};
pub use state_machine::{transition, PersonaEvent, PersonaState};
