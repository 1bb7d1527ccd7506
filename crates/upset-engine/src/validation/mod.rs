//! Outcome validation: the feedback loop that keeps pattern track records
//! (and optionally factor weights) honest.

pub mod ledger;
pub mod locks;
pub mod validator;
pub mod weight_learner;

pub use ledger::OutcomeLedger;
pub use locks::PatternLocks;
pub use validator::{classify_result, OutcomeValidator};
pub use weight_learner::{FactorWeightLearner, LearnedWeights};
