//! OutcomeLedger: each prediction's outcome is consumed exactly once.

use std::collections::BTreeSet;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use upset_core::errors::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum LedgerEntry {
    /// An outcome is being applied right now.
    InFlight,
    /// A previous attempt stopped part-way; these patterns were already updated.
    Interrupted(BTreeSet<String>),
    Completed,
}

#[derive(Debug, Default)]
pub struct OutcomeLedger {
    entries: DashMap<Uuid, LedgerEntry>,
}

impl OutcomeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a prediction for outcome recording.
    ///
    /// The claim carries the patterns already updated by an interrupted
    /// earlier attempt (empty on first claim). Completed or in-flight
    /// predictions are rejected. Dropping the claim without completing it
    /// leaves the prediction resumable.
    pub fn claim(&self, prediction_id: Uuid) -> EngineResult<OutcomeClaim<'_>> {
        let applied = match self.entries.entry(prediction_id) {
            Entry::Vacant(vacant) => {
                vacant.insert(LedgerEntry::InFlight);
                BTreeSet::new()
            }
            Entry::Occupied(mut occupied) => {
                if !matches!(occupied.get(), LedgerEntry::Interrupted(_)) {
                    return Err(EngineError::OutcomeAlreadyRecorded {
                        prediction_id: prediction_id.to_string(),
                    });
                }
                match occupied.insert(LedgerEntry::InFlight) {
                    LedgerEntry::Interrupted(applied) => applied,
                    _ => BTreeSet::new(),
                }
            }
        };
        Ok(OutcomeClaim {
            ledger: self,
            prediction_id,
            applied,
            completed: false,
        })
    }

    /// Seed the applied set of an attempt made elsewhere (another process,
    /// a persisted log). Ignored while the prediction is in flight or done.
    pub fn resume(&self, prediction_id: Uuid, applied: BTreeSet<String>) -> bool {
        match self.entries.entry(prediction_id) {
            Entry::Vacant(vacant) => {
                vacant.insert(LedgerEntry::Interrupted(applied));
                true
            }
            Entry::Occupied(mut occupied) => match occupied.get_mut() {
                LedgerEntry::Interrupted(existing) => {
                    existing.extend(applied);
                    true
                }
                LedgerEntry::InFlight | LedgerEntry::Completed => false,
            },
        }
    }

    /// Patterns applied by an interrupted attempt, if the prediction is interrupted.
    pub fn interrupted(&self, prediction_id: &Uuid) -> Option<BTreeSet<String>> {
        match self.entries.get(prediction_id).as_deref() {
            Some(LedgerEntry::Interrupted(applied)) => Some(applied.clone()),
            _ => None,
        }
    }

    pub fn is_completed(&self, prediction_id: &Uuid) -> bool {
        matches!(
            self.entries.get(prediction_id).as_deref(),
            Some(LedgerEntry::Completed)
        )
    }
}

/// An in-flight outcome. Completing it marks the prediction consumed;
/// dropping it any other way (error, cancellation, timeout) records it as
/// interrupted with the patterns applied so far.
#[derive(Debug)]
pub struct OutcomeClaim<'a> {
    ledger: &'a OutcomeLedger,
    prediction_id: Uuid,
    applied: BTreeSet<String>,
    completed: bool,
}

impl OutcomeClaim<'_> {
    pub fn applied(&self) -> &BTreeSet<String> {
        &self.applied
    }

    pub fn mark_applied(&mut self, name: String) {
        self.applied.insert(name);
    }

    /// Mark the prediction consumed. Returns every pattern applied for it.
    pub fn complete(mut self) -> BTreeSet<String> {
        self.completed = true;
        self.ledger
            .entries
            .insert(self.prediction_id, LedgerEntry::Completed);
        std::mem::take(&mut self.applied)
    }
}

impl Drop for OutcomeClaim<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.ledger.entries.insert(
                self.prediction_id,
                LedgerEntry::Interrupted(std::mem::take(&mut self.applied)),
            );
        }
    }
}
