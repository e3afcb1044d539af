//! Traits for storage abstraction and time sources

use chrono::NaiveDateTime;

use crate::types::*;

/// Storage abstraction for the decision ledger
///
/// Implementations hold per-exception decision state for one review session.
/// All methods take `&self`: a backend shared between reviewers must guard its
/// own state so that `try_decide` stays atomic per key.
pub trait DecisionStorage: Send + Sync {
    /// Get the record for an exception, if any state exists for it
    fn get_record(&self, key: &ExceptionKey) -> ReconResult<Option<DecisionRecord>>;

    /// Atomically move an exception from pending to `decision`.
    ///
    /// Fails with `AlreadyDecided` if a non-pending decision is already stored,
    /// leaving the stored record untouched.
    fn try_decide(
        &self,
        key: &ExceptionKey,
        decision: Decision,
        decided_at: NaiveDateTime,
    ) -> ReconResult<DecisionRecord>;

    /// Overwrite the notes of an exception regardless of its decision
    fn save_notes(&self, key: &ExceptionKey, notes: String) -> ReconResult<()>;

    /// All records in the order they were first created
    fn list_records(&self) -> ReconResult<Vec<(ExceptionKey, DecisionRecord)>>;

    /// Remove every record
    fn clear(&self) -> ReconResult<()>;
}

/// Source of timestamps for decisions
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}

/// Clock pinned to a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
