//! Decision ledger: per-exception review state for one session

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::traits::*;
use crate::types::*;
use crate::utils::{validate_notes, validate_recordable, MemoryStorage, DEFAULT_MAX_NOTE_LENGTH};

/// Point-in-time copy of the ledger, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub entries: Vec<(ExceptionKey, DecisionRecord)>,
}

impl LedgerSnapshot {
    pub fn get(&self, key: &ExceptionKey) -> Option<&DecisionRecord> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decision ledger over a storage backend.
///
/// Transitions only go from `Pending` to `Approved` or `Denied`; the only way
/// back is [`DecisionLedger::reset`], which clears everything. Cloning the
/// ledger clones the storage handle, so with [`MemoryStorage`] every clone sees
/// and guards the same decisions.
#[derive(Clone)]
pub struct DecisionLedger<S: DecisionStorage = MemoryStorage> {
    storage: S,
    clock: Arc<dyn Clock>,
    max_note_length: usize,
}

impl DecisionLedger<MemoryStorage> {
    /// Create an in-memory ledger using wall-clock time
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }
}

impl Default for DecisionLedger<MemoryStorage> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S: DecisionStorage> DecisionLedger<S> {
    /// Create a new ledger with the given storage backend
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    /// Create a new ledger with a custom time source
    pub fn with_clock(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            max_note_length: DEFAULT_MAX_NOTE_LENGTH,
        }
    }

    /// Override the maximum accepted note length
    pub fn with_max_note_length(mut self, max_note_length: usize) -> Self {
        self.max_note_length = max_note_length;
        self
    }

    /// Record a reviewer decision. The timestamp is taken now, not at audit time.
    pub fn record_decision(
        &self,
        key: &ExceptionKey,
        decision: Decision,
    ) -> ReconResult<DecisionRecord> {
        validate_recordable(decision)?;

        match self.storage.try_decide(key, decision, self.clock.now()) {
            Ok(record) => {
                info!(exception = %key, %decision, "decision recorded");
                Ok(record)
            }
            Err(err) => {
                if let ReconError::AlreadyDecided { decision: existing, .. } = &err {
                    warn!(
                        exception = %key,
                        existing = %existing,
                        attempted = %decision,
                        "exception already decided"
                    );
                }
                Err(err)
            }
        }
    }

    /// Overwrite research notes; allowed before and after a decision
    pub fn set_notes(&self, key: &ExceptionKey, notes: impl Into<String>) -> ReconResult<()> {
        let notes = notes.into();
        validate_notes(&notes, self.max_note_length)?;
        self.storage.save_notes(key, notes)
    }

    /// Current decision, `Pending` when nothing was recorded
    pub fn decision(&self, key: &ExceptionKey) -> ReconResult<Decision> {
        Ok(self
            .storage
            .get_record(key)?
            .map(|record| record.decision)
            .unwrap_or_default())
    }

    /// Current notes, if any
    pub fn notes(&self, key: &ExceptionKey) -> ReconResult<Option<String>> {
        Ok(self.storage.get_record(key)?.and_then(|record| record.notes))
    }

    /// Clear all decisions and notes
    pub fn reset(&self) -> ReconResult<()> {
        self.storage.clear()?;
        info!("decision ledger reset");
        Ok(())
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ReconResult<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            entries: self.storage.list_records()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ledger() -> DecisionLedger {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        DecisionLedger::with_clock(MemoryStorage::new(), Arc::new(FixedClock(at)))
    }

    #[test]
    fn test_unknown_key_is_pending() {
        let ledger = ledger();
        assert_eq!(
            ledger.decision(&ExceptionKey::check("1")).unwrap(),
            Decision::Pending
        );
        assert!(ledger.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_second_decision_is_rejected() {
        let ledger = ledger();
        let key = ExceptionKey::check("5002");

        ledger.record_decision(&key, Decision::Denied).unwrap();
        let err = ledger.record_decision(&key, Decision::Approved).unwrap_err();
        assert!(matches!(
            err,
            ReconError::AlreadyDecided {
                decision: Decision::Denied,
                ..
            }
        ));
        assert_eq!(ledger.decision(&key).unwrap(), Decision::Denied);
    }

    #[test]
    fn test_recording_pending_is_invalid() {
        let ledger = ledger();
        let err = ledger
            .record_decision(&ExceptionKey::check("1"), Decision::Pending)
            .unwrap_err();
        assert!(matches!(err, ReconError::Validation(_)));
        assert!(ledger.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_notes_before_and_after_decision() {
        let ledger = ledger();
        let key = ExceptionKey::check("9002");

        ledger.set_notes(&key, "Calling AP").unwrap();
        assert_eq!(ledger.decision(&key).unwrap(), Decision::Pending);

        ledger.record_decision(&key, Decision::Approved).unwrap();
        ledger
            .set_notes(&key, "Per email from AP, check was reissued")
            .unwrap();

        assert_eq!(
            ledger.notes(&key).unwrap().as_deref(),
            Some("Per email from AP, check was reissued")
        );
        assert_eq!(ledger.decision(&key).unwrap(), Decision::Approved);
    }

    #[test]
    fn test_notes_length_limit() {
        let ledger = ledger().with_max_note_length(5);
        let key = ExceptionKey::check("1");
        assert!(ledger.set_notes(&key, "too long").is_err());
        assert_eq!(ledger.notes(&key).unwrap(), None);
    }

    #[test]
    fn test_reset_allows_new_decision() {
        let ledger = ledger();
        let key = ExceptionKey::ach("54321");

        ledger.record_decision(&key, Decision::Denied).unwrap();
        ledger.set_notes(&key, "Verizon over limit").unwrap();
        ledger.reset().unwrap();

        assert!(ledger.snapshot().unwrap().is_empty());
        assert_eq!(ledger.notes(&key).unwrap(), None);
        ledger.record_decision(&key, Decision::Approved).unwrap();
        assert_eq!(ledger.decision(&key).unwrap(), Decision::Approved);
    }

    #[test]
    fn test_concurrent_reviewers_get_one_decision() {
        let ledger = ledger();
        let key = ExceptionKey::check("3010");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ledger = ledger.clone();
                let key = key.clone();
                std::thread::spawn(move || {
                    let decision = if i % 2 == 0 {
                        Decision::Approved
                    } else {
                        Decision::Denied
                    };
                    ledger.record_decision(&key, decision).is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);

        let snapshot = ledger.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(&key).unwrap().sequence, Some(0));
    }
}
