//! In-memory decision storage for a single review session

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Default)]
struct Records {
    by_key: HashMap<ExceptionKey, DecisionRecord>,
    /// Keys in first-insertion order
    order: Vec<ExceptionKey>,
    next_sequence: u64,
}

impl Records {
    fn entry(&mut self, key: &ExceptionKey) -> &mut DecisionRecord {
        if !self.by_key.contains_key(key) {
            self.order.push(key.clone());
        }
        self.by_key.entry(key.clone()).or_default()
    }
}

/// In-memory storage. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Arc<RwLock<Records>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ReconResult<RwLockReadGuard<'_, Records>> {
        self.records
            .read()
            .map_err(|_| ReconError::Storage("decision store lock poisoned".to_string()))
    }

    fn write(&self) -> ReconResult<RwLockWriteGuard<'_, Records>> {
        self.records
            .write()
            .map_err(|_| ReconError::Storage("decision store lock poisoned".to_string()))
    }
}

impl DecisionStorage for MemoryStorage {
    fn get_record(&self, key: &ExceptionKey) -> ReconResult<Option<DecisionRecord>> {
        Ok(self.read()?.by_key.get(key).cloned())
    }

    fn try_decide(
        &self,
        key: &ExceptionKey,
        decision: Decision,
        decided_at: NaiveDateTime,
    ) -> ReconResult<DecisionRecord> {
        // Check and update under one write guard.
        let mut records = self.write()?;
        if let Some(existing) = records.by_key.get(key) {
            if !existing.decision.is_pending() {
                return Err(ReconError::AlreadyDecided {
                    key: key.clone(),
                    decision: existing.decision,
                });
            }
        }

        let sequence = records.next_sequence;
        records.next_sequence += 1;

        let record = records.entry(key);
        record.decision = decision;
        record.decided_at = Some(decided_at);
        record.sequence = Some(sequence);
        Ok(record.clone())
    }

    fn save_notes(&self, key: &ExceptionKey, notes: String) -> ReconResult<()> {
        self.write()?.entry(key).notes = Some(notes);
        Ok(())
    }

    fn list_records(&self) -> ReconResult<Vec<(ExceptionKey, DecisionRecord)>> {
        let records = self.read()?;
        Ok(records
            .order
            .iter()
            .filter_map(|key| {
                records
                    .by_key
                    .get(key)
                    .map(|record| (key.clone(), record.clone()))
            })
            .collect())
    }

    fn clear(&self) -> ReconResult<()> {
        *self.write()? = Records::default();
        Ok(())
    }
}
