//! Review session: the object a presentation layer drives
//!
//! Owns the configuration, the latest check and ACH reconciliations and the
//! decision ledger. Re-running a reconciliation replaces the exceptions but
//! never touches recorded decisions, which are keyed by [`ExceptionKey`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::config::ReconConfig;
use crate::ledger::{build_audit_log, DecisionLedger, LedgerSnapshot};
use crate::normalize::{normalize_register, RawTable};
use crate::reconciliation::{reconcile, screen_ach, Reconciliation};
use crate::traits::*;
use crate::types::*;
use crate::utils::MemoryStorage;

/// An exception with its current review state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub exception: PayException,
    pub decision: Decision,
    pub notes: Option<String>,
}

impl ReviewItem {
    /// Review status in the category's vocabulary, e.g. `PAID` or `REJECTED`
    pub fn status(&self) -> &'static str {
        self.decision.label(self.exception.category())
    }
}

/// One reviewer session over a pair of check registers and an ACH file
pub struct ReviewSession<S: DecisionStorage = MemoryStorage> {
    id: Uuid,
    config: ReconConfig,
    ledger: DecisionLedger<S>,
    checks: Option<Reconciliation>,
    ach: Option<Reconciliation>,
}

impl ReviewSession<MemoryStorage> {
    /// Create a session with in-memory decisions and wall-clock timestamps
    pub fn new(config: ReconConfig) -> Self {
        Self::with_storage(config, MemoryStorage::new(), Arc::new(SystemClock))
    }
}

impl<S: DecisionStorage> ReviewSession<S> {
    /// Create a session with a custom storage backend and clock
    pub fn with_storage(config: ReconConfig, storage: S, clock: Arc<dyn Clock>) -> Self {
        let ledger = DecisionLedger::with_clock(storage, clock)
            .with_max_note_length(config.review.max_note_length);
        Self {
            id: Uuid::new_v4(),
            config,
            ledger,
            checks: None,
            ach: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    pub fn ledger(&self) -> &DecisionLedger<S> {
        &self.ledger
    }

    /// Latest check reconciliation, if one has run
    pub fn checks(&self) -> Option<&Reconciliation> {
        self.checks.as_ref()
    }

    /// Latest ACH screening, if one has run
    pub fn ach(&self) -> Option<&Reconciliation> {
        self.ach.as_ref()
    }

    /// Normalize both check registers and reconcile them.
    ///
    /// On error the previous result is kept.
    pub fn run_checks(
        &mut self,
        issued: &RawTable,
        presented: &RawTable,
    ) -> ReconResult<&Reconciliation> {
        let columns = &self.config.checks.columns;
        let issued = normalize_register(issued, columns, RegisterSide::Issued)?;
        let presented = normalize_register(presented, columns, RegisterSide::Presented)?;

        info!(session = %self.id, "running check reconciliation");
        Ok(&*self.checks.insert(reconcile(&issued, &presented)))
    }

    /// Normalize incoming ACH debits and screen them against the configured authorizations
    pub fn run_ach(&mut self, incoming: &RawTable) -> ReconResult<&Reconciliation> {
        let authorizations = self.config.ach_authorizations()?;
        let incoming =
            normalize_register(incoming, &self.config.ach.columns, RegisterSide::Presented)?;

        info!(session = %self.id, "running ACH screening");
        Ok(&*self.ach.insert(screen_ach(&authorizations, &incoming)))
    }

    /// Every exception from the latest runs, checks first, with review state
    pub fn exceptions(&self) -> ReconResult<Vec<ReviewItem>> {
        let snapshot = self.ledger.snapshot()?;
        Ok(self
            .runs()
            .flat_map(|run| run.exceptions.iter())
            .map(|exception| {
                let record = snapshot.get(&exception.key);
                ReviewItem {
                    exception: exception.clone(),
                    decision: record.map(|r| r.decision).unwrap_or_default(),
                    notes: record.and_then(|r| r.notes.clone()),
                }
            })
            .collect())
    }

    /// Exceptions still awaiting a decision
    pub fn pending(&self) -> ReconResult<Vec<ReviewItem>> {
        Ok(self
            .exceptions()?
            .into_iter()
            .filter(|item| item.decision.is_pending())
            .collect())
    }

    /// Record a decision for an exception raised by the latest runs
    pub fn record_decision(
        &self,
        key: &ExceptionKey,
        decision: Decision,
    ) -> ReconResult<DecisionRecord> {
        self.require_known(key)?;
        self.ledger.record_decision(key, decision)
    }

    /// Attach research notes to an exception raised by the latest runs
    pub fn set_notes(&self, key: &ExceptionKey, notes: impl Into<String>) -> ReconResult<()> {
        self.require_known(key)?;
        self.ledger.set_notes(key, notes)
    }

    /// Clear every decision and note. Reconciliation results are kept.
    pub fn reset(&self) -> ReconResult<()> {
        self.ledger.reset()
    }

    pub fn snapshot(&self) -> ReconResult<LedgerSnapshot> {
        self.ledger.snapshot()
    }

    /// Audit trail of decisions made so far
    pub fn audit_log(&self) -> ReconResult<Vec<AuditEntry>> {
        build_audit_log(&self.ledger.snapshot()?)
    }

    fn runs(&self) -> impl Iterator<Item = &Reconciliation> {
        self.checks.iter().chain(self.ach.iter())
    }

    fn require_known(&self, key: &ExceptionKey) -> ReconResult<()> {
        if self.runs().any(|run| run.contains(key)) {
            Ok(())
        } else {
            Err(ReconError::UnknownException(key.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checks(rows: &[[&str; 3]]) -> RawTable {
        rows.iter()
            .fold(RawTable::new(["Check #", "Amount", "Payee"]), |t, r| t.row(*r))
    }

    #[test]
    fn test_decisions_survive_rerun() {
        let mut session = ReviewSession::new(ReconConfig::default());
        let issued = checks(&[["5002", "50.00", "Local Cafe"]]);
        let presented = checks(&[["5002", "500.00", "Local Cafe"]]);

        session.run_checks(&issued, &presented).unwrap();
        let key = ExceptionKey::check("5002");
        session.record_decision(&key, Decision::Denied).unwrap();

        session.run_checks(&issued, &presented).unwrap();
        let items = session.exceptions().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].decision, Decision::Denied);
        assert_eq!(items[0].status(), "RETURNED");
        assert!(session.pending().unwrap().is_empty());
    }

    #[test]
    fn test_review_status_follows_category() {
        let config = ReconConfig::default().with_authorization("54321", "Verizon", "250.00");
        let mut session = ReviewSession::new(config);
        let issued = checks(&[]);
        let presented = checks(&[["3010", "8500.00", "Luxury Rentals LLC"]]);
        session.run_checks(&issued, &presented).unwrap();
        let ach = RawTable::new(["Vendor", "ID", "Amount"]).row(["Verizon", "54321", "280.00"]);
        session.run_ach(&ach).unwrap();

        let statuses: Vec<&str> = session
            .exceptions()
            .unwrap()
            .iter()
            .map(ReviewItem::status)
            .collect();
        assert_eq!(statuses, vec!["PENDING", "PENDING"]);

        session
            .record_decision(&ExceptionKey::check("3010"), Decision::Approved)
            .unwrap();
        session
            .record_decision(&ExceptionKey::ach("54321"), Decision::Denied)
            .unwrap();
        let statuses: Vec<&str> = session
            .exceptions()
            .unwrap()
            .iter()
            .map(ReviewItem::status)
            .collect();
        assert_eq!(statuses, vec!["PAID", "REJECTED"]);
    }

    #[test]
    fn test_unknown_exception_is_rejected() {
        let mut session = ReviewSession::new(ReconConfig::default());
        let table = checks(&[["5001", "1000.00", "Office Depot"]]);
        session.run_checks(&table, &table).unwrap();

        let err = session
            .record_decision(&ExceptionKey::check("5001"), Decision::Approved)
            .unwrap_err();
        assert_eq!(err, ReconError::UnknownException(ExceptionKey::check("5001")));
        assert!(session.set_notes(&ExceptionKey::check("5001"), "x").is_err());
    }

    #[test]
    fn test_failed_run_keeps_previous_result() {
        let mut session = ReviewSession::new(ReconConfig::default());
        let issued = checks(&[]);
        let presented = checks(&[["3010", "8500.00", "Luxury Rentals LLC"]]);
        session.run_checks(&issued, &presented).unwrap();

        let broken = RawTable::new(["Check #", "Payee"]);
        assert!(matches!(
            session.run_checks(&broken, &presented),
            Err(ReconError::Schema { .. })
        ));
        assert_eq!(session.checks().unwrap().exceptions.len(), 1);
    }
}
