//! Reconciliation engine for check positive pay and ACH debit filtering
//!
//! Both entry points are pure: the same inputs always yield the same
//! exceptions in the same order (the order of the presented register).
//! Issued items that were never presented are not flagged.

pub mod ach;
pub mod classifier;
pub mod matcher;

pub use ach::*;
pub use classifier::*;
pub use matcher::*;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::types::*;

/// Counts for one reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Presented items examined
    pub presented: usize,
    /// Presented items that cleared without an exception
    pub cleared: usize,
    /// Exceptions raised
    pub exceptions: usize,
}

/// Result of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub category: ItemCategory,
    pub exceptions: Vec<PayException>,
    pub warnings: Vec<ReconWarning>,
    pub summary: ReconciliationSummary,
}

impl Reconciliation {
    fn new(category: ItemCategory, presented: usize) -> Self {
        Self {
            category,
            exceptions: Vec::new(),
            warnings: Vec::new(),
            summary: ReconciliationSummary {
                presented,
                ..Default::default()
            },
        }
    }

    fn push_outcome(&mut self, item: &LineItem, reason: Option<ExceptionReason>) {
        match reason {
            Some(reason) => {
                debug!(item = %item.identifier, %reason, "exception raised");
                self.exceptions
                    .push(build_exception(self.category, item, reason));
                self.summary.exceptions += 1;
            }
            None => self.summary.cleared += 1,
        }
    }

    fn finish(self) -> Self {
        for warning in &self.warnings {
            warn!(category = ?self.category, "{warning}");
        }
        info!(
            category = ?self.category,
            presented = self.summary.presented,
            cleared = self.summary.cleared,
            exceptions = self.summary.exceptions,
            "reconciliation complete"
        );
        self
    }

    /// Whether an exception with this key was raised
    pub fn contains(&self, key: &ExceptionKey) -> bool {
        self.exceptions.iter().any(|e| &e.key == key)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Reconcile presented checks against the issued register
pub fn reconcile(issued: &Register, presented: &Register) -> Reconciliation {
    let mut run = Reconciliation::new(ItemCategory::Check, presented.len());

    run.warnings.extend(duplicate_identifiers(
        issued.iter().map(|i| i.identifier.as_str()),
        RegisterSide::Issued,
    ));
    run.warnings.extend(duplicate_identifiers(
        presented.iter().map(|i| i.identifier.as_str()),
        RegisterSide::Presented,
    ));

    let index = index_first_occurrence(&issued.items, |i| i.identifier.as_str());
    for item in presented.iter() {
        let result = match_item(item, &index);
        run.push_outcome(item, classify(&result));
    }

    run.finish()
}

/// Screen incoming ACH debits against authorized originators
pub fn screen_ach(authorizations: &[AchAuthorization], incoming: &Register) -> Reconciliation {
    let mut run = Reconciliation::new(ItemCategory::AchDebit, incoming.len());

    run.warnings.extend(duplicate_identifiers(
        authorizations.iter().map(|a| a.company_id.as_str()),
        RegisterSide::Issued,
    ));
    run.warnings.extend(duplicate_identifiers(
        incoming.iter().map(|i| i.identifier.as_str()),
        RegisterSide::Presented,
    ));

    let index = index_first_occurrence(authorizations, |a| a.company_id.as_str());
    for debit in incoming.iter() {
        run.push_outcome(debit, screen_debit(debit, &index).into_reason());
    }

    run.finish()
}
