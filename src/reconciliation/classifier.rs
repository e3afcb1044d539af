//! Exception classification for check match results

use crate::types::*;

/// Map a match result to an exception reason. Exact matches produce none.
pub fn classify(result: &MatchResult) -> Option<ExceptionReason> {
    match result {
        MatchResult::ExactMatch => None,
        MatchResult::NoMatch => Some(ExceptionReason::NoMatch),
        MatchResult::AmountMismatch { issued_amount } => Some(ExceptionReason::AmountMismatch {
            issued: issued_amount.clone(),
        }),
        MatchResult::PayeeMismatch { issued_payee } => Some(ExceptionReason::PayeeMismatch {
            issued: issued_payee.clone(),
        }),
    }
}

/// Build an exception for a presented item
pub fn build_exception(
    category: ItemCategory,
    presented: &LineItem,
    reason: ExceptionReason,
) -> PayException {
    PayException {
        key: ExceptionKey::new(category, presented.identifier.clone()),
        amount: presented.amount.clone(),
        payee: presented.payee.clone(),
        reason,
    }
}
