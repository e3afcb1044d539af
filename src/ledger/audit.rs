//! Audit trail derived from a ledger snapshot

use crate::ledger::LedgerSnapshot;
use crate::types::*;

/// One entry per decided exception, in the order decisions were made.
///
/// Timestamps are the ones captured when each decision was recorded, so
/// building the log twice from the same snapshot gives the same result.
///
/// A decided record without a decision timestamp cannot be placed in the
/// trail and fails the whole build with [`ReconError::Storage`] rather than
/// being left out.
pub fn build_audit_log(snapshot: &LedgerSnapshot) -> ReconResult<Vec<AuditEntry>> {
    let mut decided: Vec<(&ExceptionKey, &DecisionRecord)> = snapshot
        .entries
        .iter()
        .filter(|(_, record)| !record.decision.is_pending())
        .map(|(key, record)| (key, record))
        .collect();

    // Stable sort: records without a sequence keep snapshot order.
    decided.sort_by_key(|(_, record)| record.sequence.unwrap_or(u64::MAX));

    decided
        .into_iter()
        .map(|(key, record)| {
            let timestamp = record.decided_at.ok_or_else(|| {
                ReconError::Storage(format!(
                    "exception {key} is {} but has no decision timestamp",
                    record.decision
                ))
            })?;
            Ok(AuditEntry {
                timestamp,
                exception: key.clone(),
                decision: record.decision,
                action: record.decision.label(key.category).to_string(),
                notes: record.notes.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, minute, 0)
            .unwrap()
    }

    fn decided(
        decision: Decision,
        minute: u32,
        sequence: u64,
        notes: Option<&str>,
    ) -> DecisionRecord {
        DecisionRecord {
            decision,
            notes: notes.map(str::to_string),
            decided_at: Some(at(minute)),
            sequence: Some(sequence),
        }
    }

    #[test]
    fn test_audit_log_orders_by_decision() {
        let snapshot = LedgerSnapshot {
            entries: vec![
                (
                    ExceptionKey::check("9003"),
                    decided(Decision::Denied, 5, 1, Some("Forged signature")),
                ),
                (
                    ExceptionKey::check("9002"),
                    DecisionRecord {
                        notes: Some("still researching".to_string()),
                        ..Default::default()
                    },
                ),
                (
                    ExceptionKey::ach("54321"),
                    decided(Decision::Approved, 2, 0, None),
                ),
            ],
        };

        let log = build_audit_log(&snapshot).unwrap();
        assert_eq!(log.len(), 2);

        assert_eq!(log[0].exception, ExceptionKey::ach("54321"));
        assert_eq!(log[0].action, "ACCEPTED");
        assert_eq!(log[0].timestamp, at(2));
        assert_eq!(log[0].notes_display(), "No notes provided");

        assert_eq!(log[1].exception, ExceptionKey::check("9003"));
        assert_eq!(log[1].action, "RETURNED");
        assert_eq!(log[1].notes_display(), "Forged signature");
    }

    #[test]
    fn test_audit_log_is_stable_across_renders() {
        let snapshot = LedgerSnapshot {
            entries: vec![(
                ExceptionKey::check("1010"),
                decided(Decision::Approved, 7, 0, None),
            )],
        };
        assert_eq!(
            build_audit_log(&snapshot).unwrap(),
            build_audit_log(&snapshot).unwrap()
        );
    }

    #[test]
    fn test_decided_record_without_timestamp_is_an_error() {
        let snapshot = LedgerSnapshot {
            entries: vec![
                (
                    ExceptionKey::check("9001"),
                    decided(Decision::Denied, 1, 0, None),
                ),
                (
                    ExceptionKey::check("9002"),
                    DecisionRecord {
                        decision: Decision::Approved,
                        sequence: Some(1),
                        ..Default::default()
                    },
                ),
            ],
        };

        let err = build_audit_log(&snapshot).unwrap_err();
        assert!(matches!(err, ReconError::Storage(_)));
        assert!(err.to_string().contains("check_9002"));
    }

    #[test]
    fn test_pending_record_without_timestamp_is_skipped() {
        let snapshot = LedgerSnapshot {
            entries: vec![(
                ExceptionKey::check("9002"),
                DecisionRecord {
                    notes: Some("waiting on AP".to_string()),
                    ..Default::default()
                },
            )],
        };
        assert!(build_audit_log(&snapshot).unwrap().is_empty());
    }
}
