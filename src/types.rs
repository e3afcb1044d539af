//! Core types and data structures for positive pay reconciliation

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the reconciliation a register comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterSide {
    /// Items the payer issued or authorized (check register, ACH authorizations)
    Issued,
    /// Items the bank presented for payment
    Presented,
}

impl fmt::Display for RegisterSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issued => write!(f, "issued"),
            Self::Presented => write!(f, "presented"),
        }
    }
}

/// Category of item under review. Each category has its own identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Paper checks, identified by check number
    Check,
    /// ACH debits, identified by the originator's company ID
    AchDebit,
}

impl ItemCategory {
    /// Prefix used when rendering exception keys
    pub fn prefix(&self) -> &'static str {
        match self {
            ItemCategory::Check => "check",
            ItemCategory::AchDebit => "ach",
        }
    }
}

/// One record from either register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Matching key, kept as opaque text (check number, company ID)
    pub identifier: String,
    /// Exact decimal amount
    pub amount: BigDecimal,
    /// Payee as written; compared case-insensitively
    pub payee: String,
}

impl LineItem {
    /// Create a new line item
    pub fn new(
        identifier: impl Into<String>,
        amount: BigDecimal,
        payee: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            amount,
            payee: payee.into(),
        }
    }

    /// Case-folded payee used for comparison only
    pub fn payee_key(&self) -> String {
        self.payee.to_lowercase()
    }
}

/// Ordered collection of line items from one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    pub side: RegisterSide,
    pub items: Vec<LineItem>,
}

impl Register {
    /// Create an empty register
    pub fn new(side: RegisterSide) -> Self {
        Self {
            side,
            items: Vec::new(),
        }
    }

    /// Create a register from already-normalized items
    pub fn from_items(side: RegisterSide, items: Vec<LineItem>) -> Self {
        Self { side, items }
    }

    /// Append an item
    pub fn push(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }
}

/// Stable key for an exception, surviving recomputation of the reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExceptionKey {
    pub category: ItemCategory,
    pub identifier: String,
}

impl ExceptionKey {
    pub fn new(category: ItemCategory, identifier: impl Into<String>) -> Self {
        Self {
            category,
            identifier: identifier.into(),
        }
    }

    /// Key for a check exception
    pub fn check(identifier: impl Into<String>) -> Self {
        Self::new(ItemCategory::Check, identifier)
    }

    /// Key for an ACH debit exception
    pub fn ach(identifier: impl Into<String>) -> Self {
        Self::new(ItemCategory::AchDebit, identifier)
    }
}

impl fmt::Display for ExceptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.category.prefix(), self.identifier)
    }
}

/// Outcome of comparing one presented item against the issued register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchResult {
    /// No issued item carries the identifier
    NoMatch,
    /// Identifier, amount and payee all agree
    ExactMatch,
    /// Amounts differ; carries the issued amount
    AmountMismatch { issued_amount: BigDecimal },
    /// Payees differ; carries the issued payee
    PayeeMismatch { issued_payee: String },
}

/// Why an item was flagged for review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExceptionReason {
    /// Presented check missing from the issue file
    NoMatch,
    /// Presented amount differs from the issued amount
    AmountMismatch { issued: BigDecimal },
    /// Presented payee differs from the issued payee
    PayeeMismatch { issued: String },
    /// ACH debit from an originator with no authorization on file
    UnauthorizedOriginator,
    /// ACH debit above the originator's authorized maximum
    ExceedsLimit { limit: BigDecimal },
}

impl fmt::Display for ExceptionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => write!(f, "Item not in Issue File (Possible Forgery)"),
            Self::AmountMismatch { issued } => {
                write!(f, "Amount Mismatch (Issued: ${})", format_amount(issued))
            }
            Self::PayeeMismatch { issued } => write!(f, "Payee Mismatch (Issued: {issued})"),
            Self::UnauthorizedOriginator => write!(f, "Unauthorized Vendor"),
            Self::ExceedsLimit { limit } => write!(f, "Exceeds Limit (${})", format_amount(limit)),
        }
    }
}

/// A presented item that needs a human decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayException {
    /// Ledger key for this exception
    pub key: ExceptionKey,
    /// Presented amount
    pub amount: BigDecimal,
    /// Presented payee
    pub payee: String,
    /// Classification
    pub reason: ExceptionReason,
}

impl PayException {
    pub fn identifier(&self) -> &str {
        &self.key.identifier
    }

    pub fn category(&self) -> ItemCategory {
        self.key.category
    }

    /// Human-readable reason text
    pub fn reason_text(&self) -> String {
        self.reason.to_string()
    }
}

/// Reviewer decision on an exception
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Awaiting review
    #[default]
    Pending,
    /// Pay the check / accept the debit
    Approved,
    /// Return the check / reject the debit
    Denied,
}

impl Decision {
    pub fn is_pending(&self) -> bool {
        matches!(self, Decision::Pending)
    }

    /// Action label as shown to reviewers for the given category
    pub fn label(&self, category: ItemCategory) -> &'static str {
        match (self, category) {
            (Decision::Pending, _) => "PENDING",
            (Decision::Approved, ItemCategory::Check) => "PAID",
            (Decision::Denied, ItemCategory::Check) => "RETURNED",
            (Decision::Approved, ItemCategory::AchDebit) => "ACCEPTED",
            (Decision::Denied, ItemCategory::AchDebit) => "REJECTED",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Ledger state for one exception
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub decision: Decision,
    /// Free-text research notes
    pub notes: Option<String>,
    /// When the decision was recorded
    pub decided_at: Option<NaiveDateTime>,
    /// Position in the order decisions were made
    pub sequence: Option<u64>,
}

/// One row of the audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub exception: ExceptionKey,
    pub decision: Decision,
    /// Category-specific action label (PAID, RETURNED, ACCEPTED, REJECTED)
    pub action: String,
    pub notes: Option<String>,
}

impl AuditEntry {
    /// Notes as displayed in the audit table
    pub fn notes_display(&self) -> &str {
        self.notes.as_deref().unwrap_or("No notes provided")
    }
}

/// Non-fatal data quality findings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconWarning {
    /// Identifier appears more than once in a register; the first occurrence is used
    DuplicateIdentifier {
        side: RegisterSide,
        identifier: String,
        occurrences: usize,
    },
}

impl fmt::Display for ReconWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateIdentifier {
                side,
                identifier,
                occurrences,
            } => write!(
                f,
                "identifier '{identifier}' appears {occurrences} times in {side} register"
            ),
        }
    }
}

/// Render an amount with at least two decimal places
pub fn format_amount(amount: &BigDecimal) -> String {
    let (_, scale) = amount.as_bigint_and_exponent();
    if scale < 2 {
        amount.with_scale(2).to_string()
    } else {
        amount.to_string()
    }
}

/// Errors that can occur during reconciliation and review
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconError {
    #[error("Schema error: {side} register is missing column(s): {}", .missing.join(", "))]
    Schema {
        side: RegisterSide,
        missing: Vec<String>,
    },
    #[error("Malformed amount in {side} register, row {row} (identifier '{identifier}'): '{value}'")]
    MalformedAmount {
        side: RegisterSide,
        row: usize,
        identifier: String,
        value: String,
    },
    #[error("Blank identifier in {side} register, row {row}")]
    BlankIdentifier { side: RegisterSide, row: usize },
    #[error("Exception {key} has already been decided ({decision})")]
    AlreadyDecided { key: ExceptionKey, decision: Decision },
    #[error("Exception not found: {0}")]
    UnknownException(ExceptionKey),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
