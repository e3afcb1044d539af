//! # Positive Pay Core
//!
//! Reconciliation engine for check positive pay and ACH debit filtering, with
//! a reviewer decision workflow and an audit trail.
//!
//! ## Features
//!
//! - **Record normalization**: raw rows into exact-decimal line items, failing closed on bad input
//! - **Check reconciliation**: presented checks matched against the issue file by check number
//! - **ACH debit filter**: incoming debits screened against authorized originators and limits
//! - **Decision ledger**: pay/return and accept/reject decisions with research notes
//! - **Audit trail**: decision-time timestamps, stable across renders
//! - **Storage abstraction**: trait-based decision storage with an in-memory backend
//!
//! ## Quick Start
//!
//! ```rust
//! use positive_pay_core::{Decision, ExceptionKey, RawTable, ReconConfig, ReviewSession};
//!
//! let issued = RawTable::new(["Check #", "Amount", "Payee"])
//!     .row(["1010", "120.00", "Vendor Alpha"]);
//! let presented = RawTable::new(["Check #", "Amount", "Payee"])
//!     .row(["1010", "1200.00", "Vendor Alpha"]);
//!
//! let mut session = ReviewSession::new(ReconConfig::default());
//! let run = session.run_checks(&issued, &presented).unwrap();
//! assert_eq!(run.exceptions[0].reason_text(), "Amount Mismatch (Issued: $120.00)");
//!
//! let key = ExceptionKey::check("1010");
//! session.set_notes(&key, "Altered amount, returned").unwrap();
//! session.record_decision(&key, Decision::Denied).unwrap();
//! assert_eq!(session.audit_log().unwrap()[0].action, "RETURNED");
//! ```

pub mod config;
pub mod ledger;
pub mod normalize;
pub mod reconciliation;
pub mod session;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use normalize::*;
pub use reconciliation::*;
pub use session::*;
pub use traits::*;
pub use types::*;
