//! Ledger module containing review decisions and the audit trail

pub mod audit;
pub mod decisions;

pub use audit::*;
pub use decisions::*;
