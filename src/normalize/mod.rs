//! Record normalization: raw rows into canonical line items
//!
//! Fails closed. A missing column, blank identifier or unparseable amount
//! rejects the whole register instead of skipping the row.

pub mod table;

pub use table::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::*;
use crate::utils::parse_amount;

/// Which header holds each required field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub identifier: String,
    pub amount: String,
    pub payee: String,
}

impl ColumnMapping {
    pub fn new(
        identifier: impl Into<String>,
        amount: impl Into<String>,
        payee: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            amount: amount.into(),
            payee: payee.into(),
        }
    }

    /// Column names used by check registers
    pub fn checks() -> Self {
        Self::new("Check #", "Amount", "Payee")
    }

    /// Column names used by incoming ACH debit files
    pub fn ach_debits() -> Self {
        Self::new("ID", "Amount", "Vendor")
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::checks()
    }
}

/// Normalize a raw table into a register
pub fn normalize_register(
    table: &RawTable,
    mapping: &ColumnMapping,
    side: RegisterSide,
) -> ReconResult<Register> {
    let lookup = |name: &str| table.column_index(name).ok_or_else(|| name.to_string());
    let (identifier_idx, amount_idx, payee_idx) = match (
        lookup(&mapping.identifier),
        lookup(&mapping.amount),
        lookup(&mapping.payee),
    ) {
        (Ok(i), Ok(a), Ok(p)) => (i, a, p),
        (i, a, p) => {
            let missing = [i, a, p].into_iter().filter_map(Result::err).collect();
            return Err(ReconError::Schema { side, missing });
        }
    };

    let mut register = Register::new(side);
    for row in 0..table.rows.len() {
        // Rows are reported 1-based, as a reviewer would count them.
        let row_number = row + 1;

        let identifier = table.cell(row, identifier_idx).trim();
        if identifier.is_empty() {
            return Err(ReconError::BlankIdentifier {
                side,
                row: row_number,
            });
        }

        let raw_amount = table.cell(row, amount_idx);
        let amount = parse_amount(raw_amount).ok_or_else(|| ReconError::MalformedAmount {
            side,
            row: row_number,
            identifier: identifier.to_string(),
            value: raw_amount.to_string(),
        })?;

        register.push(LineItem::new(identifier, amount, table.cell(row, payee_idx)));
    }

    debug!(side = %side, items = register.len(), "normalized register");
    Ok(register)
}
