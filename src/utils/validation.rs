//! Validation utilities

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::types::*;

/// Default upper bound for research notes
pub const DEFAULT_MAX_NOTE_LENGTH: usize = 4000;

/// Check that amount text is a plain decimal: optional sign, optional `$`,
/// digits with at most one decimal point.
pub fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    let digits = unsigned.strip_prefix('$').unwrap_or(unsigned);

    let mut seen_digit = false;
    let mut seen_point = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Parse amount text into an exact decimal, or `None` if it is not a plain decimal
pub fn parse_amount(text: &str) -> Option<BigDecimal> {
    let trimmed = text.trim();
    if !is_plain_decimal(trimmed) {
        return None;
    }
    let negative = trimmed.starts_with('-');
    let digits: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let amount = BigDecimal::from_str(&digits).ok()?;
    Some(if negative { -amount } else { amount })
}

/// Validate research notes against a maximum length
pub fn validate_notes(notes: &str, max_len: usize) -> ReconResult<()> {
    let len = notes.chars().count();
    if len > max_len {
        return Err(ReconError::Validation(format!(
            "Notes cannot exceed {max_len} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate that a decision can be recorded (only terminal decisions are)
pub fn validate_recordable(decision: Decision) -> ReconResult<()> {
    if decision.is_pending() {
        return Err(ReconError::Validation(
            "Only Approved or Denied can be recorded".to_string(),
        ));
    }
    Ok(())
}
