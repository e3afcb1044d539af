//! Session configuration loaded from TOML
//!
//! ```toml
//! [checks.columns]
//! identifier = "Check #"
//! amount = "Amount"
//! payee = "Payee"
//!
//! [ach.columns]
//! identifier = "ID"
//! amount = "Amount"
//! payee = "Vendor"
//!
//! [[ach.authorizations]]
//! company_id = "54321"
//! vendor = "Verizon"
//! max_amount = "250.00"
//!
//! [review]
//! max_note_length = 4000
//! ```
//!
//! Amounts are strings so they stay exact decimals.

use serde::{Deserialize, Serialize};

use crate::normalize::ColumnMapping;
use crate::reconciliation::AchAuthorization;
use crate::types::*;
use crate::utils::{parse_amount, DEFAULT_MAX_NOTE_LENGTH};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconConfig {
    #[serde(default)]
    pub checks: ChecksConfig,
    #[serde(default)]
    pub ach: AchConfig,
    #[serde(default)]
    pub review: ReviewConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksConfig {
    #[serde(default = "ColumnMapping::checks")]
    pub columns: ColumnMapping,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::checks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchConfig {
    #[serde(default = "ColumnMapping::ach_debits")]
    pub columns: ColumnMapping,
    #[serde(default)]
    pub authorizations: Vec<AchRuleConfig>,
}

impl Default for AchConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::ach_debits(),
            authorizations: Vec::new(),
        }
    }
}

/// Authorization rule as written in config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchRuleConfig {
    pub company_id: String,
    pub vendor: String,
    pub max_amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default = "default_max_note_length")]
    pub max_note_length: usize,
}

fn default_max_note_length() -> usize {
    DEFAULT_MAX_NOTE_LENGTH
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_note_length: DEFAULT_MAX_NOTE_LENGTH,
        }
    }
}

impl ReconConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> ReconResult<Self> {
        let config: ReconConfig =
            toml::from_str(text).map_err(|e| ReconError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every authorization amount parses
    pub fn validate(&self) -> ReconResult<()> {
        self.ach_authorizations().map(|_| ())
    }

    /// Authorization rules with exact decimal limits
    pub fn ach_authorizations(&self) -> ReconResult<Vec<AchAuthorization>> {
        self.ach
            .authorizations
            .iter()
            .map(|rule| {
                let max_amount = parse_amount(&rule.max_amount).ok_or_else(|| {
                    ReconError::Config(format!(
                        "authorization '{}': cannot parse max_amount '{}'",
                        rule.company_id, rule.max_amount
                    ))
                })?;
                Ok(AchAuthorization::new(
                    rule.company_id.clone(),
                    rule.vendor.clone(),
                    max_amount,
                ))
            })
            .collect()
    }

    /// Builder-style authorization append
    pub fn with_authorization(
        mut self,
        company_id: impl Into<String>,
        vendor: impl Into<String>,
        max_amount: impl Into<String>,
    ) -> Self {
        self.ach.authorizations.push(AchRuleConfig {
            company_id: company_id.into(),
            vendor: vendor.into(),
            max_amount: max_amount.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ReconConfig::from_toml("").unwrap();
        assert_eq!(config, ReconConfig::default());
        assert_eq!(config.checks.columns.identifier, "Check #");
        assert_eq!(config.ach.columns.payee, "Vendor");
        assert_eq!(config.review.max_note_length, DEFAULT_MAX_NOTE_LENGTH);
    }

    #[test]
    fn test_parse_full_config() {
        let text = r#"
[checks.columns]
identifier = "Serial"
amount = "Amt"
payee = "Pay To"

[[ach.authorizations]]
company_id = "98765"
vendor = "AWS Cloud"
max_amount = "1500.00"

[[ach.authorizations]]
company_id = "54321"
vendor = "Verizon"
max_amount = "250.00"

[review]
max_note_length = 200
"#;
        let config = ReconConfig::from_toml(text).unwrap();
        assert_eq!(config.checks.columns, ColumnMapping::new("Serial", "Amt", "Pay To"));
        assert_eq!(config.ach.columns, ColumnMapping::ach_debits());
        assert_eq!(config.review.max_note_length, 200);

        let rules = config.ach_authorizations().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].company_id, "54321");
        assert_eq!(rules[1].max_amount, BigDecimal::from(250));
    }

    #[test]
    fn test_bad_max_amount_is_config_error() {
        let text = r#"
[[ach.authorizations]]
company_id = "1"
vendor = "X"
max_amount = "lots"
"#;
        assert!(matches!(
            ReconConfig::from_toml(text),
            Err(ReconError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            ReconConfig::from_toml("[checks"),
            Err(ReconError::Config(_))
        ));
    }
}
