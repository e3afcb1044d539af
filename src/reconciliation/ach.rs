//! ACH debit filter: incoming debits screened against authorized originators

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// An originator allowed to debit the account, up to `max_amount` per item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchAuthorization {
    pub company_id: String,
    pub vendor: String,
    pub max_amount: BigDecimal,
}

impl AchAuthorization {
    pub fn new(
        company_id: impl Into<String>,
        vendor: impl Into<String>,
        max_amount: BigDecimal,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            vendor: vendor.into(),
            max_amount,
        }
    }
}

/// Outcome of screening one ACH debit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchScreenResult {
    Authorized,
    Unauthorized,
    ExceedsLimit { limit: BigDecimal },
}

impl AchScreenResult {
    pub fn into_reason(self) -> Option<ExceptionReason> {
        match self {
            AchScreenResult::Authorized => None,
            AchScreenResult::Unauthorized => Some(ExceptionReason::UnauthorizedOriginator),
            AchScreenResult::ExceedsLimit { limit } => {
                Some(ExceptionReason::ExceedsLimit { limit })
            }
        }
    }
}

/// Screen one debit. A debit equal to the limit is authorized.
pub fn screen_debit(
    debit: &LineItem,
    authorizations: &HashMap<&str, &AchAuthorization>,
) -> AchScreenResult {
    match authorizations.get(debit.identifier.as_str()) {
        None => AchScreenResult::Unauthorized,
        Some(rule) if debit.amount > rule.max_amount => AchScreenResult::ExceedsLimit {
            limit: rule.max_amount.clone(),
        },
        Some(_) => AchScreenResult::Authorized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::matcher::index_first_occurrence;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn rules() -> Vec<AchAuthorization> {
        vec![
            AchAuthorization::new("98765", "AWS Cloud", dec("1500.00")),
            AchAuthorization::new("54321", "Verizon", dec("250.00")),
        ]
    }

    #[test]
    fn test_screen_debit() {
        let rules = rules();
        let index = index_first_occurrence(&rules, |r| r.company_id.as_str());

        let over = LineItem::new("54321", dec("280.00"), "Verizon");
        assert_eq!(
            screen_debit(&over, &index),
            AchScreenResult::ExceedsLimit {
                limit: dec("250.00")
            }
        );

        let at_limit = LineItem::new("54321", dec("250"), "Verizon");
        assert_eq!(screen_debit(&at_limit, &index), AchScreenResult::Authorized);

        let unknown = LineItem::new("99999", dec("500.00"), "Suspicious Inc");
        assert_eq!(screen_debit(&unknown, &index), AchScreenResult::Unauthorized);
    }

    #[test]
    fn test_exceeds_limit_reason_text() {
        let reason = AchScreenResult::ExceedsLimit {
            limit: dec("250.00"),
        }
        .into_reason()
        .unwrap();
        assert_eq!(reason.to_string(), "Exceeds Limit ($250.00)");
        assert_eq!(AchScreenResult::Authorized.into_reason(), None);
    }
}
