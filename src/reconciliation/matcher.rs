//! Identifier lookup between registers

use std::collections::HashMap;

use crate::types::*;

/// Index identifiers to their first occurrence
pub fn index_first_occurrence<'a, T, F>(items: &'a [T], key: F) -> HashMap<&'a str, &'a T>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        index.entry(key(item)).or_insert(item);
    }
    index
}

/// Report identifiers occurring more than once, in order of first appearance
pub fn duplicate_identifiers<'a>(
    identifiers: impl IntoIterator<Item = &'a str>,
    side: RegisterSide,
) -> Vec<ReconWarning> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for identifier in identifiers {
        let count = counts.entry(identifier).or_insert(0);
        if *count == 0 {
            order.push(identifier);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|identifier| {
            let occurrences = counts[identifier];
            (occurrences > 1).then(|| ReconWarning::DuplicateIdentifier {
                side,
                identifier: identifier.to_string(),
                occurrences,
            })
        })
        .collect()
}

/// Compare one presented item against the issued index.
///
/// Precedence: missing identifier, then amount, then payee.
pub fn match_item(presented: &LineItem, issued: &HashMap<&str, &LineItem>) -> MatchResult {
    let Some(issued_item) = issued.get(presented.identifier.as_str()) else {
        return MatchResult::NoMatch;
    };

    if issued_item.amount != presented.amount {
        return MatchResult::AmountMismatch {
            issued_amount: issued_item.amount.clone(),
        };
    }

    if issued_item.payee_key() != presented.payee_key() {
        return MatchResult::PayeeMismatch {
            issued_payee: issued_item.payee.clone(),
        };
    }

    MatchResult::ExactMatch
}
