//! `unique` constraint checks

use crate::item::Item;
use crate::normalize::{canonical_text, ComparisonKey};
use crate::report::{ConstraintScope, Violation};
use crate::types::Scope;
use curate_selector::Selector;
use std::collections::{HashMap, HashSet};

/// Check a `unique` constraint over the items of its type
///
/// A scalar key with type scope is checked across the whole type. Any
/// other combination, including a wildcard key configured with type scope,
/// is checked within each item.
pub(crate) fn check_unique(
    scope: &ConstraintScope<'_>,
    key: &str,
    unique_scope: Scope,
    case_sensitive: bool,
    items: &[Item],
) -> Vec<Violation> {
    let selector = match Selector::parse(key) {
        Ok(selector) => selector,
        Err(e) => {
            return vec![Violation::for_constraint(
                scope,
                format!("invalid selector {:?}: {}", key, e),
            )]
        }
    };

    if selector.is_scalar() && unique_scope == Scope::Type {
        check_type_scope(scope, &selector, case_sensitive, items)
    } else {
        check_item_scope(scope, &selector, case_sensitive, items)
    }
}

fn check_type_scope(
    scope: &ConstraintScope<'_>,
    selector: &Selector,
    case_sensitive: bool,
    items: &[Item],
) -> Vec<Violation> {
    // The full index must exist before any duplicate is confirmed
    let keyed: Vec<(&Item, ComparisonKey, String)> = items
        .iter()
        .filter_map(|item| {
            let value = selector.evaluate(&item.data).into_iter().next()?;
            Some((
                item,
                ComparisonKey::new(value, case_sensitive),
                canonical_text(value),
            ))
        })
        .collect();

    let mut occurrences: HashMap<&ComparisonKey, usize> = HashMap::new();
    for (_, key, _) in &keyed {
        *occurrences.entry(key).or_default() += 1;
    }

    keyed
        .iter()
        .filter(|(_, key, _)| occurrences.get(key).copied().unwrap_or(0) > 1)
        .map(|(item, _, display)| {
            Violation::for_item(
                scope,
                item,
                format!("duplicate value {:?} for key {}", display, selector),
            )
        })
        .collect()
}

fn check_item_scope(
    scope: &ConstraintScope<'_>,
    selector: &Selector,
    case_sensitive: bool,
    items: &[Item],
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for item in items {
        let mut seen = HashSet::new();
        for value in selector.evaluate(&item.data) {
            if !seen.insert(ComparisonKey::new(value, case_sensitive)) {
                violations.push(Violation::for_item(
                    scope,
                    item,
                    format!(
                        "duplicate value {:?} for key {} within item",
                        canonical_text(value),
                        selector
                    ),
                ));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConstraintType;
    use serde_json::json;

    const SCOPE: ConstraintScope<'static> = ConstraintScope {
        type_name: "team",
        constraint_id: "unique-id",
        constraint_type: ConstraintType::Unique,
    };

    #[test]
    fn test_type_scope_no_duplicates() {
        let items = vec![
            Item::new("team", "a.yaml", json!({"id": "alpha"})),
            Item::new("team", "b.yaml", json!({"id": "beta"})),
        ];
        assert!(check_unique(&SCOPE, "$.id", Scope::Type, true, &items).is_empty());
    }

    #[test]
    fn test_type_scope_flags_every_occurrence() {
        let items = vec![
            Item::new("team", "a.yaml", json!({"id": "alpha"})),
            Item::new("team", "b.yaml", json!({"id": "alpha"})),
            Item::new("team", "c.yaml", json!({"id": "gamma"})),
            Item::new("team", "d.yaml", json!({"id": "alpha"})),
        ];
        let violations = check_unique(&SCOPE, "$.id", Scope::Type, true, &items);
        let files: Vec<_> = violations.iter().filter_map(|v| v.file_path.as_deref()).collect();
        assert_eq!(files, vec!["a.yaml", "b.yaml", "d.yaml"]);
        assert!(violations.iter().all(|v| v.message.contains("\"alpha\"")));
    }

    #[test]
    fn test_type_scope_skips_missing_values() {
        let items = vec![
            Item::new("team", "a.yaml", json!({"name": "x"})),
            Item::new("team", "b.yaml", json!({"name": "y"})),
        ];
        assert!(check_unique(&SCOPE, "$.id", Scope::Type, true, &items).is_empty());
    }

    #[test]
    fn test_type_scope_case_insensitive_keeps_original_text() {
        let items = vec![
            Item::new("team", "a.yaml", json!({"id": "Alpha"})),
            Item::new("team", "b.yaml", json!({"id": "ALPHA"})),
        ];
        let violations = check_unique(&SCOPE, "$.id", Scope::Type, false, &items);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].message.contains("\"Alpha\""));
        assert!(violations[1].message.contains("\"ALPHA\""));

        assert!(check_unique(&SCOPE, "$.id", Scope::Type, true, &items).is_empty());
    }

    #[test]
    fn test_type_scope_nested_key() {
        let items = vec![
            Item::new("team", "a.yaml", json!({"meta": {"code": 7}})),
            Item::new("team", "b.yaml", json!({"meta": {"code": 7.0}})),
        ];
        assert_eq!(
            check_unique(&SCOPE, "$.meta.code", Scope::Type, true, &items).len(),
            2
        );
    }

    #[test]
    fn test_type_scope_rows_keep_index() {
        let items = vec![
            Item::new("team", "teams.csv", json!({"id": "a"})).with_row(0),
            Item::new("team", "teams.csv", json!({"id": "a"})).with_row(3),
        ];
        let violations = check_unique(&SCOPE, "$.id", Scope::Type, true, &items);
        let rows: Vec<_> = violations.iter().map(|v| v.row_index).collect();
        assert_eq!(rows, vec![Some(0), Some(3)]);
    }

    #[test]
    fn test_wildcard_key_checks_within_item() {
        let items = vec![Item::new("team", "a.yaml", json!({"tags": ["a", "b", "a"]}))];
        let violations = check_unique(&SCOPE, "$.tags[*]", Scope::Type, true, &items);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("\"a\""));
        assert!(violations[0].message.contains("within item"));
    }

    #[test]
    fn test_wildcard_values_across_items_are_independent() {
        let items = vec![
            Item::new("team", "a.yaml", json!({"tags": ["a", "b"]})),
            Item::new("team", "b.yaml", json!({"tags": ["a", "b"]})),
        ];
        assert!(check_unique(&SCOPE, "$.tags[*]", Scope::Type, true, &items).is_empty());
    }

    #[test]
    fn test_item_scope_flags_each_repeat() {
        let items = vec![Item::new("team", "a.yaml", json!({"tags": ["x", "X", "x", "x"]}))];
        assert_eq!(
            check_unique(&SCOPE, "$.tags[*]", Scope::Item, true, &items).len(),
            2
        );
        assert_eq!(
            check_unique(&SCOPE, "$.tags[*]", Scope::Item, false, &items).len(),
            3
        );
    }

    #[test]
    fn test_explicit_item_scope_with_scalar_key() {
        let items = vec![
            Item::new("team", "a.yaml", json!({"id": "alpha"})),
            Item::new("team", "b.yaml", json!({"id": "alpha"})),
        ];
        assert!(check_unique(&SCOPE, "$.id", Scope::Item, true, &items).is_empty());
    }

    #[test]
    fn test_invalid_selector_is_constraint_scoped() {
        let items = vec![Item::new("team", "a.yaml", json!({"id": "alpha"}))];
        let violations = check_unique(&SCOPE, "id", Scope::Type, true, &items);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].file_path.is_none());
        assert!(violations[0].message.contains("invalid selector"));
    }
}
