//! `path_equals_attr` constraint checks

use crate::item::Item;
use crate::normalize::{canonical_text, ComparisonKey};
use crate::report::{ConstraintScope, Violation};
use crate::types::Reference;
use curate_selector::Selector;

pub(crate) fn check_path_equals_attr(
    scope: &ConstraintScope<'_>,
    path_selector: &str,
    references: Option<&Reference>,
    case_sensitive: bool,
    items: &[Item],
) -> Vec<Violation> {
    let Some(references) = references else {
        return vec![Violation::for_constraint(
            scope,
            "missing references definition",
        )];
    };

    let attribute = match Selector::parse(&references.key) {
        Ok(selector) => selector,
        Err(e) => {
            return vec![Violation::for_constraint(
                scope,
                format!("invalid references.key selector {:?}: {}", references.key, e),
            )]
        }
    };

    items
        .iter()
        .filter_map(|item| {
            check_item(path_selector, &attribute, case_sensitive, item)
                .map(|message| Violation::for_item(scope, item, message))
        })
        .collect()
}

/// The problem with one item, if any
fn check_item(
    path_selector: &str,
    attribute: &Selector,
    case_sensitive: bool,
    item: &Item,
) -> Option<String> {
    let Some(path_value) = item.path_metadata.get(path_selector) else {
        return Some(format!(
            "path_selector {:?} not found in path metadata",
            path_selector
        ));
    };

    let values = attribute.evaluate(&item.data);
    let value = match values.as_slice() {
        [] => {
            return Some(format!(
                "attribute selector {} resolved to no values",
                attribute
            ))
        }
        [value] => *value,
        _ => {
            return Some(format!(
                "attribute selector {} resolved to multiple values; expected a scalar",
                attribute
            ))
        }
    };

    let attribute_text = canonical_text(value);
    if ComparisonKey::from_text(path_value, case_sensitive)
        == ComparisonKey::from_text(&attribute_text, case_sensitive)
    {
        None
    } else {
        Some(format!(
            "path value {:?} does not match attribute value {:?}",
            path_value, attribute_text
        ))
    }
}
