//! `foreign_key` constraint checks

use crate::item::{Item, ItemCorpus};
use crate::normalize::{canonical_text, ComparisonKey};
use crate::report::{ConstraintScope, Violation};
use crate::types::Reference;
use curate_selector::Selector;
use std::collections::HashSet;
use tracing::trace;

pub(crate) fn check_foreign_key(
    scope: &ConstraintScope<'_>,
    key: &str,
    references: Option<&Reference>,
    items: &[Item],
    corpus: &ItemCorpus,
) -> Vec<Violation> {
    let Some(references) = references else {
        return vec![Violation::for_constraint(
            scope,
            "missing references definition",
        )];
    };

    let key_selector = match Selector::parse(key) {
        Ok(selector) => selector,
        Err(e) => {
            return vec![Violation::for_constraint(
                scope,
                format!("invalid key selector {:?}: {}", key, e),
            )]
        }
    };
    let ref_selector = match Selector::parse(&references.key) {
        Ok(selector) => selector,
        Err(e) => {
            return vec![Violation::for_constraint(
                scope,
                format!("invalid references.key selector {:?}: {}", references.key, e),
            )]
        }
    };

    let index = build_index(&ref_selector, corpus.items_of(&references.type_name));
    trace!(
        referenced_type = %references.type_name,
        keys = index.len(),
        "built foreign key index"
    );

    let mut violations = Vec::new();
    for item in items {
        let values = key_selector.evaluate(&item.data);
        match values.as_slice() {
            [] => {}
            [value] => {
                if !index.contains(&ComparisonKey::new(value, true)) {
                    violations.push(Violation::for_item(
                        scope,
                        item,
                        format!(
                            "foreign key value {:?} not found in {}.{}",
                            canonical_text(value),
                            references.type_name,
                            references.key
                        ),
                    ));
                }
            }
            _ => violations.push(Violation::for_item(
                scope,
                item,
                format!(
                    "key selector {} resolved to multiple values; expected a scalar",
                    key_selector
                ),
            )),
        }
    }

    violations
}

/// Keys of referenced items whose selector yields exactly one value
fn build_index(selector: &Selector, referenced: &[Item]) -> HashSet<ComparisonKey> {
    referenced
        .iter()
        .filter_map(|item| match selector.evaluate(&item.data).as_slice() {
            [value] => Some(ComparisonKey::new(value, true)),
            _ => None,
        })
        .collect()
}
