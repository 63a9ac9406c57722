//! Constraint evaluation engine

use crate::foreign_key::check_foreign_key;
use crate::item::ItemCorpus;
use crate::path_attr::check_path_equals_attr;
use crate::registry::ConstraintRegistry;
use crate::report::{ConstraintScope, ValidationReport, Violation};
use crate::types::{ConstraintDef, ConstraintKind};
use crate::unique::check_unique;
use tracing::debug;

/// Evaluates every registered constraint against a corpus of items
pub struct ConstraintEvaluator<'a> {
    registry: &'a ConstraintRegistry,
    corpus: &'a ItemCorpus,
}

impl<'a> ConstraintEvaluator<'a> {
    /// Create a new evaluator
    pub fn new(registry: &'a ConstraintRegistry, corpus: &'a ItemCorpus) -> Self {
        Self { registry, corpus }
    }

    /// Run all constraints and return a validation report
    ///
    /// Items and configuration are only read, so repeated runs over the
    /// same inputs give identical reports.
    pub fn validate(&self) -> ValidationReport {
        let mut violations = Vec::new();

        for entry in self.registry.all() {
            for (index, constraint) in entry.constraints.iter().enumerate() {
                let constraint_id = constraint.resolved_id(index);
                let scope = ConstraintScope {
                    type_name: &entry.type_name,
                    constraint_id: &constraint_id,
                    constraint_type: constraint.kind.constraint_type(),
                };
                let found = self.evaluate_constraint(&scope, constraint);
                debug!(
                    type_name = %entry.type_name,
                    constraint = %constraint_id,
                    kind = %scope.constraint_type,
                    violations = found.len(),
                    "evaluated constraint"
                );
                violations.extend(found);
            }
        }

        ValidationReport::from_violations(violations)
    }

    fn evaluate_constraint(
        &self,
        scope: &ConstraintScope<'_>,
        constraint: &ConstraintDef,
    ) -> Vec<Violation> {
        let items = self.corpus.items_of(scope.type_name);

        match &constraint.kind {
            ConstraintKind::Unique {
                key,
                scope: unique_scope,
                case_sensitive,
            } => check_unique(scope, key, *unique_scope, *case_sensitive, items),

            ConstraintKind::ForeignKey { key, references } => {
                check_foreign_key(scope, key, references.as_ref(), items, self.corpus)
            }

            ConstraintKind::PathEqualsAttr {
                path_selector,
                references,
                case_sensitive,
            } => check_path_equals_attr(
                scope,
                path_selector,
                references.as_ref(),
                *case_sensitive,
                items,
            ),
        }
    }
}
