//! Validation report types

use crate::item::Item;
use crate::types::ConstraintType;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A single constraint violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub constraint_id: String,
    pub constraint_type: ConstraintType,
    pub type_name: String,
    /// `None` for constraint-scoped problems such as a malformed selector
    pub file_path: Option<String>,
    pub row_index: Option<usize>,
    pub message: String,
}

impl Violation {
    /// A violation attributed to one item
    pub(crate) fn for_item(
        scope: &ConstraintScope<'_>,
        item: &Item,
        message: impl Into<String>,
    ) -> Self {
        Self {
            constraint_id: scope.constraint_id.to_string(),
            constraint_type: scope.constraint_type,
            type_name: scope.type_name.to_string(),
            file_path: Some(item.file_path.clone()),
            row_index: item.row_index,
            message: message.into(),
        }
    }

    /// A violation about the constraint itself rather than any item
    pub(crate) fn for_constraint(scope: &ConstraintScope<'_>, message: impl Into<String>) -> Self {
        Self {
            constraint_id: scope.constraint_id.to_string(),
            constraint_type: scope.constraint_type,
            type_name: scope.type_name.to_string(),
            file_path: None,
            row_index: None,
            message: message.into(),
        }
    }

    /// Report order: type, constraint id, file path, row (absent first)
    pub fn report_order(&self, other: &Self) -> Ordering {
        self.type_name
            .cmp(&other.type_name)
            .then_with(|| self.constraint_id.cmp(&other.constraint_id))
            .then_with(|| self.file_path.cmp(&other.file_path))
            .then_with(|| self.row_index.cmp(&other.row_index))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.type_name, self.constraint_type)?;
        if let Some(path) = &self.file_path {
            write!(f, " {}", path)?;
        }
        if let Some(row) = self.row_index {
            write!(f, " (row {})", row)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Identifies the constraint a violation belongs to
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConstraintScope<'a> {
    pub type_name: &'a str,
    pub constraint_id: &'a str,
    pub constraint_type: ConstraintType,
}

/// A complete validation report, ordered for reproducible output
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a report from raw violations, applying the report order
    pub fn from_violations(mut violations: Vec<Violation>) -> Self {
        violations.sort_by(Violation::report_order);
        Self { violations }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count_of(&self, constraint_type: ConstraintType) -> usize {
        self.violations
            .iter()
            .filter(|v| v.constraint_type == constraint_type)
            .count()
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        let total = self.violations.len();
        if total == 0 {
            return "No violations found.".to_string();
        }

        format!(
            "{} violation(s): {} unique, {} foreign_key, {} path_equals_attr",
            total,
            self.count_of(ConstraintType::Unique),
            self.count_of(ConstraintType::ForeignKey),
            self.count_of(ConstraintType::PathEqualsAttr),
        )
    }
}
