//! Constraint type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// How far a `unique` constraint looks for duplicates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Across every item of the owning type
    #[default]
    Type,
    /// Within each item on its own
    Item,
}

/// The `references` block of a constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    /// Referenced type name (foreign keys only)
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_name: String,
    /// Selector text evaluated against the referenced record
    #[serde(default)]
    pub key: String,
}

/// The kind of constraint to enforce
///
/// Selector fields hold the configured text; the evaluator parses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Values selected by `key` must not repeat
    Unique {
        #[serde(default)]
        key: String,
        #[serde(default)]
        scope: Scope,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
    /// The value selected by `key` must exist among `references.type` items
    ForeignKey {
        #[serde(default)]
        key: String,
        #[serde(default)]
        references: Option<Reference>,
    },
    /// A path metadata entry must equal a record attribute
    PathEqualsAttr {
        #[serde(default)]
        path_selector: String,
        #[serde(default)]
        references: Option<Reference>,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
}

fn default_true() -> bool {
    true
}

impl ConstraintKind {
    pub fn constraint_type(&self) -> ConstraintType {
        match self {
            ConstraintKind::Unique { .. } => ConstraintType::Unique,
            ConstraintKind::ForeignKey { .. } => ConstraintType::ForeignKey,
            ConstraintKind::PathEqualsAttr { .. } => ConstraintType::PathEqualsAttr,
        }
    }
}

/// A constraint as declared on a type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConstraintSpec")]
pub struct ConstraintDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub kind: ConstraintKind,
}

/// The flat on-disk form of a constraint, rejecting keys its kind does not take
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum ConstraintSpec {
    Unique {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        key: String,
        #[serde(default)]
        scope: Scope,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
    ForeignKey {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        key: String,
        #[serde(default)]
        references: Option<Reference>,
    },
    PathEqualsAttr {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        path_selector: String,
        #[serde(default)]
        references: Option<Reference>,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
}

impl From<ConstraintSpec> for ConstraintDef {
    fn from(spec: ConstraintSpec) -> Self {
        let (id, kind) = match spec {
            ConstraintSpec::Unique {
                id,
                key,
                scope,
                case_sensitive,
            } => (
                id,
                ConstraintKind::Unique {
                    key,
                    scope,
                    case_sensitive,
                },
            ),
            ConstraintSpec::ForeignKey {
                id,
                key,
                references,
            } => (id, ConstraintKind::ForeignKey { key, references }),
            ConstraintSpec::PathEqualsAttr {
                id,
                path_selector,
                references,
                case_sensitive,
            } => (
                id,
                ConstraintKind::PathEqualsAttr {
                    path_selector,
                    references,
                    case_sensitive,
                },
            ),
        };
        Self { id, kind }
    }
}

impl ConstraintDef {
    pub fn new(kind: ConstraintKind) -> Self {
        Self { id: None, kind }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The author-supplied id, or `#<index>` for the constraint's position
    pub fn resolved_id(&self, index: usize) -> String {
        match &self.id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("#{}", index),
        }
    }
}

/// Discriminant of a constraint kind, as reported in violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintType {
    Unique,
    ForeignKey,
    PathEqualsAttr,
}

impl ConstraintType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintType::Unique => "unique",
            ConstraintType::ForeignKey => "foreign_key",
            ConstraintType::PathEqualsAttr => "path_equals_attr",
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
