//! Curate Constraint - Cross-record integrity checks
//!
//! This crate evaluates the constraints declared on each record type
//! (uniqueness, foreign keys, path/attribute equality) across a whole
//! corpus and produces a deterministically ordered list of violations.

mod evaluator;
mod foreign_key;
mod item;
mod normalize;
mod path_attr;
mod registry;
mod report;
mod types;
mod unique;

pub use evaluator::ConstraintEvaluator;
pub use item::{Item, ItemCorpus, PathMetadata};
pub use normalize::{canonical_text, ComparisonKey};
pub use registry::{ConstraintRegistry, TypeConstraints};
pub use report::{ValidationReport, Violation};
pub use types::{ConstraintDef, ConstraintKind, ConstraintType, Reference, Scope};
