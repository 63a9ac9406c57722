//! Registry of constraint definitions grouped by owning type

use crate::types::ConstraintDef;

/// The constraints declared on one type, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct TypeConstraints {
    pub type_name: String,
    pub constraints: Vec<ConstraintDef>,
}

/// Holds every type's constraints in configuration order
#[derive(Debug, Default)]
pub struct ConstraintRegistry {
    types: Vec<TypeConstraints>,
}

impl ConstraintRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type, keeping its position even if it has no constraints
    pub fn add_type(&mut self, type_name: impl Into<String>) {
        let type_name = type_name.into();
        if self.for_type(&type_name).is_none() {
            self.types.push(TypeConstraints {
                type_name,
                constraints: Vec::new(),
            });
        }
    }

    /// Append a constraint to a type, declaring the type if needed
    pub fn register(&mut self, type_name: &str, constraint: ConstraintDef) {
        match self.types.iter_mut().find(|t| t.type_name == type_name) {
            Some(entry) => entry.constraints.push(constraint),
            None => self.types.push(TypeConstraints {
                type_name: type_name.to_string(),
                constraints: vec![constraint],
            }),
        }
    }

    /// All types in declaration order
    pub fn all(&self) -> &[TypeConstraints] {
        &self.types
    }

    pub fn for_type(&self, type_name: &str) -> Option<&TypeConstraints> {
        self.types.iter().find(|t| t.type_name == type_name)
    }

    /// Total number of constraints across all types
    pub fn len(&self) -> usize {
        self.types.iter().map(|t| t.constraints.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
