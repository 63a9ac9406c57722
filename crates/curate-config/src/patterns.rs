//! Compiled include/exclude patterns

use crate::model::TypeDef;
use curate_core::{CurateError, Result};
use regex::Regex;
use std::collections::BTreeMap;

/// Compiled patterns of one type
#[derive(Debug, Clone)]
pub struct TypePatterns {
    pub type_name: String,
    pub includes: Vec<Regex>,
    pub excludes: Vec<Regex>,
}

impl TypePatterns {
    /// Match a root-relative path
    ///
    /// Returns the named captures of the first matching include pattern,
    /// keyed `path.<name>`, or `None` if an exclude matches or no include
    /// does.
    pub fn match_path(&self, rel_path: &str) -> Option<BTreeMap<String, String>> {
        if self.excludes.iter().any(|re| re.is_match(rel_path)) {
            return None;
        }

        self.includes.iter().find_map(|re| {
            let caps = re.captures(rel_path)?;
            let captures = re
                .capture_names()
                .flatten()
                .map(|name| {
                    let value = caps.name(name).map(|m| m.as_str()).unwrap_or_default();
                    (format!("path.{}", name), value.to_string())
                })
                .collect();
            Some(captures)
        })
    }
}

/// Compiled patterns for every type, in configuration order
///
/// Built once per configuration load and handed to discovery.
#[derive(Debug, Clone, Default)]
pub struct PatternCache {
    types: Vec<TypePatterns>,
}

impl PatternCache {
    pub fn build(types: &[TypeDef]) -> Result<Self> {
        let types = types
            .iter()
            .map(|type_def| {
                Ok(TypePatterns {
                    type_name: type_def.name.clone(),
                    includes: compile_all(&type_def.name, "include", &type_def.match_def.include)?,
                    excludes: compile_all(&type_def.name, "exclude", &type_def.match_def.exclude)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { types })
    }

    pub fn all(&self) -> &[TypePatterns] {
        &self.types
    }

    pub fn for_type(&self, type_name: &str) -> Option<&TypePatterns> {
        self.types.iter().find(|t| t.type_name == type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn compile_all(type_name: &str, field: &str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| {
                CurateError::Pattern(format!(
                    "type {:?}: invalid {} pattern {:?}: {}",
                    type_name, field, pattern, e
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Config;

    fn config(include: &str, exclude: &str) -> Config {
        let yaml = format!(
            "version: 1.0.0\ntypes:\n  - name: user\n    input: json\n    match:\n      include: ['{}']\n      exclude: ['{}']\n",
            include, exclude
        );
        Config::from_yaml_str(&yaml).unwrap()
    }

    #[test]
    fn test_include_and_exclude() {
        let config = config(r"^users/.*\.json$", r"^users/draft/");
        let cache = PatternCache::build(&config.types).unwrap();
        let patterns = cache.for_type("user").unwrap();

        assert!(patterns.match_path("users/alice.json").is_some());
        assert!(patterns.match_path("users/draft/bob.json").is_none());
        assert!(patterns.match_path("teams/a.json").is_none());
    }

    #[test]
    fn test_named_captures_are_prefixed() {
        let config = config(r"^teams/(?P<team>[^/]+)/(?P<member>[^/]+)\.json$", r"^$");
        let cache = PatternCache::build(&config.types).unwrap();
        let captures = cache.all()[0].match_path("teams/core/alice.json").unwrap();

        assert_eq!(captures.get("path.team").map(String::as_str), Some("core"));
        assert_eq!(captures.get("path.member").map(String::as_str), Some("alice"));
        assert_eq!(captures.len(), 2);
    }

    #[test]
    fn test_invalid_pattern() {
        let config = config(r"^users/(", r"^$");
        let err = PatternCache::build(&config.types).unwrap_err();
        assert!(matches!(err, CurateError::Pattern(_)));
    }
}
