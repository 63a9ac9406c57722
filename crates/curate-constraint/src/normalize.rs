//! Canonical comparison keys for matched values

use serde_json::{Number, Value};

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Render a matched value as stable text
///
/// Strings are returned verbatim, integral numbers print without a fraction
/// (so `3` and `3.0` agree), and sequences or mappings print as compact JSON
/// with sorted keys.
pub fn canonical_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => with_sorted_keys(value).to_string(),
    }
}

fn with_sorted_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), with_sorted_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(with_sorted_keys).collect()),
        other => other.clone(),
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            (f as i64).to_string()
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// A value's identity for uniqueness and membership checks
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComparisonKey(String);

impl ComparisonKey {
    pub fn new(value: &Value, case_sensitive: bool) -> Self {
        Self::from_text(&canonical_text(value), case_sensitive)
    }

    /// Key for text that is already canonical, such as a path metadata entry
    pub fn from_text(text: &str, case_sensitive: bool) -> Self {
        if case_sensitive {
            Self(text.to_string())
        } else {
            Self(text.to_lowercase())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_text() {
        assert_eq!(canonical_text(&json!("Alpha")), "Alpha");
        assert_eq!(canonical_text(&json!(true)), "true");
        assert_eq!(canonical_text(&Value::Null), "null");
        assert_eq!(canonical_text(&json!(42)), "42");
        assert_eq!(canonical_text(&json!(-7)), "-7");
        assert_eq!(canonical_text(&json!(1.5)), "1.5");
    }

    #[test]
    fn test_integral_float_matches_integer() {
        assert_eq!(canonical_text(&json!(3.0)), "3");
        assert_eq!(
            ComparisonKey::new(&json!(3.0), true),
            ComparisonKey::new(&json!(3), true)
        );
    }

    #[test]
    fn test_composite_text_is_sorted_json() {
        assert_eq!(canonical_text(&json!({"b": 1, "a": [1, "x"]})), r#"{"a":[1,"x"],"b":1}"#);
    }

    #[test]
    fn test_string_and_number_share_text() {
        // "1" in one record and 1 in another compare equal
        assert_eq!(
            ComparisonKey::new(&json!("1"), true),
            ComparisonKey::new(&json!(1), true)
        );
    }

    #[test]
    fn test_case_folding() {
        let upper = ComparisonKey::new(&json!("ALPHA"), false);
        let lower = ComparisonKey::new(&json!("alpha"), false);
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), "alpha");
        assert_ne!(
            ComparisonKey::new(&json!("ALPHA"), true),
            ComparisonKey::new(&json!("alpha"), true)
        );
    }

    #[test]
    fn test_from_text() {
        assert_eq!(ComparisonKey::from_text("Alice", false).as_str(), "alice");
        assert_eq!(ComparisonKey::from_text("Alice", true).as_str(), "Alice");
    }
}
