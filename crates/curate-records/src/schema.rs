//! JSON Schema validation with the strict-mode overlay

use curate_config::{Config, StrictMode};
use curate_core::{CurateError, Result};
use jsonschema::{Draft, Validator};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Keywords whose value is a map of subschemas
const SCHEMA_MAPS: [&str; 4] = ["properties", "patternProperties", "$defs", "definitions"];
/// Keywords whose value is a list of subschemas
const SCHEMA_LISTS: [&str; 3] = ["allOf", "anyOf", "oneOf"];
/// Keywords whose value is a single subschema
const SCHEMA_SINGLES: [&str; 6] = ["items", "additionalProperties", "if", "then", "else", "not"];

/// Return a copy of `schema` with the strict mode applied
///
/// `Enabled` adds `additionalProperties: false` to object schemas that do
/// not set it; `Force` sets it on every object schema.
pub fn apply_strict_mode(schema: &Value, mode: StrictMode) -> Value {
    let mut schema = schema.clone();
    if mode != StrictMode::Disabled {
        if let Value::Object(map) = &mut schema {
            tighten(map, mode);
        }
    }
    schema
}

fn tighten(schema: &mut Map<String, Value>, mode: StrictMode) {
    if schema.get("type").and_then(Value::as_str) == Some("object") {
        let has_setting = schema.contains_key("additionalProperties");
        if mode == StrictMode::Force || !has_setting {
            schema.insert("additionalProperties".to_string(), Value::Bool(false));
        }
    }

    for keyword in SCHEMA_MAPS {
        if let Some(Value::Object(children)) = schema.get_mut(keyword) {
            for child in children.values_mut() {
                if let Value::Object(child) = child {
                    tighten(child, mode);
                }
            }
        }
    }
    for keyword in SCHEMA_LISTS {
        if let Some(Value::Array(children)) = schema.get_mut(keyword) {
            for child in children.iter_mut() {
                if let Value::Object(child) = child {
                    tighten(child, mode);
                }
            }
        }
    }
    for keyword in SCHEMA_SINGLES {
        if let Some(Value::Object(child)) = schema.get_mut(keyword) {
            tighten(child, mode);
        }
    }
}

/// Compiled validators for every type, built once per run
pub struct SchemaCache {
    validators: HashMap<String, Validator>,
}

impl SchemaCache {
    pub fn build(config: &Config) -> Result<Self> {
        let mut validators = HashMap::new();
        for type_def in &config.types {
            let Some(schema) = &type_def.schema else {
                continue;
            };
            let schema = apply_strict_mode(schema, config.strict_mode);
            let validator = jsonschema::options()
                .with_draft(Draft::Draft202012)
                .build(&schema)
                .map_err(|e| {
                    CurateError::Schema(format!("type {:?}: invalid schema: {}", type_def.name, e))
                })?;
            validators.insert(type_def.name.clone(), validator);
        }
        debug!(types = validators.len(), "compiled schemas");
        Ok(Self { validators })
    }

    /// Every schema violation of one record, empty when it conforms
    pub fn validate(&self, type_name: &str, data: &Value) -> Vec<String> {
        match self.validators.get(type_name) {
            Some(validator) => validator.iter_errors(data).map(|e| e.to_string()).collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}
