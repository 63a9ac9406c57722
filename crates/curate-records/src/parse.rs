//! Record parsing

use crate::delimited::parse_csv;
use curate_config::{InputFormat, TypeDef};
use serde_json::Value;
use std::fmt;

/// One record read from a data file
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 0-based data row for CSV inputs
    pub row_index: Option<usize>,
    pub data: Value,
}

/// A problem that kept a file's records from being read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    pub file: String,
    pub row: Option<usize>,
    pub message: String,
}

impl RecordError {
    pub(crate) fn new(file: &str, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            row: None,
            message: message.into(),
        }
    }

    pub(crate) fn at_row(file: &str, row: usize, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            row: Some(row),
            message: message.into(),
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(row) = self.row {
            write!(f, " (row {})", row)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Parse the content of one data file
///
/// JSON and YAML files hold exactly one record; CSV files hold one per
/// data row. Any error rejects every record of the file.
pub fn parse_records(
    file: &str,
    content: &str,
    type_def: &TypeDef,
) -> Result<Vec<Record>, Vec<RecordError>> {
    match type_def.input {
        InputFormat::Json => {
            let value: Value = serde_json::from_str(content)
                .map_err(|e| vec![RecordError::new(file, format!("parsing JSON: {}", e))])?;
            single_record(file, "JSON", value)
        }
        InputFormat::Yaml => {
            let value: Value = serde_yaml::from_str(content)
                .map_err(|e| vec![RecordError::new(file, format!("parsing YAML: {}", e))])?;
            single_record(file, "YAML", value)
        }
        InputFormat::Csv => parse_csv(file, content, type_def),
    }
}

fn single_record(file: &str, format: &str, value: Value) -> Result<Vec<Record>, Vec<RecordError>> {
    if !value.is_object() {
        return Err(vec![RecordError::new(
            file,
            format!(
                "parsing {}: expected a mapping at the top level, found {}",
                format,
                kind_name(&value)
            ),
        )]);
    }
    Ok(vec![Record {
        row_index: None,
        data: value,
    }])
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
