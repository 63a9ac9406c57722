//! CSV inputs

use crate::parse::{Record, RecordError};
use curate_config::TypeDef;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

/// How a CSV cell is converted, from the property's schema `type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Boolean,
    Number,
    Integer,
    Text,
}

impl CellType {
    fn from_schema(property: &Value) -> Self {
        match property.get("type").and_then(Value::as_str) {
            Some("boolean") => CellType::Boolean,
            Some("number") => CellType::Number,
            Some("integer") => CellType::Integer,
            _ => CellType::Text,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CellType::Boolean => "boolean",
            CellType::Number => "number",
            CellType::Integer => "integer",
            CellType::Text => "string",
        }
    }

    fn convert(&self, cell: &str) -> Result<Value, String> {
        if cell.is_empty() && *self != CellType::Text {
            return Err(format!("empty value for {} type", self.name()));
        }
        match self {
            CellType::Boolean => match cell.to_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(format!("invalid boolean value: {:?}", cell)),
            },
            CellType::Number => cell
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("invalid number value: {:?}", cell)),
            CellType::Integer => cell
                .parse::<i64>()
                .map(|n| Value::Number(n.into()))
                .map_err(|_| format!("invalid integer value: {:?}", cell)),
            CellType::Text => Ok(Value::String(cell.to_string())),
        }
    }
}

pub(crate) fn parse_csv(
    file: &str,
    content: &str,
    type_def: &TypeDef,
) -> Result<Vec<Record>, Vec<RecordError>> {
    let delimiter = type_def.delimiter();
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| vec![RecordError::new(file, format!("unsupported CSV delimiter {:?}", delimiter))])?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| vec![RecordError::new(file, format!("parsing CSV: {}", e))])?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(vec![RecordError::new(file, "CSV file is empty (no header row)")]);
    }

    let schema = type_def.schema.as_ref();
    let properties = schema
        .and_then(|s| s.get("properties"))
        .and_then(Value::as_object);
    let required: Vec<&str> = schema
        .and_then(|s| s.get("required"))
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut header_errors = Vec::new();
    let mut cell_types = HashMap::new();
    for header in &headers {
        // Only properties with a declared type can receive CSV cells
        let typed = properties
            .and_then(|p| p.get(header))
            .filter(|property| property.get("type").and_then(Value::as_str).is_some());
        match typed {
            Some(property) => {
                cell_types.insert(header.as_str(), CellType::from_schema(property));
            }
            None => header_errors.push(RecordError::new(
                file,
                format!("CSV header {:?} not found in schema properties", header),
            )),
        }
    }
    for name in required {
        if !headers.iter().any(|h| h == name) {
            header_errors.push(RecordError::new(
                file,
                format!("required property {:?} missing from CSV headers", name),
            ));
        }
    }
    if !header_errors.is_empty() {
        return Err(header_errors);
    }

    let mut records = Vec::new();
    let mut errors = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let cells = match result {
            Ok(cells) => cells,
            Err(e) => {
                errors.push(RecordError::new(file, format!("parsing CSV: {}", e)));
                break;
            }
        };

        let mut data = Map::new();
        let mut row_ok = true;
        for (column, header) in headers.iter().enumerate() {
            let cell = cells.get(column).unwrap_or_default();
            let cell_type = cell_types.get(header.as_str()).copied().unwrap_or(CellType::Text);
            match cell_type.convert(cell) {
                Ok(value) => {
                    data.insert(header.clone(), value);
                }
                Err(message) => {
                    errors.push(RecordError::at_row(
                        file,
                        row,
                        format!("row {}, column {:?}: {}", row, header, message),
                    ));
                    row_ok = false;
                }
            }
        }

        if row_ok {
            records.push(Record {
                row_index: Some(row),
                data: Value::Object(data),
            });
        }
    }

    if errors.is_empty() {
        Ok(records)
    } else {
        Err(errors)
    }
}
