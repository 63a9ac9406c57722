//! File normalization

use curate_config::InputFormat;
use curate_constraint::canonical_text;
use curate_core::{CurateError, Result, SortedKeys};
use serde_json::Value;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whether changed files are rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TidyMode {
    /// Report changes without touching any file
    Check,
    /// Rewrite files that change
    Write,
}

/// The result of tidying one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidyOutcome {
    pub path: PathBuf,
    pub changed: bool,
    pub original: String,
    pub tidied: String,
}

/// Tidy one file on disk
pub fn tidy_file(
    path: &Path,
    input: InputFormat,
    sort_arrays_by: &[String],
    delimiter: char,
    mode: TidyMode,
) -> Result<TidyOutcome> {
    let original = fs::read_to_string(path)
        .map_err(|e| CurateError::Tidy(format!("reading file: {}", e)))?;
    let tidied = tidy_content(input, &original, sort_arrays_by, delimiter)?;
    let changed = original != tidied;

    if changed && mode == TidyMode::Write {
        fs::write(path, &tidied).map_err(|e| CurateError::Tidy(format!("writing file: {}", e)))?;
        debug!(path = %path.display(), "rewrote file");
    }

    Ok(TidyOutcome {
        path: path.to_path_buf(),
        changed,
        original,
        tidied,
    })
}

/// The canonical form of a file's content
pub fn tidy_content(
    input: InputFormat,
    content: &str,
    sort_arrays_by: &[String],
    delimiter: char,
) -> Result<String> {
    match input {
        InputFormat::Json => {
            let mut value: Value = serde_json::from_str(content)
                .map_err(|e| CurateError::Tidy(format!("parsing JSON: {}", e)))?;
            sort_arrays(&mut value, sort_arrays_by);
            let mut text = serde_json::to_string_pretty(&SortedKeys(&value))
                .map_err(|e| CurateError::Tidy(format!("writing JSON: {}", e)))?;
            text.push('\n');
            Ok(text)
        }
        InputFormat::Yaml => {
            let mut value: Value = serde_yaml::from_str(content)
                .map_err(|e| CurateError::Tidy(format!("parsing YAML: {}", e)))?;
            sort_arrays(&mut value, sort_arrays_by);
            serde_yaml::to_string(&SortedKeys(&value))
                .map_err(|e| CurateError::Tidy(format!("writing YAML: {}", e)))
        }
        InputFormat::Csv => tidy_csv(content, sort_arrays_by, delimiter),
    }
}

/// Stable-sort every array of mappings by the named fields, recursively
fn sort_arrays(value: &mut Value, keys: &[String]) {
    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                sort_arrays(child, keys);
            }
        }
        Value::Array(items) => {
            if !keys.is_empty() && items.iter().all(Value::is_object) {
                items.sort_by(|a, b| compare_by_fields(a, b, keys));
            }
            for child in items.iter_mut() {
                sort_arrays(child, keys);
            }
        }
        _ => {}
    }
}

fn compare_by_fields(a: &Value, b: &Value, keys: &[String]) -> Ordering {
    keys.iter()
        .map(|key| field_text(a, key).cmp(&field_text(b, key)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Sort text of an absent or null field
const MISSING_FIELD: &str = "<nil>";

fn field_text(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => MISSING_FIELD.to_string(),
        Some(field) => canonical_text(field),
    }
}

fn tidy_csv(content: &str, sort_by: &[String], delimiter: char) -> Result<String> {
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| CurateError::Tidy(format!("unsupported CSV delimiter {:?}", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_reader(content.as_bytes());
    let rows = reader
        .records()
        .map(|row| row.map(|r| r.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CurateError::Tidy(format!("parsing CSV: {}", e)))?;

    let Some(headers) = rows.first() else {
        return Ok(content.to_string());
    };

    let mut order: Vec<usize> = (0..headers.len()).collect();
    order.sort_by(|&a, &b| headers[a].cmp(&headers[b]));

    let mut sorted: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            order
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    if !sort_by.is_empty() {
        let columns: Vec<usize> = sort_by
            .iter()
            .filter_map(|key| sorted[0].iter().position(|h| h == key))
            .collect();
        sorted[1..].sort_by(|a, b| {
            columns
                .iter()
                .map(|&c| a[c].cmp(&b[c]))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in &sorted {
        writer
            .write_record(row)
            .map_err(|e| CurateError::Tidy(format!("writing CSV: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CurateError::Tidy(format!("writing CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| CurateError::Tidy(format!("writing CSV: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_json_keys_sorted_and_indented() {
        let tidied = tidy_content(InputFormat::Json, r#"{"b":1,"a":{"d":2,"c":3}}"#, &[], ',').unwrap();
        assert_eq!(tidied, "{\n  \"a\": {\n    \"c\": 3,\n    \"d\": 2\n  },\n  \"b\": 1\n}\n");
    }

    #[test]
    fn test_tidy_is_idempotent() {
        let once = tidy_content(InputFormat::Json, r#"{"z":[3,1],"a":"x"}"#, &[], ',').unwrap();
        let twice = tidy_content(InputFormat::Json, &once, &[], ',').unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_arrays_by_fields() {
        let input = r#"{"members":[{"id":"c","n":1},{"id":"a","n":2},{"id":"a","n":1}],"plain":[3,1,2]}"#;
        let tidied = tidy_content(InputFormat::Json, input, &keys(&["id", "n"]), ',').unwrap();
        let value: Value = serde_json::from_str(&tidied).unwrap();
        let order: Vec<_> = value["members"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| (m["id"].as_str().unwrap().to_string(), m["n"].as_i64().unwrap()))
            .collect();
        assert_eq!(order, vec![("a".into(), 1), ("a".into(), 2), ("c".into(), 1)]);
        assert_eq!(value["plain"], serde_json::json!([3, 1, 2]));
    }

    #[test]
    fn test_sort_is_stable_for_missing_fields() {
        let input = r#"[{"x":2},{"id":"b"},{"x":1}]"#;
        let tidied = tidy_content(InputFormat::Json, input, &keys(&["id"]), ',').unwrap();
        let value: Value = serde_json::from_str(&tidied).unwrap();
        assert_eq!(value, serde_json::json!([{"x": 2}, {"x": 1}, {"id": "b"}]));
    }

    #[test]
    fn test_missing_fields_sort_as_nil() {
        let input = r#"[{"id":"z"},{"x":1},{"id":"9"},{"id":null,"x":2}]"#;
        let tidied = tidy_content(InputFormat::Json, input, &keys(&["id"]), ',').unwrap();
        let value: Value = serde_json::from_str(&tidied).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"id": "9"}, {"x": 1}, {"id": null, "x": 2}, {"id": "z"}])
        );
    }

    #[test]
    fn test_yaml() {
        let tidied = tidy_content(InputFormat::Yaml, "name: x # comment\nid: 1\n", &[], ',').unwrap();
        assert_eq!(tidied, "id: 1\nname: x\n");
    }

    #[test]
    fn test_csv_columns_and_rows() {
        let input = "name,id\nzed,2\namy,1\n";
        let tidied = tidy_content(InputFormat::Csv, input, &keys(&["id"]), ',').unwrap();
        assert_eq!(tidied, "id,name\n1,amy\n2,zed\n");
    }

    #[test]
    fn test_csv_unknown_sort_column_is_ignored() {
        let input = "b;a\n1;2\n0;3\n";
        let tidied = tidy_content(InputFormat::Csv, input, &keys(&["missing"]), ';').unwrap();
        assert_eq!(tidied, "a;b\n2;1\n3;0\n");
    }

    #[test]
    fn test_csv_empty_is_unchanged() {
        assert_eq!(tidy_content(InputFormat::Csv, "", &[], ',').unwrap(), "");
    }

    #[test]
    fn test_parse_error() {
        let err = tidy_content(InputFormat::Json, "{", &[], ',').unwrap_err();
        assert!(err.to_string().contains("parsing JSON"));
    }

    #[test]
    fn test_check_mode_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        fs::write(&path, r#"{"b":1,"a":2}"#).unwrap();

        let outcome = tidy_file(&path, InputFormat::Json, &[], ',', TidyMode::Check).unwrap();
        assert!(outcome.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"b":1,"a":2}"#);

        let outcome = tidy_file(&path, InputFormat::Json, &[], ',', TidyMode::Write).unwrap();
        assert!(outcome.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), outcome.tidied);

        let outcome = tidy_file(&path, InputFormat::Json, &[], ',', TidyMode::Write).unwrap();
        assert!(!outcome.changed);
    }
}
