//! Output rendering and writing

use curate_config::{Config, OutputFormat};
use curate_core::{CurateError, Result, SortedKeys};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One written output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub type_name: String,
    pub path: PathBuf,
    pub format: OutputFormat,
    pub count: usize,
}

/// Render the records of one type in an output format
///
/// JSON and YAML wrap the records as `{<type>: [...]}`; JSONL writes one
/// compact record per line. Mapping keys are always sorted.
pub fn render(type_name: &str, format: OutputFormat, records: &[Value]) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let wrapper = wrap(type_name, records);
            let mut text = serde_json::to_string_pretty(&SortedKeys(&wrapper))?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Yaml => {
            let wrapper = wrap(type_name, records);
            Ok(serde_yaml::to_string(&SortedKeys(&wrapper))?)
        }
        OutputFormat::Jsonl => {
            let mut text = String::new();
            for record in records {
                text.push_str(&serde_json::to_string(&SortedKeys(record))?);
                text.push('\n');
            }
            Ok(text)
        }
    }
}

fn wrap(type_name: &str, records: &[Value]) -> Value {
    let mut wrapper = Map::new();
    wrapper.insert(type_name.to_string(), Value::Array(records.to_vec()));
    Value::Object(wrapper)
}

/// Write every type that declares an output, in configuration order
///
/// Relative output paths resolve against `root`. A failing type does not
/// stop the others.
pub fn export(
    root: &Path,
    config: &Config,
    records: &HashMap<String, Vec<Value>>,
) -> (Vec<ExportResult>, Vec<CurateError>) {
    let mut results = Vec::new();
    let mut errors = Vec::new();

    for type_def in &config.types {
        let Some(output) = &type_def.output else {
            continue;
        };
        let items = records
            .get(&type_def.name)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let path = root.join(&output.path);
        match write_output(&path, &type_def.name, output.format, items) {
            Ok(()) => {
                debug!(type_name = %type_def.name, path = %path.display(), count = items.len(), "exported");
                results.push(ExportResult {
                    type_name: type_def.name.clone(),
                    path,
                    format: output.format,
                    count: items.len(),
                });
            }
            Err(e) => errors.push(CurateError::Export(format!(
                "type {:?} to {}: {}",
                type_def.name,
                path.display(),
                e
            ))),
        }
    }

    (results, errors)
}

fn write_output(path: &Path, type_name: &str, format: OutputFormat, records: &[Value]) -> Result<()> {
    let content = render(type_name, format, records)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
