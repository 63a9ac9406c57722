//! Configuration file model

use curate_constraint::{ConstraintDef, ConstraintRegistry};
use curate_core::{CurateError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Name of the configuration file at the repository root
pub const CONFIG_FILE_NAME: &str = ".curate";

/// How strictly object schemas reject undeclared properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StrictMode {
    /// Schemas are used as written
    #[default]
    Disabled,
    /// `additionalProperties: false` wherever a schema leaves it unset
    Enabled,
    /// `additionalProperties: false` on every object schema
    Force,
}

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" => Ok(ReportFormat::Yaml),
            other => Err(format!(
                "unknown format '{}'; expected text, json, or yaml",
                other
            )),
        }
    }
}

/// The `reporting` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reporting {
    #[serde(default)]
    pub mode: ReportFormat,
}

/// The top-level `tidy` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TidySettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for TidySettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// Format of a type's input files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Json,
    Yaml,
    Csv,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Json => "json",
            InputFormat::Yaml => "yaml",
            InputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format of an exported output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    Jsonl,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regular expressions selecting a type's files by root-relative path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchDef {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputDef {
    pub path: String,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CsvDef {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for CsvDef {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Per-type tidy options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeTidy {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort_arrays_by: Vec<String>,
}

/// A record type declared in the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDef {
    pub name: String,
    pub input: InputFormat,
    #[serde(rename = "match", default)]
    pub match_def: MatchDef,
    /// JSON Schema for one record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv: Option<CsvDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tidy: Option<TypeTidy>,
}

impl TypeDef {
    /// The CSV field delimiter, `,` unless configured
    pub fn delimiter(&self) -> char {
        self.csv
            .as_ref()
            .and_then(|csv| csv.delimiter.chars().next())
            .unwrap_or(',')
    }

    pub fn sort_arrays_by(&self) -> &[String] {
        self.tidy
            .as_ref()
            .map(|tidy| tidy.sort_arrays_by.as_slice())
            .unwrap_or(&[])
    }
}

/// The parsed `.curate` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub strict_mode: StrictMode,
    #[serde(default)]
    pub reporting: Reporting,
    #[serde(default)]
    pub tidy: TidySettings,
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

impl Config {
    /// Load a configuration file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CurateError::ConfigLoad(format!("reading {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| CurateError::ConfigLoad(format!("parsing {}: {}", path.display(), e)))
    }

    /// Parse configuration text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::parse(content).map_err(|e| CurateError::ConfigLoad(e.to_string()))
    }

    fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let mut config: Config = serde_yaml::from_str(content)?;
        config.apply_defaults();
        Ok(config)
    }

    /// Fill values that are present but empty
    fn apply_defaults(&mut self) {
        for type_def in &mut self.types {
            if let Some(csv) = &mut type_def.csv {
                if csv.delimiter.is_empty() {
                    csv.delimiter = default_delimiter();
                }
            }
        }
    }

    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Whether any type declares an output file
    pub fn has_outputs(&self) -> bool {
        self.types.iter().any(|t| t.output.is_some())
    }

    /// Per-type constraints in configuration order
    pub fn constraint_registry(&self) -> ConstraintRegistry {
        let mut registry = ConstraintRegistry::new();
        for type_def in &self.types {
            registry.add_type(type_def.name.as_str());
            for constraint in &type_def.constraints {
                registry.register(&type_def.name, constraint.clone());
            }
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curate_constraint::{ConstraintKind, Scope};
    use std::io::Write;

    const SAMPLE: &str = r#"
version: "1.0.0"
types:
  - name: team
    input: yaml
    match:
      include: ['^teams/.*\.ya?ml$']
    schema:
      type: object
      properties:
        id: { type: string }
    constraints:
      - id: team-id
        type: unique
        key: $.id
    output:
      path: out/teams.json
      format: json
  - name: user
    input: csv
    match:
      include: ['^users\.csv$']
    csv:
      delimiter: ";"
    schema:
      type: object
    constraints:
      - type: foreign_key
        key: $.teamId
        references:
          type: team
          key: $.id
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.types.len(), 2);

        let team = config.type_def("team").unwrap();
        assert_eq!(team.input, InputFormat::Yaml);
        assert_eq!(team.output.as_ref().unwrap().format, OutputFormat::Json);
        assert_eq!(team.schema.as_ref().unwrap()["type"], "object");

        let user = config.type_def("user").unwrap();
        assert_eq!(user.delimiter(), ';');
        assert!(config.has_outputs());
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.strict_mode, StrictMode::Disabled);
        assert_eq!(config.reporting.mode, ReportFormat::Text);
        assert!(config.tidy.enabled);

        let team = config.type_def("team").unwrap();
        assert_eq!(team.delimiter(), ',');
        assert!(team.sort_arrays_by().is_empty());
        match &team.constraints[0].kind {
            ConstraintKind::Unique {
                scope,
                case_sensitive,
                ..
            } => {
                assert_eq!(*scope, Scope::Type);
                assert!(*case_sensitive);
            }
            other => panic!("unexpected constraint {:?}", other),
        }
    }

    #[test]
    fn test_empty_delimiter_defaults_to_comma() {
        let yaml = r#"
version: "1.0.0"
types:
  - name: rows
    input: csv
    match: { include: ['\.csv$'] }
    csv: { delimiter: "" }
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.types[0].csv.as_ref().unwrap().delimiter, ",");
    }

    #[test]
    fn test_unknown_enum_values_fail() {
        let bad_input = "version: 1.0.0\ntypes:\n  - name: a\n    input: xml\n";
        assert!(matches!(
            Config::from_yaml_str(bad_input),
            Err(CurateError::ConfigLoad(_))
        ));

        let bad_strict = "version: 1.0.0\nstrict_mode: SOMETIMES\n";
        assert!(Config::from_yaml_str(bad_strict).is_err());

        let bad_constraint = r#"
version: "1.0.0"
types:
  - name: a
    input: json
    constraints:
      - type: not_null
        key: $.id
"#;
        assert!(Config::from_yaml_str(bad_constraint).is_err());
    }

    #[test]
    fn test_unknown_top_level_key_fails() {
        let yaml = "version: 1.0.0\ntypez:\n  - name: a\n    input: json\n";
        let err = Config::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, CurateError::ConfigLoad(_)));
        assert!(err.to_string().contains("typez"));
    }

    #[test]
    fn test_unknown_nested_keys_fail() {
        let per_type = "version: 1.0.0\ntypes:\n  - name: a\n    input: json\n    schemas: {}\n";
        assert!(Config::from_yaml_str(per_type).is_err());

        let in_match = "version: 1.0.0\ntypes:\n  - name: a\n    input: json\n    match: { includes: ['x'] }\n";
        assert!(Config::from_yaml_str(in_match).is_err());

        let in_output = "version: 1.0.0\ntypes:\n  - name: a\n    input: json\n    output: { path: a.json, format: json, pretty: true }\n";
        assert!(Config::from_yaml_str(in_output).is_err());

        let in_tidy = "version: 1.0.0\ntidy: { enabled: true, check: false }\n";
        assert!(Config::from_yaml_str(in_tidy).is_err());

        let in_constraint = r#"
version: 1.0.0
types:
  - name: a
    input: json
    constraints:
      - type: unique
        key: $.id
        scopes: item
"#;
        assert!(Config::from_yaml_str(in_constraint).is_err());
    }

    #[test]
    fn test_reporting_and_tidy_blocks() {
        let yaml = "version: 1.0.0\nstrict_mode: FORCE\nreporting:\n  mode: json\ntidy:\n  enabled: false\n";
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.strict_mode, StrictMode::Force);
        assert_eq!(config.reporting.mode, ReportFormat::Json);
        assert!(!config.tidy.enabled);
    }

    #[test]
    fn test_constraint_registry_keeps_type_order() {
        let config = Config::from_yaml_str(SAMPLE).unwrap();
        let registry = config.constraint_registry();
        let names: Vec<_> = registry.all().iter().map(|t| t.type_name.as_str()).collect();
        assert_eq!(names, vec!["team", "user"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_load_names_file_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "version: [unclosed").unwrap();

        let err = Config::load(&path).unwrap_err().to_string();
        assert!(err.contains(".curate"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load(dir.path().join(CONFIG_FILE_NAME)),
            Err(CurateError::ConfigLoad(_))
        ));
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("yaml".parse::<ReportFormat>().unwrap(), ReportFormat::Yaml);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
