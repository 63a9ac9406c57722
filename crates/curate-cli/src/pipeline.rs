//! Steps shared by the validate, export and tidy commands

use crate::exit::{halt, ExitStatus};
use crate::report::{ReportEntry, Reporter};
use anyhow::Result;
use curate_config::{Config, PatternCache, ReportFormat, CONFIG_FILE_NAME};
use curate_constraint::{ConstraintEvaluator, Item, ItemCorpus};
use curate_discovery::{discover, DiscoveredFile};
use curate_records::{parse_records, SchemaCache};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI version checked against the configuration's `version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A repository with a loaded, valid configuration
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    pub reporter: Reporter,
}

impl Workspace {
    /// Load and validate `.curate` under `root`
    ///
    /// Warnings go to stderr; any error stops the command.
    pub fn load(root: &Path, format: Option<ReportFormat>) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE_NAME);
        if !config_path.is_file() {
            eprintln!("error: {} not found in {}", CONFIG_FILE_NAME, root.display());
            return halt(ExitStatus::ConfigInvalid);
        }

        let config = match Config::load(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}", e);
                return halt(ExitStatus::ConfigInvalid);
            }
        };
        let reporter = Reporter::new(format.unwrap_or(config.reporting.mode));

        let diagnostics = curate_config::validate(&config, VERSION);
        for warning in &diagnostics.warnings {
            eprintln!("warning: {}", warning);
        }
        if !diagnostics.is_valid() {
            let entries: Vec<_> = diagnostics
                .errors
                .iter()
                .map(|message| ReportEntry::error(message.clone()).with_type("config"))
                .collect();
            reporter.emit(&entries)?;
            return halt(ExitStatus::ConfigInvalid);
        }

        debug!(root = %root.display(), types = config.types.len(), "loaded configuration");
        Ok(Self {
            root: root.to_path_buf(),
            config,
            reporter,
        })
    }

    /// Find the data files of every type
    pub fn discover(&self) -> Result<Vec<DiscoveredFile>> {
        let patterns = match PatternCache::build(&self.config.types) {
            Ok(patterns) => patterns,
            Err(e) => return self.fail_config(e.to_string()),
        };

        let discovery = discover(&self.root, &self.config, &patterns);
        if !discovery.is_ok() {
            let entries: Vec<_> = discovery
                .errors
                .iter()
                .map(|message| ReportEntry::error(message.clone()).with_type("discovery"))
                .collect();
            self.reporter.emit(&entries)?;
            return halt(ExitStatus::ConfigInvalid);
        }

        debug!(files = discovery.files.len(), "discovered files");
        Ok(discovery.files)
    }

    /// Parse, schema-check and constraint-check every discovered file
    ///
    /// Reports parse errors, then schema errors, then constraint violations.
    /// Records that fail their schema still take part in constraint checks.
    pub fn validate_data(&self, files: &[DiscoveredFile]) -> Result<ItemCorpus> {
        let schemas = match SchemaCache::build(&self.config) {
            Ok(schemas) => schemas,
            Err(e) => return self.fail_config(e.to_string()),
        };

        let mut parse_entries = Vec::new();
        let mut schema_entries = Vec::new();
        let mut corpus = ItemCorpus::new();

        for file in files {
            let Some(type_def) = self.config.type_def(&file.type_name) else {
                continue;
            };
            let content = match fs::read_to_string(self.root.join(&file.path)) {
                Ok(content) => content,
                Err(e) => {
                    parse_entries.push(
                        ReportEntry::error(format!("reading file: {}", e))
                            .with_type(file.type_name.clone())
                            .with_file(file.path.clone()),
                    );
                    continue;
                }
            };

            let records = match parse_records(&file.path, &content, type_def) {
                Ok(records) => records,
                Err(errors) => {
                    parse_entries.extend(
                        errors
                            .iter()
                            .map(|e| ReportEntry::record(&file.type_name, e)),
                    );
                    continue;
                }
            };

            for record in records {
                for message in schemas.validate(&file.type_name, &record.data) {
                    schema_entries.push(
                        ReportEntry::error(message)
                            .with_type(file.type_name.clone())
                            .with_file(file.path.clone())
                            .with_row(record.row_index),
                    );
                }

                let mut item = Item::new(file.type_name.clone(), file.path.clone(), record.data)
                    .with_path_metadata(file.path_metadata.clone());
                if let Some(row) = record.row_index {
                    item = item.with_row(row);
                }
                corpus.push(item);
            }
        }

        let registry = self.config.constraint_registry();
        let report = ConstraintEvaluator::new(&registry, &corpus).validate();
        debug!(
            items = corpus.len(),
            parse_errors = parse_entries.len(),
            schema_errors = schema_entries.len(),
            violations = report.len(),
            "validated data"
        );

        let mut entries = parse_entries;
        entries.append(&mut schema_entries);
        entries.extend(report.violations.iter().map(ReportEntry::violation));
        if !entries.is_empty() {
            self.reporter.emit(&entries)?;
            return halt(ExitStatus::DataInvalid);
        }

        Ok(corpus)
    }

    fn fail_config<T>(&self, message: String) -> Result<T> {
        self.reporter
            .emit(&[ReportEntry::error(message).with_type("config")])?;
        halt(ExitStatus::ConfigInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{exit_status, repo, TEAMS_AND_USERS};

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let result = Workspace::load(dir.path(), None).map(|_| ());
        assert_eq!(exit_status(result), Some(ExitStatus::ConfigInvalid));
    }

    #[test]
    fn test_format_flag_overrides_config() {
        let config = TEAMS_AND_USERS.replace("version: 1.0.0", "version: 1.0.0\nreporting: { mode: yaml }");
        let dir = repo(&config, &[]);

        let workspace = Workspace::load(dir.path(), None).unwrap();
        assert_eq!(workspace.reporter.format, ReportFormat::Yaml);
        let workspace = Workspace::load(dir.path(), Some(ReportFormat::Json)).unwrap();
        assert_eq!(workspace.reporter.format, ReportFormat::Json);
    }

    #[test]
    fn test_corpus_carries_rows_and_path_metadata() {
        let dir = repo(
            TEAMS_AND_USERS,
            &[
                ("teams/red.yaml", "id: red\nname: Red\n"),
                ("users.csv", "id,team\nu1,red\nu2,red\n"),
            ],
        );
        let workspace = Workspace::load(dir.path(), None).unwrap();
        let files = workspace.discover().unwrap();
        assert_eq!(files.len(), 2);

        let corpus = workspace.validate_data(&files).unwrap();
        let teams = corpus.items_of("team");
        assert_eq!(teams[0].path_metadata.get("path.team_id").map(String::as_str), Some("red"));
        let users = corpus.items_of("user");
        assert_eq!(users[1].row_index, Some(1));
        assert_eq!(users[1].file_path, "users.csv");
    }
}
