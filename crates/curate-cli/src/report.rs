//! User-facing diagnostics

use anyhow::{Context, Result};
use curate_config::ReportFormat;
use curate_constraint::Violation;
use curate_records::RecordError;
use serde::Serialize;
use std::io::{self, Write};

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub level: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub message: String,
}

impl ReportEntry {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: "error".to_string(),
            type_name: None,
            file: None,
            row: None,
            message: message.into(),
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_row(mut self, row: Option<usize>) -> Self {
        self.row = row;
        self
    }

    /// A record that could not be read
    pub fn record(type_name: &str, error: &RecordError) -> Self {
        Self::error(error.message.clone())
            .with_type(type_name)
            .with_file(error.file.clone())
            .with_row(error.row)
    }

    pub fn violation(violation: &Violation) -> Self {
        let mut entry = Self::error(format!("[{}] {}", violation.constraint_type, violation.message))
            .with_type(violation.type_name.clone())
            .with_row(violation.row_index);
        entry.file = violation.file_path.clone();
        entry
    }

    /// `error: [type] file (row N) message`
    pub fn to_text(&self) -> String {
        let mut parts = vec![format!("{}:", self.level)];
        if let Some(type_name) = &self.type_name {
            parts.push(format!("[{}]", type_name));
        }
        if let Some(file) = &self.file {
            parts.push(file.clone());
        }
        if let Some(row) = self.row {
            parts.push(format!("(row {})", row));
        }
        parts.push(self.message.clone());
        parts.join(" ")
    }
}

/// Writes entries in the selected format
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    pub format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Text goes to stderr; JSON and YAML go to stdout
    pub fn emit(&self, entries: &[ReportEntry]) -> Result<()> {
        match self.format {
            ReportFormat::Text => {
                let mut stderr = io::stderr().lock();
                for entry in entries {
                    writeln!(stderr, "{}", entry.to_text())?;
                }
            }
            ReportFormat::Json | ReportFormat::Yaml => {
                let rendered = self.render(entries)?;
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(rendered.as_bytes())
                    .context("writing report")?;
                stdout.flush()?;
            }
        }
        Ok(())
    }

    /// The stdout form of a report; JSON and YAML only
    pub fn render(&self, entries: &[ReportEntry]) -> Result<String> {
        match self.format {
            ReportFormat::Text => Ok(entries
                .iter()
                .map(|e| format!("{}\n", e.to_text()))
                .collect()),
            ReportFormat::Json => {
                let mut text =
                    serde_json::to_string_pretty(entries).context("encoding JSON report")?;
                text.push('\n');
                Ok(text)
            }
            ReportFormat::Yaml => serde_yaml::to_string(entries).context("encoding YAML report"),
        }
    }
}
