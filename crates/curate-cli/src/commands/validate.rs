//! Configuration and data validation command

use crate::pipeline::Workspace;
use anyhow::Result;
use curate_config::ReportFormat;
use std::path::PathBuf;

pub struct ValidateArgs {
    pub config_only: bool,
    pub format: Option<ReportFormat>,
    pub root: PathBuf,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let workspace = Workspace::load(&args.root, args.format)?;

    if args.config_only {
        return finish(&workspace, "configuration is valid".to_string());
    }
    if workspace.config.types.is_empty() {
        eprintln!("No types configured in .curate; nothing to validate.");
        return Ok(());
    }

    let files = workspace.discover()?;
    let corpus = workspace.validate_data(&files)?;

    finish(
        &workspace,
        format!("validated {} item(s) from {} file(s)", corpus.len(), files.len()),
    )
}

fn finish(workspace: &Workspace, summary: String) -> Result<()> {
    if let Some(line) = success_line(workspace.reporter.format, summary) {
        eprintln!("{}", line);
    }
    Ok(())
}

/// Machine-readable formats keep stdout and stderr empty on success
fn success_line(format: ReportFormat, summary: String) -> Option<String> {
    match format {
        ReportFormat::Text => Some(summary),
        ReportFormat::Json | ReportFormat::Yaml => None,
    }
}
