//! Canonical formatting command

use crate::exit::{halt, ExitStatus};
use crate::pipeline::Workspace;
use crate::report::ReportEntry;
use anyhow::Result;
use curate_config::ReportFormat;
use curate_tidy::{render_unified_diff, tidy_file, TidyMode};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

pub struct TidyArgs {
    pub write: bool,
    pub format: Option<ReportFormat>,
    pub root: PathBuf,
}

pub fn run(args: TidyArgs) -> Result<()> {
    let workspace = Workspace::load(&args.root, args.format)?;

    if !workspace.config.tidy.enabled {
        eprintln!("tidy is disabled");
        return Ok(());
    }

    let mode = if args.write {
        TidyMode::Write
    } else {
        TidyMode::Check
    };
    let files = workspace.discover()?;
    let text_report = workspace.reporter.format == ReportFormat::Text;
    let color = io::stdout().is_terminal();

    let mut errors = Vec::new();
    let mut pending = Vec::new();
    let mut stdout = io::stdout().lock();

    for file in &files {
        let Some(type_def) = workspace.config.type_def(&file.type_name) else {
            continue;
        };
        let outcome = match tidy_file(
            &workspace.root.join(&file.path),
            type_def.input,
            type_def.sort_arrays_by(),
            type_def.delimiter(),
            mode,
        ) {
            Ok(outcome) => outcome,
            Err(e) => {
                errors.push(
                    ReportEntry::error(e.to_string())
                        .with_type(file.type_name.clone())
                        .with_file(file.path.clone()),
                );
                continue;
            }
        };
        if !outcome.changed {
            continue;
        }

        match mode {
            TidyMode::Write => eprintln!("tidied: {}", file.path),
            TidyMode::Check => {
                if text_report {
                    let diff = render_unified_diff(&file.path, &outcome.original, &outcome.tidied, color);
                    stdout.write_all(diff.as_bytes())?;
                }
                pending.push(
                    ReportEntry::error("file needs tidying")
                        .with_type(file.type_name.clone())
                        .with_file(file.path.clone()),
                );
            }
        }
    }
    stdout.flush()?;
    drop(stdout);

    if !errors.is_empty() {
        workspace.reporter.emit(&errors)?;
        return halt(ExitStatus::TidyFailure);
    }
    if !pending.is_empty() {
        if text_report {
            eprintln!(
                "{} file(s) need tidying; run `curate tidy --write` to fix them",
                pending.len()
            );
        } else {
            workspace.reporter.emit(&pending)?;
        }
        return halt(ExitStatus::TidyFailure);
    }

    Ok(())
}
