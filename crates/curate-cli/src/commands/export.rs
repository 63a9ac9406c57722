//! Export command

use crate::exit::{halt, ExitStatus};
use crate::pipeline::Workspace;
use crate::report::ReportEntry;
use anyhow::Result;
use curate_config::ReportFormat;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct ExportArgs {
    pub format: Option<ReportFormat>,
    pub root: PathBuf,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let workspace = Workspace::load(&args.root, args.format)?;

    let files = workspace.discover()?;
    let corpus = workspace.validate_data(&files)?;

    if !workspace.config.has_outputs() {
        eprintln!("no types define output");
        return Ok(());
    }

    let records: HashMap<String, Vec<Value>> = workspace
        .config
        .types
        .iter()
        .map(|type_def| {
            let data = corpus
                .items_of(&type_def.name)
                .iter()
                .map(|item| item.data.clone())
                .collect();
            (type_def.name.clone(), data)
        })
        .collect();

    let (results, errors) = curate_export::export(&workspace.root, &workspace.config, &records);

    for result in &results {
        eprintln!(
            "exported {} items to {} ({})",
            result.count,
            result.path.display(),
            result.format
        );
    }

    if !errors.is_empty() {
        let entries: Vec<_> = errors
            .iter()
            .map(|e| ReportEntry::error(e.to_string()).with_type("export"))
            .collect();
        workspace.reporter.emit(&entries)?;
        return halt(ExitStatus::ExportFailure);
    }

    Ok(())
}
