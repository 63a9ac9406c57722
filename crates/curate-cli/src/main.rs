//! Curate CLI - Validate, export and tidy a repository of structured records

mod commands;
mod exit;
mod logging;
mod pipeline;
mod report;

use clap::{Parser, Subcommand};
use commands::{export, tidy, validate, version};
use curate_config::ReportFormat;
use exit::{ExitStatus, Halt};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "curate")]
#[command(about = "Schema and constraint checks for repositories of structured records", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and every data file
    Validate {
        /// Only check the .curate configuration
        #[arg(long)]
        config_only: bool,

        /// Report format (text, json or yaml); overrides reporting.mode
        #[arg(long, value_parser = parse_format)]
        format: Option<ReportFormat>,

        /// Repository root
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Validate, then write the configured output files
    Export {
        /// Report format (text, json or yaml); overrides reporting.mode
        #[arg(long, value_parser = parse_format)]
        format: Option<ReportFormat>,

        /// Repository root
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Check data files against their canonical formatting
    Tidy {
        /// Rewrite files instead of showing a diff
        #[arg(long)]
        write: bool,

        /// Report format (text, json or yaml); overrides reporting.mode
        #[arg(long, value_parser = parse_format)]
        format: Option<ReportFormat>,

        /// Repository root
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Print the version
    Version,
}

fn parse_format(s: &str) -> Result<ReportFormat, String> {
    s.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    let result = match cli.command {
        Commands::Validate {
            config_only,
            format,
            root,
        } => validate::run(validate::ValidateArgs {
            config_only,
            format,
            root,
        }),
        Commands::Export { format, root } => export::run(export::ExportArgs { format, root }),
        Commands::Tidy {
            write,
            format,
            root,
        } => tidy::run(tidy::TidyArgs {
            write,
            format,
            root,
        }),
        Commands::Version => version::run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<Halt>() {
            Some(halt) => halt.status.into(),
            None => {
                eprintln!("error: {:#}", err);
                ExitStatus::ConfigInvalid.into()
            }
        },
    }
}
