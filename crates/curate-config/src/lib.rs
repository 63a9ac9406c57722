//! Curate Config - The `.curate` configuration file
//!
//! Loads the repository configuration, applies defaults, checks it for
//! semantic problems and compiles the file-matching patterns once per run.

mod model;
mod patterns;
mod validate;

pub use model::{
    Config, CsvDef, InputFormat, MatchDef, OutputDef, OutputFormat, ReportFormat, Reporting,
    StrictMode, TidySettings, TypeDef, TypeTidy, CONFIG_FILE_NAME,
};
pub use patterns::{PatternCache, TypePatterns};
pub use validate::{validate, ConfigDiagnostics};
