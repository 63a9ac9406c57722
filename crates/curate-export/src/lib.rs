//! Curate Export - Write validated records to their output files

mod export;

pub use export::{export, render, ExportResult};
