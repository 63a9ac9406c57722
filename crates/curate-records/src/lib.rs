//! Curate Records - Turn data files into records
//!
//! Parses JSON, YAML and CSV inputs into JSON-like records and validates
//! each record against its type's JSON Schema.

mod delimited;
mod parse;
mod schema;

pub use parse::{parse_records, Record, RecordError};
pub use schema::{apply_strict_mode, SchemaCache};
