//! Curate Selector - Path expressions over nested record data
//!
//! This crate provides the small selector language (`$`, `$.a.b`,
//! `$.items[*].id`) used by constraints to project values out of records.

mod evaluator;
mod parser;

pub use parser::{parse_selector, Segment, Selector, SelectorError};
