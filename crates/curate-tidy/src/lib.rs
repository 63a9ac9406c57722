//! Curate Tidy - Canonical formatting for data files
//!
//! Rewrites JSON, YAML and CSV inputs into one stable layout (sorted keys,
//! sorted columns, optionally sorted arrays and rows) and renders what
//! would change as a unified diff.

mod diff;
mod tidy;

pub use diff::render_unified_diff;
pub use tidy::{tidy_content, tidy_file, TidyMode, TidyOutcome};
