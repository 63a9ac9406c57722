//! Curate Discovery - Find the data files of each configured type
//!
//! Walks the repository tree, assigns every matching file to exactly one
//! type and derives the `path.*` metadata used by `path_equals_attr`.

mod metadata;
mod walk;

pub use metadata::builtin_metadata;
pub use walk::{discover, DiscoveredFile, Discovery};
