//! Curate Core - Foundational types for the curate toolkit
//!
//! This crate provides the pieces every other curate crate depends on:
//! - `CurateError` - the shared error type
//! - `Result` - the crate-wide result alias
//! - `SortedKeys` - serializes JSON values with mapping keys in order

mod error;
mod sorted;

pub use error::{CurateError, Result};
pub use sorted::SortedKeys;
