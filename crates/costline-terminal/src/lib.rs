//! Terminal output formatting for costline
//!
//! This crate provides table and JSON formatters for aggregation results
//! and the load summary line.

pub mod output;
pub mod summary;

pub use output::{JsonFormatter, OutputFormatter, TableFormatter, get_formatter};
pub use summary::format_load_summary;
