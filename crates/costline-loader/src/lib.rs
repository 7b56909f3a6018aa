//! Report loader for costline
//!
//! This crate reads gzip-compressed CSV cost and usage reports, decodes
//! each row, and ingests the results into a `costline_core::Report`.

pub mod data_loader;

#[cfg(test)]
pub mod test_utils;

pub use data_loader::{ErrorPolicy, LoadSummary, LoadedReport, ReportLoader};
