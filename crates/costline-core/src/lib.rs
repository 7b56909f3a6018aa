//! Core types and engine for costline
//!
//! This crate provides the line-item model, the record decoder, the
//! time-indexed store, and the range and group-by queries that run over it.
//! Reading and decompressing report files lives in `costline-loader`;
//! rendering results lives in `costline-terminal`.

pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod identity;
pub mod query;
pub mod report;
pub mod timezone;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use diagnostics::Diagnostic;
pub use error::{CostlineError, Result};
pub use identity::IdentityHasher;
pub use query::{Aggregation, FieldPolicy, GroupField};
pub use report::{IngestOutcome, Report};
pub use types::{Bill, LineItem, TimeWindow, Uid};
