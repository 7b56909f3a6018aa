//! Error types for costline
//!
//! This module defines the error types used throughout the costline crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use costline_core::error::{CostlineError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to CostlineError
//!     let _file = std::fs::read_to_string("nonexistent.csv.gz")?;
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Main error type for costline operations
///
/// Decoder failures (`MalformedInterval`, `InvalidTimestamp`, `InvalidNumber`,
/// `InvertedInterval`) abort a load unless the loader runs with the skip policy.
/// Row-shape failures (`MissingColumn`, `RowTooShort`) are raised by the row
/// source before a row ever reaches the decoder.
#[derive(Error, Debug)]
pub enum CostlineError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Interval string did not split into exactly two parts
    #[error("Malformed time interval: '{0}'")]
    MalformedInterval(String),

    /// A timestamp column failed to parse
    #[error("Invalid timestamp in {field}: '{value}'")]
    InvalidTimestamp {
        /// Column that failed
        field: &'static str,
        /// Raw value
        value: String,
    },

    /// A numeric column failed to parse
    #[error("Invalid number in {field}: '{value}'")]
    InvalidNumber {
        /// Column that failed
        field: &'static str,
        /// Raw value
        value: String,
    },

    /// Interval end precedes its start
    #[error("Time interval ends before it starts: {start} > {end}")]
    InvertedInterval {
        /// Parsed interval start
        start: DateTime<Utc>,
        /// Parsed interval end
        end: DateTime<Utc>,
    },

    /// Header row lacks a required column
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A data row is narrower than the header requires
    #[error("Row has {found} fields, expected at least {expected}")]
    RowTooShort {
        /// Minimum field count
        expected: usize,
        /// Actual field count
        found: usize,
    },

    /// Group-by field is not one of the recognised names
    #[error("Unsupported group-by field: {0}")]
    UnsupportedGroupField(String),

    /// Decode failure with the physical line it came from
    #[error("Line {line}: {source}")]
    Row {
        /// 1-based line number in the decompressed text
        line: usize,
        /// Underlying decode error
        #[source]
        source: Box<CostlineError>,
    },

    /// Input had no header row
    #[error("Report is empty: no header row")]
    EmptyReport,

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CostlineError {
    /// Attach a line number to a decode error
    pub fn at_line(self, line: usize) -> Self {
        Self::Row {
            line,
            source: Box::new(self),
        }
    }
}

/// Convenience type alias for Results in costline
pub type Result<T> = std::result::Result<T, CostlineError>;
