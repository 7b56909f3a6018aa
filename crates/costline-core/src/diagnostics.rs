//! Structured warnings produced while ingesting and querying
//!
//! Conditions that are not errors (a duplicate line item, an ignored group
//! field, a skipped row) are returned to the caller as [`Diagnostic`] values
//! alongside the result that produced them, and logged through `tracing`.

use crate::types::Uid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal event observed during ingestion or aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A line item with the same identity and start time was already stored
    DuplicateLineItem { uid: Uid, start: DateTime<Utc> },
    /// A group-by field name was not recognised and was ignored
    UnsupportedGroupField { field: String },
    /// A row failed to decode and was skipped
    SkippedRow { line: usize, reason: String },
}

impl Diagnostic {
    /// Log this diagnostic at its natural level
    pub fn log(&self) {
        match self {
            Self::DuplicateLineItem { .. } => tracing::debug!("{self}"),
            Self::UnsupportedGroupField { .. } | Self::SkippedRow { .. } => {
                tracing::warn!("{self}")
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLineItem { uid, start } => write!(
                f,
                "Line item {uid} starting {} already exists, skipped",
                start.format("%Y-%m-%dT%H:%M:%SZ")
            ),
            Self::UnsupportedGroupField { field } => {
                write!(f, "Unsupported field to group by, {field}, ignored")
            }
            Self::SkippedRow { line, reason } => write!(f, "Skipped line {line}: {reason}"),
        }
    }
}
