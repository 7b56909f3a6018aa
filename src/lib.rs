//! costline - Sum spend from cloud cost and usage reports
//!
//! This library provides functionality to:
//! - Load gzip-compressed CSV cost and usage reports into a time-indexed store
//! - Query line items whose service interval overlaps a time window
//! - Sum unblended cost grouped by a composite key of report columns
//! - Render results as a table or as JSON
//!
//! # Examples
//!
//! ```no_run
//! use costline::{FieldPolicy, ReportLoader, TimeWindow};
//! use chrono::{TimeZone, Utc};
//!
//! #[tokio::main]
//! async fn main() -> costline::Result<()> {
//!     let loaded = ReportLoader::new().load_path("cur.csv.gz").await?;
//!
//!     let window = TimeWindow::new(
//!         Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap(),
//!         Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap(),
//!     )?;
//!     let costs = loaded.report.group_by(
//!         &["lineItem/ProductCode", "lineItem/Operation"],
//!         &window,
//!         FieldPolicy::Strict,
//!     )?;
//!
//!     for (key, cost) in &costs.totals {
//!         println!("{key}: {cost}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;

// Re-export commonly used types
pub use costline_core::{
    Aggregation, CostlineError, FieldPolicy, GroupField, LineItem, Report, Result, TimeWindow,
};
pub use costline_loader::{ErrorPolicy, LoadSummary, LoadedReport, ReportLoader};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
