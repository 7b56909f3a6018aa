//! CLI interface for costline
//!
//! This module defines the command-line interface using clap.
//!
//! # Example
//!
//! ```bash
//! # Cost per product and operation for May 2020
//! costline cur.csv.gz --since 2020-05 --until 2020-06
//!
//! # Cost per usage account and usage type as JSON
//! costline cur.csv.gz -g lineItem/UsageAccountId -g lineItem/UsageType --json
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use costline_core::error::{CostlineError, Result};
use costline_core::identity::IdentityHasher;
use costline_core::query::FieldPolicy;
use costline_core::report::Report;
use costline_core::timezone::TimezoneConfig;
use costline_core::types::TimeWindow;
use costline_loader::ErrorPolicy;
use std::path::PathBuf;

/// Group-by fields used when none are given
pub const DEFAULT_GROUP_FIELDS: &[&str] = &["lineItem/ProductCode", "lineItem/Operation"];

/// Sum unblended cost from a cost and usage report over a time window
#[derive(Parser, Debug, Clone)]
#[command(name = "costline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the gzip-compressed CSV report
    pub report: PathBuf,

    /// Field to group by (repeatable or comma-separated)
    #[arg(long, short = 'g', value_delimiter = ',')]
    pub group_by: Vec<String>,

    /// Window start (YYYY-MM-DD, YYYY-MM or RFC 3339); defaults to the earliest item start
    #[arg(long)]
    pub since: Option<String>,

    /// Window end (YYYY-MM-DD, YYYY-MM or RFC 3339); defaults to the latest item start
    #[arg(long)]
    pub until: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Timezone for date-only bounds (e.g. "America/New_York", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z')]
    pub timezone: Option<String>,

    /// Use UTC for date-only bounds (overrides --timezone)
    #[arg(long)]
    pub utc: bool,

    /// Identity hash for line-item ids: xxh64, xxh64:<seed> or xxh3
    #[arg(long, env = "COSTLINE_HASH", default_value = "xxh64")]
    pub hash: IdentityHasher,

    /// Skip rows that fail to decode instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,

    /// Ignore unrecognised group-by fields instead of failing
    #[arg(long)]
    pub lenient_fields: bool,

    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Group-by fields, falling back to [`DEFAULT_GROUP_FIELDS`]
    pub fn group_fields(&self) -> Vec<String> {
        if self.group_by.is_empty() {
            DEFAULT_GROUP_FIELDS.iter().map(|s| s.to_string()).collect()
        } else {
            self.group_by.clone()
        }
    }

    /// Row failure policy selected by `--skip-invalid`
    pub fn error_policy(&self) -> ErrorPolicy {
        if self.skip_invalid {
            ErrorPolicy::Skip
        } else {
            ErrorPolicy::Abort
        }
    }

    /// Group field policy selected by `--lenient-fields`
    pub fn field_policy(&self) -> FieldPolicy {
        if self.lenient_fields {
            FieldPolicy::Lenient
        } else {
            FieldPolicy::Strict
        }
    }
}

/// Parse a bare date (YYYY-MM-DD, or YYYY-MM for the first of the month)
pub fn parse_date_filter(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"))
        .map_err(|_| {
            CostlineError::InvalidDate(format!(
                "'{value}', expected YYYY-MM-DD, YYYY-MM or RFC 3339"
            ))
        })
}

/// Parse a window bound into a UTC instant
///
/// RFC 3339 timestamps are taken as-is. Bare dates resolve to local midnight
/// in the configured timezone.
pub fn parse_window_bound(value: &str, tz: &TimezoneConfig) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    tz.local_midnight(parse_date_filter(value)?)
}

/// Resolve the query window, filling missing bounds from the report
///
/// An omitted start falls back to the earliest item start and an omitted end
/// to the latest, clamped so the given bound never ends up inverted. Only two
/// explicit bounds can be rejected as inverted. An empty report with no bounds
/// yields a zero-length window at the Unix epoch.
pub fn resolve_window(
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    report: &Report,
) -> Result<TimeWindow> {
    let (start, end) = match (since, until) {
        (Some(since), Some(until)) => (since, until),
        (Some(since), None) => {
            let end = report.latest_start().map_or(since, |latest| latest.max(since));
            (since, end)
        }
        (None, Some(until)) => {
            let start = report
                .earliest_start()
                .map_or(until, |earliest| earliest.min(until));
            (start, until)
        }
        (None, None) => {
            let start = report.earliest_start().unwrap_or(DateTime::UNIX_EPOCH);
            (start, report.latest_start().unwrap_or(start))
        }
    };
    TimeWindow::new(start, end)
}

/// Log filter directive: `RUST_LOG` when set, else `costline=info` with
/// `--verbose`, else `warn`
pub fn log_directive(verbose: bool, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive.to_string(),
        _ if verbose => "costline=info".to_string(),
        _ => "warn".to_string(),
    }
}
