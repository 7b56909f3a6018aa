//! Core domain types for costline
//!
//! This module contains the record types that flow from the decoder into the
//! store: [`LineItem`] with its embedded [`Bill`], the hashed identity [`Uid`],
//! and the [`TimeWindow`] used by range queries.

use crate::error::{CostlineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hashed line-item identity
///
/// Used only for de-duplication inside a start-time bucket, never for ordering.
///
/// # Examples
/// ```
/// use costline_core::types::Uid;
///
/// let uid = Uid::new(42);
/// assert_eq!(uid.value(), 42);
/// assert_eq!(uid.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(u64);

impl Uid {
    /// Wrap a raw hash value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw hash value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Billing-statement metadata attached to each line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Entity that issued the bill (`bill/Entity`)
    pub billing_entity: String,
    /// Anniversary, Purchase, Refund, ...
    pub bill_type: String,
    /// Invoice id, empty until the invoice is issued
    pub invoice_id: String,
    /// Paying (management) account
    pub payer_account_id: u64,
    /// Billing period start
    pub billing_period_start: DateTime<Utc>,
    /// Billing period end
    pub billing_period_end: DateTime<Utc>,
}

/// One billed usage record
///
/// Built by [`LineItemDecoder`](crate::decoder::LineItemDecoder) and owned by
/// the [`Report`](crate::report::Report) once ingested. The store exposes items
/// by shared reference only, so they are never modified after decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Hash of `identity/LineItemId`
    pub uid: Uid,
    /// Interval start
    pub start: DateTime<Utc>,
    /// Interval end, never before `start`
    pub end: DateTime<Utc>,

    pub availability_zone: String,
    pub blended_cost: f64,
    pub blended_rate: f64,
    pub currency_code: String,
    pub legal_entity: String,
    pub line_item_description: String,
    pub line_item_type: String,
    /// `None` when the column is empty
    pub normalization_factor: Option<f64>,
    pub operation: String,
    pub product_code: String,
    pub resource_id: String,
    pub tax_type: String,
    pub unblended_cost: f64,
    /// `None` when the column is empty
    pub unblended_rate: Option<f64>,
    pub usage_account_id: String,
    /// `None` when the column is empty
    pub usage_amount: Option<f64>,
    pub usage_start_date: DateTime<Utc>,
    pub usage_end_date: DateTime<Utc>,
    pub usage_type: String,

    pub bill: Bill,
}

impl LineItem {
    /// Whether this item's interval overlaps `window`
    ///
    /// An item overlaps when it ends strictly after the window starts and
    /// starts no later than the window ends.
    pub fn overlaps(&self, window: &TimeWindow) -> bool {
        self.end > window.start && self.start <= window.end
    }
}

/// Query window over interval start/end times
///
/// # Examples
/// ```
/// use costline_core::types::TimeWindow;
/// use chrono::{TimeZone, Utc};
///
/// let may = TimeWindow::new(
///     Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(may.duration().num_days(), 31);
///
/// assert!(TimeWindow::new(may.end, may.start).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Window start
    pub start: DateTime<Utc>,
    /// Window end (inclusive for item starts)
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, rejecting `end < start`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(CostlineError::InvalidArgument(format!(
                "time window ends before it starts: {start} > {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Length of the window
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%dT%H:%M:%SZ"),
            self.end.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }
}
