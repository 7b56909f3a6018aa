//! Range queries and group-by-sum aggregation over a [`Report`]
//!
//! A range query returns every item whose interval overlaps a [`TimeWindow`]:
//! the item ends strictly after the window starts and starts no later than
//! the window ends. Aggregation runs a range query and sums unblended cost
//! per composite key, built from the requested [`GroupField`]s joined by `_`.
//!
//! # Examples
//!
//! ```no_run
//! use costline_core::query::{FieldPolicy, GroupField};
//! use costline_core::report::Report;
//! use costline_core::types::TimeWindow;
//! use chrono::{TimeZone, Utc};
//!
//! # fn example(report: &Report) -> costline_core::Result<()> {
//! let may = TimeWindow::new(
//!     Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap(),
//! )?;
//!
//! let costs = report.group_by_sum(&[GroupField::ProductCode, GroupField::Operation], &may);
//! for (key, cost) in &costs {
//!     println!("{key}: {cost:.2}");
//! }
//!
//! // String field names, as supplied on the command line
//! let aggregation = report.group_by(&["lineItem/UsageType"], &may, FieldPolicy::Strict)?;
//! println!("total {:.2}", aggregation.total());
//! # Ok(())
//! # }
//! ```

use crate::decoder::Column;
use crate::diagnostics::Diagnostic;
use crate::error::{CostlineError, Result};
use crate::report::Report;
use crate::types::{LineItem, TimeWindow};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Separator between segments of a composite key
pub const KEY_SEPARATOR: &str = "_";

/// Attributes a report can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupField {
    LineItemType,
    Operation,
    ProductCode,
    ResourceId,
    TaxType,
    UsageAccountId,
    UsageType,
    /// Read from the item's bill
    PayerAccountId,
}

impl GroupField {
    /// Every supported field
    pub const ALL: [GroupField; 8] = [
        GroupField::LineItemType,
        GroupField::Operation,
        GroupField::ProductCode,
        GroupField::ResourceId,
        GroupField::TaxType,
        GroupField::UsageAccountId,
        GroupField::UsageType,
        GroupField::PayerAccountId,
    ];

    fn column(&self) -> Column {
        match self {
            Self::LineItemType => Column::LineItemType,
            Self::Operation => Column::Operation,
            Self::ProductCode => Column::ProductCode,
            Self::ResourceId => Column::ResourceId,
            Self::TaxType => Column::TaxType,
            Self::UsageAccountId => Column::UsageAccountId,
            Self::UsageType => Column::UsageType,
            Self::PayerAccountId => Column::PayerAccountId,
        }
    }

    /// Report column name of this field
    pub fn name(&self) -> &'static str {
        self.column().name()
    }

    /// String value of this field on `item`
    pub fn value<'a>(&self, item: &'a LineItem) -> Cow<'a, str> {
        match self {
            Self::LineItemType => Cow::Borrowed(&item.line_item_type),
            Self::Operation => Cow::Borrowed(&item.operation),
            Self::ProductCode => Cow::Borrowed(&item.product_code),
            Self::ResourceId => Cow::Borrowed(&item.resource_id),
            Self::TaxType => Cow::Borrowed(&item.tax_type),
            Self::UsageAccountId => Cow::Borrowed(&item.usage_account_id),
            Self::UsageType => Cow::Borrowed(&item.usage_type),
            Self::PayerAccountId => Cow::Owned(item.bill.payer_account_id.to_string()),
        }
    }
}

impl fmt::Display for GroupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for GroupField {
    type Err = CostlineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| CostlineError::UnsupportedGroupField(s.to_string()))
    }
}

/// How unrecognised group-by field names are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldPolicy {
    /// Fail the query with `UnsupportedGroupField`
    #[default]
    Strict,
    /// Ignore the field and report it as a diagnostic; it contributes no key
    /// segment
    Lenient,
}

/// Summed unblended cost per composite key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Fields the keys were built from, in key order
    pub fields: Vec<GroupField>,
    /// Cost per composite key
    pub totals: BTreeMap<String, f64>,
    /// Field values behind each key, in field order
    #[serde(default)]
    pub segments: BTreeMap<String, Vec<String>>,
    /// Fields ignored under [`FieldPolicy::Lenient`]
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Aggregation {
    /// Sum across all keys
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }
}

impl Report {
    /// Items whose interval overlaps `window`
    ///
    /// Items are ordered by start time, then insertion order within a start.
    pub fn range_query(&self, window: &TimeWindow) -> Vec<&LineItem> {
        self.buckets_through(window.end)
            .flatten()
            .filter(|item| item.end > window.start)
            .collect()
    }

    /// Sum unblended cost per composite key over items in `window`
    ///
    /// Only items with strictly positive unblended cost contribute. Keys
    /// that receive no contribution are absent from the result.
    pub fn group_by_sum(&self, fields: &[GroupField], window: &TimeWindow) -> BTreeMap<String, f64> {
        self.sum_groups(fields, window).0
    }

    /// Group by field names
    ///
    /// # Errors
    ///
    /// Under [`FieldPolicy::Strict`], returns `UnsupportedGroupField` for the
    /// first unrecognised name.
    pub fn group_by<S: AsRef<str>>(
        &self,
        fields: &[S],
        window: &TimeWindow,
        policy: FieldPolicy,
    ) -> Result<Aggregation> {
        let mut resolved = Vec::with_capacity(fields.len());
        let mut diagnostics = Vec::new();

        for name in fields {
            let name = name.as_ref();
            match (name.parse::<GroupField>(), policy) {
                (Ok(field), _) => resolved.push(field),
                (Err(e), FieldPolicy::Strict) => return Err(e),
                (Err(_), FieldPolicy::Lenient) => {
                    let diagnostic = Diagnostic::UnsupportedGroupField {
                        field: name.to_string(),
                    };
                    diagnostic.log();
                    diagnostics.push(diagnostic);
                }
            }
        }

        let (totals, segments) = self.sum_groups(&resolved, window);
        Ok(Aggregation {
            fields: resolved,
            totals,
            segments,
            diagnostics,
        })
    }

    // Totals per key, plus the field values each key was joined from.
    fn sum_groups(
        &self,
        fields: &[GroupField],
        window: &TimeWindow,
    ) -> (BTreeMap<String, f64>, BTreeMap<String, Vec<String>>) {
        let mut totals = BTreeMap::new();
        let mut segments = BTreeMap::new();
        let items = self.range_query(window);
        debug!("Grouping {} items in {}", items.len(), window);

        for item in items {
            if item.unblended_cost <= 0.0 {
                continue;
            }
            let parts: Vec<Cow<'_, str>> = fields.iter().map(|field| field.value(item)).collect();
            let key = parts.join(KEY_SEPARATOR);
            if !segments.contains_key(&key) {
                segments.insert(
                    key.clone(),
                    parts.into_iter().map(Cow::into_owned).collect(),
                );
            }
            *totals.entry(key).or_insert(0.0) += item.unblended_cost;
        }
        (totals, segments)
    }
}
