//! Time-indexed line-item store
//!
//! [`Report`] owns every ingested [`LineItem`], bucketed by interval start.
//! The buckets live in a `BTreeMap`, so the distinct start times are always
//! available in ascending order without a separate index to maintain.
//!
//! Ingestion takes `&mut self` and queries take `&self`: the borrow checker
//! enforces the batch-then-query usage the store is built for. Callers that
//! share a report across threads wrap it in a lock for the ingestion phase.
//!
//! # Examples
//!
//! ```
//! use costline_core::report::{IngestOutcome, Report};
//! # use costline_core::decoder::{Column, HeaderIndex, LineItemDecoder};
//! # use costline_core::identity::IdentityHasher;
//! # let header: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
//! # let decoder = LineItemDecoder::new(HeaderIndex::from_header(&header).unwrap(), IdentityHasher::default());
//! # let mut row = vec![""; Column::ALL.len()];
//! # row[Column::LineItemId as usize] = "li-1";
//! # row[Column::TimeInterval as usize] = "2020-05-01T00:00:00Z/2020-05-01T01:00:00Z";
//! # for c in [Column::BlendedCost, Column::BlendedRate, Column::UnblendedCost, Column::UsageAmount, Column::PayerAccountId] { row[c as usize] = "1"; }
//! # for c in [Column::UsageStartDate, Column::UsageEndDate, Column::BillingPeriodStartDate, Column::BillingPeriodEndDate] { row[c as usize] = "2020-05-01T00:00:00Z"; }
//! # let item = decoder.decode(&row).unwrap();
//!
//! let mut report = Report::new();
//! assert_eq!(report.ingest(item.clone()), IngestOutcome::Inserted);
//!
//! // Same identity, same start: absorbed
//! assert!(matches!(report.ingest(item), IngestOutcome::Duplicate(_)));
//! assert_eq!(report.len(), 1);
//! ```

use crate::diagnostics::Diagnostic;
use crate::types::{LineItem, Uid};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::trace;

/// Result of ingesting one line item
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The item was stored
    Inserted,
    /// An item with the same identity and start already exists; nothing changed
    Duplicate(Diagnostic),
}

/// In-memory store of line items indexed by interval start
#[derive(Debug, Default, Clone)]
pub struct Report {
    items_by_start: BTreeMap<DateTime<Utc>, Vec<LineItem>>,
    len: usize,
}

impl Report {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a line item
    ///
    /// The item's start bucket is scanned for an entry with the same [`Uid`];
    /// if one exists the item is dropped and a `DuplicateLineItem`
    /// diagnostic is returned. Otherwise the item is appended to its bucket,
    /// creating the bucket when the start time is new.
    pub fn ingest(&mut self, item: LineItem) -> IngestOutcome {
        let bucket = self.items_by_start.entry(item.start).or_default();

        if bucket.iter().any(|existing| existing.uid == item.uid) {
            let diagnostic = Diagnostic::DuplicateLineItem {
                uid: item.uid,
                start: item.start,
            };
            diagnostic.log();
            return IngestOutcome::Duplicate(diagnostic);
        }

        trace!(uid = %item.uid, start = %item.start, "ingested line item");
        bucket.push(item);
        self.len += 1;
        IngestOutcome::Inserted
    }

    /// Ingest every item, returning diagnostics for the duplicates
    pub fn ingest_all<I>(&mut self, items: I) -> Vec<Diagnostic>
    where
        I: IntoIterator<Item = LineItem>,
    {
        items
            .into_iter()
            .filter_map(|item| match self.ingest(item) {
                IngestOutcome::Inserted => None,
                IngestOutcome::Duplicate(diagnostic) => Some(diagnostic),
            })
            .collect()
    }

    /// Number of stored line items
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct start times
    pub fn bucket_count(&self) -> usize {
        self.items_by_start.len()
    }

    /// Distinct start times, strictly ascending
    pub fn sorted_starts(&self) -> impl DoubleEndedIterator<Item = &DateTime<Utc>> + '_ {
        self.items_by_start.keys()
    }

    /// Items starting exactly at `start`, in insertion order
    pub fn bucket(&self, start: &DateTime<Utc>) -> Option<&[LineItem]> {
        self.items_by_start.get(start).map(Vec::as_slice)
    }

    /// Whether an item with this identity and start is stored
    pub fn contains(&self, uid: Uid, start: &DateTime<Utc>) -> bool {
        self.bucket(start)
            .is_some_and(|items| items.iter().any(|item| item.uid == uid))
    }

    /// Every item, ordered by start then insertion
    pub fn items(&self) -> impl Iterator<Item = &LineItem> + '_ {
        self.items_by_start.values().flatten()
    }

    /// Earliest interval start
    pub fn earliest_start(&self) -> Option<DateTime<Utc>> {
        self.sorted_starts().next().copied()
    }

    /// Latest interval start
    pub fn latest_start(&self) -> Option<DateTime<Utc>> {
        self.sorted_starts().next_back().copied()
    }

    pub(crate) fn buckets_through(
        &self,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = &[LineItem]> + '_ {
        self.items_by_start
            .range(..=end)
            .map(|(_, items)| items.as_slice())
    }
}
