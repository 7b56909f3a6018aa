//! Shared test utilities for unit tests
//!
//! Builds CSV text in the column layout the decoder expects.

use costline_core::decoder::Column;

/// CSV document builder, header row first
pub struct CsvFixture {
    lines: Vec<String>,
}

impl CsvFixture {
    /// Start a document with a header listing every column
    pub fn new() -> Self {
        let header: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        Self {
            lines: vec![header.join(",")],
        }
    }

    /// Append a raw data line
    pub fn row(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Render the document with a trailing newline
    pub fn build(self) -> String {
        let mut csv = self.lines.join("\n");
        csv.push('\n');
        csv
    }
}

/// A data line with the given identity, interval, product and unblended cost
pub fn row(id: &str, interval: &str, product: &str, unblended_cost: &str) -> String {
    let (usage_start, usage_end) = interval.split_once('/').unwrap_or((interval, interval));
    Column::ALL
        .iter()
        .map(|column| match column {
            Column::LineItemId => id,
            Column::TimeInterval => interval,
            Column::ProductCode => product,
            Column::UnblendedCost => unblended_cost,
            Column::BlendedCost | Column::BlendedRate | Column::UsageAmount => "1",
            Column::CurrencyCode => "USD",
            Column::LineItemType => "Usage",
            Column::UsageAccountId => "111111111111",
            Column::PayerAccountId => "123456789012",
            Column::UsageStartDate => usage_start,
            Column::UsageEndDate => usage_end,
            Column::BillingPeriodStartDate => "2020-05-01T00:00:00Z",
            Column::BillingPeriodEndDate => "2020-06-01T00:00:00Z",
            _ => "",
        })
        .collect::<Vec<_>>()
        .join(",")
}
