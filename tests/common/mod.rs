//! Common test utilities and helpers for costline tests
//!
//! Builds cost and usage report CSV text and writes it gzip-compressed to a
//! temporary directory.

#![allow(dead_code)]

use costline_core::decoder::Column;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header row listing every column in declaration order
pub fn header() -> String {
    Column::ALL
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Builder for one report data row
#[derive(Debug, Clone)]
pub struct RowBuilder {
    id: String,
    interval: String,
    product: String,
    operation: String,
    usage_type: String,
    usage_account: String,
    unblended_cost: String,
}

impl RowBuilder {
    /// A valid one-hour EC2 row with cost 1.0
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            interval: "2020-05-01T00:00:00Z/2020-05-01T01:00:00Z".to_string(),
            product: "AmazonEC2".to_string(),
            operation: "RunInstances".to_string(),
            usage_type: "BoxUsage:t3.micro".to_string(),
            usage_account: "111111111111".to_string(),
            unblended_cost: "1.0".to_string(),
        }
    }

    pub fn interval(mut self, interval: &str) -> Self {
        self.interval = interval.to_string();
        self
    }

    pub fn product(mut self, product: &str) -> Self {
        self.product = product.to_string();
        self
    }

    pub fn operation(mut self, operation: &str) -> Self {
        self.operation = operation.to_string();
        self
    }

    pub fn usage_account(mut self, account: &str) -> Self {
        self.usage_account = account.to_string();
        self
    }

    pub fn cost(mut self, cost: &str) -> Self {
        self.unblended_cost = cost.to_string();
        self
    }

    /// Render as a CSV line
    pub fn build(&self) -> String {
        let (usage_start, usage_end) = self
            .interval
            .split_once('/')
            .unwrap_or((&self.interval, &self.interval));
        Column::ALL
            .iter()
            .map(|column| match column {
                Column::LineItemId => self.id.as_str(),
                Column::TimeInterval => self.interval.as_str(),
                Column::ProductCode => self.product.as_str(),
                Column::Operation => self.operation.as_str(),
                Column::UsageType => self.usage_type.as_str(),
                Column::UsageAccountId => self.usage_account.as_str(),
                Column::UnblendedCost => self.unblended_cost.as_str(),
                Column::BlendedCost | Column::BlendedRate | Column::UsageAmount => "1",
                Column::UnblendedRate => "0.0104",
                Column::CurrencyCode => "USD",
                Column::LineItemType => "Usage",
                Column::LegalEntity => "Amazon Web Services, Inc.",
                Column::BillingEntity => "AWS",
                Column::BillType => "Anniversary",
                Column::InvoiceId => "12345678",
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
}

/// Full CSV document from pre-rendered lines
pub fn csv_document(lines: &[String]) -> String {
    let mut csv = header();
    for line in lines {
        csv.push('\n');
        csv.push_str(line);
    }
    csv.push('\n');
    csv
}

/// Write `lines` as a gzip-compressed report in `dir`
pub fn write_gz_report(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(csv_document(lines).as_bytes()).unwrap();
    encoder.finish().unwrap();
    path
}

/// Assert two costs are equal within floating-point tolerance
pub fn assert_cost_eq(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
