//! Shared test utilities for unit tests
//!
//! Integration tests (in tests/) cannot access this module because it's
//! marked with #[cfg(test)]. They have their own helpers in tests/common/mod.rs.

use crate::decoder::{Column, HeaderIndex};
use crate::identity::IdentityHasher;
use crate::types::{Bill, LineItem};
use chrono::{DateTime, TimeZone, Utc};

/// UTC instant on the hour
pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// A line item with a positive cost and empty attributes
pub fn line_item(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> LineItem {
    LineItem {
        uid: IdentityHasher::default().hash(id),
        start,
        end,
        availability_zone: String::new(),
        blended_cost: 1.0,
        blended_rate: 1.0,
        currency_code: "USD".to_string(),
        legal_entity: String::new(),
        line_item_description: String::new(),
        line_item_type: "Usage".to_string(),
        normalization_factor: None,
        operation: String::new(),
        product_code: String::new(),
        resource_id: String::new(),
        tax_type: String::new(),
        unblended_cost: 1.0,
        unblended_rate: None,
        usage_account_id: "111111111111".to_string(),
        usage_amount: Some(1.0),
        usage_start_date: start,
        usage_end_date: end,
        usage_type: String::new(),
        bill: Bill {
            billing_entity: "AWS".to_string(),
            bill_type: "Anniversary".to_string(),
            invoice_id: String::new(),
            payer_account_id: 123_456_789_012,
            billing_period_start: utc(2020, 5, 1, 0),
            billing_period_end: utc(2020, 6, 1, 0),
        },
    }
}

/// Builder for raw report rows laid out in [`Column::ALL`] order
pub struct RowBuilder {
    values: Vec<String>,
}

impl RowBuilder {
    /// Header index matching rows produced by this builder
    pub fn header_index() -> HeaderIndex {
        let header: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        HeaderIndex::from_header(&header).unwrap()
    }

    /// A valid row for a one-hour item on 2020-05-01
    pub fn new(id: &str) -> Self {
        Self {
            values: vec![String::new(); Column::ALL.len()],
        }
        .set(Column::LineItemId, id)
        .interval("2020-05-01T00:00:00Z/2020-05-01T01:00:00Z")
        .set(Column::BlendedCost, "1.0")
        .set(Column::BlendedRate, "1.0")
        .set(Column::CurrencyCode, "USD")
        .set(Column::LineItemType, "Usage")
        .set(Column::UnblendedCost, "1.0")
        .set(Column::UsageAccountId, "111111111111")
        .set(Column::UsageAmount, "1")
        .set(Column::UsageStartDate, "2020-05-01T00:00:00Z")
        .set(Column::UsageEndDate, "2020-05-01T01:00:00Z")
        .set(Column::BillingEntity, "AWS")
        .set(Column::BillType, "Anniversary")
        .set(Column::PayerAccountId, "123456789012")
        .set(Column::BillingPeriodStartDate, "2020-05-01T00:00:00Z")
        .set(Column::BillingPeriodEndDate, "2020-06-01T00:00:00Z")
    }

    /// Set `identity/TimeInterval`
    pub fn interval(self, interval: &str) -> Self {
        self.set(Column::TimeInterval, interval)
    }

    /// Set any column
    pub fn set(mut self, column: Column, value: &str) -> Self {
        self.values[column as usize] = value.to_string();
        self
    }

    pub fn build(self) -> Row {
        Row {
            values: self.values,
        }
    }
}

/// An owned raw row
pub struct Row {
    values: Vec<String>,
}

impl Row {
    /// Borrow the row as decoder input
    pub fn fields(&self) -> Vec<&str> {
        self.values.iter().map(String::as_str).collect()
    }
}
