//! Record decoder: raw CSV fields to validated [`LineItem`]s
//!
//! The decoder is a pure function of a row's fields and the header layout.
//! It knows nothing about the store or the input stream.
//!
//! # Examples
//!
//! ```
//! use costline_core::decoder::{Column, HeaderIndex, LineItemDecoder};
//! use costline_core::identity::IdentityHasher;
//!
//! let header: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
//! let index = HeaderIndex::from_header(&header).unwrap();
//! let decoder = LineItemDecoder::new(index, IdentityHasher::default());
//!
//! let mut row = vec![""; Column::ALL.len()];
//! row[Column::LineItemId as usize] = "li-1";
//! row[Column::TimeInterval as usize] = "2020-05-01T00:00:00Z/2020-05-01T01:00:00Z";
//! row[Column::BlendedCost as usize] = "0.5";
//! row[Column::BlendedRate as usize] = "0.25";
//! row[Column::UnblendedCost as usize] = "0.5";
//! row[Column::UsageAmount as usize] = "2";
//! row[Column::UsageStartDate as usize] = "2020-05-01T00:00:00Z";
//! row[Column::UsageEndDate as usize] = "2020-05-01T01:00:00Z";
//! row[Column::PayerAccountId as usize] = "123456789012";
//! row[Column::BillingPeriodStartDate as usize] = "2020-05-01T00:00:00Z";
//! row[Column::BillingPeriodEndDate as usize] = "2020-06-01T00:00:00Z";
//!
//! let item = decoder.decode(&row).unwrap();
//! assert_eq!(item.unblended_cost, 0.5);
//! assert_eq!(item.normalization_factor, None);
//! assert_eq!(item.bill.payer_account_id, 123456789012);
//! ```

use crate::error::{CostlineError, Result};
use crate::identity::IdentityHasher;
use crate::types::{Bill, LineItem};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashMap;

/// Timestamp layout used by every date column of the report
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Columns read by the decoder
///
/// The discriminant doubles as the slot in [`HeaderIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    LineItemId,
    TimeInterval,
    AvailabilityZone,
    BlendedCost,
    BlendedRate,
    CurrencyCode,
    LegalEntity,
    LineItemDescription,
    LineItemType,
    NormalizationFactor,
    Operation,
    ProductCode,
    ResourceId,
    TaxType,
    UnblendedCost,
    UnblendedRate,
    UsageAccountId,
    UsageAmount,
    UsageStartDate,
    UsageEndDate,
    UsageType,
    BillingEntity,
    BillType,
    InvoiceId,
    PayerAccountId,
    BillingPeriodStartDate,
    BillingPeriodEndDate,
}

impl Column {
    /// Every column, in discriminant order
    pub const ALL: [Column; 27] = [
        Column::LineItemId,
        Column::TimeInterval,
        Column::AvailabilityZone,
        Column::BlendedCost,
        Column::BlendedRate,
        Column::CurrencyCode,
        Column::LegalEntity,
        Column::LineItemDescription,
        Column::LineItemType,
        Column::NormalizationFactor,
        Column::Operation,
        Column::ProductCode,
        Column::ResourceId,
        Column::TaxType,
        Column::UnblendedCost,
        Column::UnblendedRate,
        Column::UsageAccountId,
        Column::UsageAmount,
        Column::UsageStartDate,
        Column::UsageEndDate,
        Column::UsageType,
        Column::BillingEntity,
        Column::BillType,
        Column::InvoiceId,
        Column::PayerAccountId,
        Column::BillingPeriodStartDate,
        Column::BillingPeriodEndDate,
    ];

    /// Header name as it appears in the report
    pub fn name(&self) -> &'static str {
        match self {
            Self::LineItemId => "identity/LineItemId",
            Self::TimeInterval => "identity/TimeInterval",
            Self::AvailabilityZone => "lineItem/AvailabilityZone",
            Self::BlendedCost => "lineItem/BlendedCost",
            Self::BlendedRate => "lineItem/BlendedRate",
            Self::CurrencyCode => "lineItem/CurrencyCode",
            Self::LegalEntity => "lineItem/LegalEntity",
            Self::LineItemDescription => "lineItem/LineItemDescription",
            Self::LineItemType => "lineItem/LineItemType",
            Self::NormalizationFactor => "lineItem/NormalizationFactor",
            Self::Operation => "lineItem/Operation",
            Self::ProductCode => "lineItem/ProductCode",
            Self::ResourceId => "lineItem/ResourceId",
            Self::TaxType => "lineItem/TaxType",
            Self::UnblendedCost => "lineItem/UnblendedCost",
            Self::UnblendedRate => "lineItem/UnblendedRate",
            Self::UsageAccountId => "lineItem/UsageAccountId",
            Self::UsageAmount => "lineItem/UsageAmount",
            Self::UsageStartDate => "lineItem/UsageStartDate",
            Self::UsageEndDate => "lineItem/UsageEndDate",
            Self::UsageType => "lineItem/UsageType",
            Self::BillingEntity => "bill/Entity",
            Self::BillType => "bill/BillType",
            Self::InvoiceId => "bill/InvoiceId",
            Self::PayerAccountId => "bill/PayerAccountId",
            Self::BillingPeriodStartDate => "bill/BillingPeriodStartDate",
            Self::BillingPeriodEndDate => "bill/BillingPeriodEndDate",
        }
    }
}

/// Position of every required column within a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    positions: [usize; Column::ALL.len()],
    required_width: usize,
}

impl HeaderIndex {
    /// Build the index from the header row
    ///
    /// A name repeated in the header resolves to its last occurrence.
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` for the first required column the header lacks
    pub fn from_header(header: &[&str]) -> Result<Self> {
        let by_name: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, i))
            .collect();

        let mut positions = [0; Column::ALL.len()];
        for column in Column::ALL {
            positions[column as usize] = *by_name
                .get(column.name())
                .ok_or_else(|| CostlineError::MissingColumn(column.name().to_string()))?;
        }

        let required_width = positions.iter().max().map_or(0, |max| max + 1);
        Ok(Self {
            positions,
            required_width,
        })
    }

    /// Index of `column` within a row
    pub fn position(&self, column: Column) -> usize {
        self.positions[column as usize]
    }

    /// Minimum number of fields a row must carry
    pub fn required_width(&self) -> usize {
        self.required_width
    }
}

/// Turns raw rows into [`LineItem`]s
#[derive(Debug, Clone)]
pub struct LineItemDecoder {
    header: HeaderIndex,
    hasher: IdentityHasher,
}

impl LineItemDecoder {
    /// Create a decoder for rows laid out as `header` describes
    pub fn new(header: HeaderIndex, hasher: IdentityHasher) -> Self {
        Self { header, hasher }
    }

    /// The header layout this decoder reads
    pub fn header(&self) -> &HeaderIndex {
        &self.header
    }

    /// Decode one row
    ///
    /// # Errors
    ///
    /// - `RowTooShort` if the row is narrower than the header requires
    /// - `MalformedInterval` if the interval does not split into two parts
    /// - `InvalidTimestamp` / `InvalidNumber` naming the failing column
    /// - `InvertedInterval` if the interval ends before it starts
    pub fn decode(&self, fields: &[&str]) -> Result<LineItem> {
        if fields.len() < self.header.required_width() {
            return Err(CostlineError::RowTooShort {
                expected: self.header.required_width(),
                found: fields.len(),
            });
        }
        let get = |column: Column| fields[self.header.position(column)];

        let (start, end) = parse_interval(get(Column::TimeInterval))?;

        let bill = Bill {
            billing_entity: get(Column::BillingEntity).to_string(),
            bill_type: get(Column::BillType).to_string(),
            invoice_id: get(Column::InvoiceId).to_string(),
            payer_account_id: parse_number(Column::PayerAccountId, get(Column::PayerAccountId))?,
            billing_period_start: parse_timestamp(
                Column::BillingPeriodStartDate,
                get(Column::BillingPeriodStartDate),
            )?,
            billing_period_end: parse_timestamp(
                Column::BillingPeriodEndDate,
                get(Column::BillingPeriodEndDate),
            )?,
        };

        Ok(LineItem {
            uid: self.hasher.hash(get(Column::LineItemId)),
            start,
            end,
            availability_zone: get(Column::AvailabilityZone).to_string(),
            blended_cost: parse_number(Column::BlendedCost, get(Column::BlendedCost))?,
            blended_rate: parse_number(Column::BlendedRate, get(Column::BlendedRate))?,
            currency_code: get(Column::CurrencyCode).to_string(),
            legal_entity: get(Column::LegalEntity).to_string(),
            line_item_description: get(Column::LineItemDescription).to_string(),
            line_item_type: get(Column::LineItemType).to_string(),
            normalization_factor: parse_optional_number(
                Column::NormalizationFactor,
                get(Column::NormalizationFactor),
            )?,
            operation: get(Column::Operation).to_string(),
            product_code: get(Column::ProductCode).to_string(),
            resource_id: get(Column::ResourceId).to_string(),
            tax_type: get(Column::TaxType).to_string(),
            unblended_cost: parse_number(Column::UnblendedCost, get(Column::UnblendedCost))?,
            unblended_rate: parse_optional_number(
                Column::UnblendedRate,
                get(Column::UnblendedRate),
            )?,
            usage_account_id: get(Column::UsageAccountId).to_string(),
            usage_amount: parse_optional_number(
                Column::UsageAmount,
                get(Column::UsageAmount),
            )?,
            usage_start_date: parse_timestamp(Column::UsageStartDate, get(Column::UsageStartDate))?,
            usage_end_date: parse_timestamp(Column::UsageEndDate, get(Column::UsageEndDate))?,
            usage_type: get(Column::UsageType).to_string(),
            bill,
        })
    }
}

/// Split and parse a `<start>/<end>` interval
pub fn parse_interval(interval: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let mut parts = interval.split('/');
    let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CostlineError::MalformedInterval(interval.to_string()));
    };

    let start = parse_timestamp(Column::TimeInterval, start)?;
    let end = parse_timestamp(Column::TimeInterval, end)?;
    if end < start {
        return Err(CostlineError::InvertedInterval { start, end });
    }
    Ok((start, end))
}

fn parse_timestamp(column: Column, value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|_| CostlineError::InvalidTimestamp {
            field: column.name(),
            value: value.to_string(),
        })
}

fn parse_number<T: std::str::FromStr>(column: Column, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| CostlineError::InvalidNumber {
        field: column.name(),
        value: value.to_string(),
    })
}

// Empty means absent; anything else must parse.
fn parse_optional_number(column: Column, value: &str) -> Result<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_number(column, value).map(Some)
}
