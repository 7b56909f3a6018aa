//! Output formatting module for costline
//!
//! This module provides formatters for displaying aggregation results:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output, a flat object mapping each
//!   composite key to its summed cost
//!
//! # Examples
//!
//! ```
//! use costline_core::query::{Aggregation, GroupField};
//! use costline_terminal::output::get_formatter;
//!
//! let mut aggregation = Aggregation {
//!     fields: vec![GroupField::ProductCode],
//!     ..Default::default()
//! };
//! aggregation.totals.insert("AmazonEC2".to_string(), 12.5);
//!
//! let json = get_formatter(true).format_costs(&aggregation).unwrap();
//! assert!(json.contains("\"AmazonEC2\": 12.5"));
//!
//! let table = get_formatter(false).format_costs(&aggregation).unwrap();
//! assert!(table.contains("AmazonEC2"));
//! ```

use costline_core::error::Result;
use costline_core::query::Aggregation;
use prettytable::{Cell, Row, Table, format};

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format summed costs per composite key
    fn format_costs(&self, aggregation: &Aggregation) -> Result<String>;
}

/// Table formatter for human-readable output
///
/// One column per group field and one row per key, most expensive first,
/// followed by a total.
pub struct TableFormatter;

impl TableFormatter {
    /// Format currency with dollar sign
    fn format_currency(amount: f64) -> String {
        format!("${amount:.2}")
    }

    fn titles(aggregation: &Aggregation) -> Vec<&str> {
        if aggregation.fields.is_empty() {
            return vec!["Group"];
        }
        aggregation.fields.iter().map(|field| field.name()).collect()
    }

    // Keys built without segments (hand-made aggregations) fill the first column.
    fn key_cells<'a>(
        aggregation: &'a Aggregation,
        key: &'a str,
        width: usize,
    ) -> Vec<&'a str> {
        let mut cells: Vec<&str> = match aggregation.segments.get(key) {
            Some(segments) if !segments.is_empty() => {
                segments.iter().map(String::as_str).collect()
            }
            _ => vec![key],
        };
        cells.resize(width, "");
        cells
            .into_iter()
            .map(|cell| if cell.is_empty() { "-" } else { cell })
            .collect()
    }
}

impl OutputFormatter for TableFormatter {
    fn format_costs(&self, aggregation: &Aggregation) -> Result<String> {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        let titles = Self::titles(aggregation);
        let width = titles.len();
        let mut title_cells: Vec<Cell> = titles
            .into_iter()
            .map(|title| Cell::new(title).style_spec("b"))
            .collect();
        title_cells.push(Cell::new("Cost").style_spec("b"));
        table.set_titles(Row::new(title_cells));

        let mut rows: Vec<(&String, &f64)> = aggregation.totals.iter().collect();
        rows.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (key, cost) in rows {
            let mut cells: Vec<Cell> = Self::key_cells(aggregation, key, width)
                .into_iter()
                .map(Cell::new)
                .collect();
            cells.push(Cell::new(&Self::format_currency(*cost)).style_spec("r"));
            table.add_row(Row::new(cells));
        }

        let mut total = vec![Cell::new("TOTAL").style_spec("b")];
        total.extend((1..width).map(|_| Cell::new("")));
        total.push(Cell::new(&Self::format_currency(aggregation.total())).style_spec("br"));
        table.add_row(Row::new(total));

        Ok(table.to_string())
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_costs(&self, aggregation: &Aggregation) -> Result<String> {
        Ok(serde_json::to_string_pretty(&aggregation.totals)?)
    }
}

/// Get the appropriate formatter based on output preference
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}
