//! Load summary display
//!
//! A one-line account of what the loader did, meant for stderr so that
//! stdout stays clean for the formatted result.

use colored::*;
use costline_loader::LoadSummary;

/// Render a load summary, colored unless `NO_COLOR` is set or `colored` is false
pub fn format_load_summary(summary: &LoadSummary, colored: bool) -> String {
    let colored = colored && std::env::var("NO_COLOR").is_err();

    let loaded = format!(
        "Loaded {} line items from {} rows",
        summary.inserted, summary.rows_read
    );
    let mut parts = vec![if colored {
        loaded.green().to_string()
    } else {
        loaded
    }];

    if summary.duplicates > 0 {
        let duplicates = format!("{} duplicates skipped", summary.duplicates);
        parts.push(if colored {
            duplicates.yellow().to_string()
        } else {
            duplicates
        });
    }
    if summary.skipped > 0 {
        let skipped = format!("{} invalid rows skipped", summary.skipped);
        parts.push(if colored {
            skipped.red().to_string()
        } else {
            skipped
        });
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_summary() {
        let summary = LoadSummary {
            rows_read: 10,
            inserted: 7,
            duplicates: 2,
            skipped: 1,
            ..Default::default()
        };
        assert_eq!(
            format_load_summary(&summary, false),
            "Loaded 7 line items from 10 rows, 2 duplicates skipped, 1 invalid rows skipped"
        );
    }

    #[test]
    fn test_clean_load_has_no_warnings() {
        let summary = LoadSummary {
            rows_read: 3,
            inserted: 3,
            ..Default::default()
        };
        assert_eq!(
            format_load_summary(&summary, false),
            "Loaded 3 line items from 3 rows"
        );
    }
}
