//! Property-based tests over reports loaded from generated CSV

mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{RowBuilder, csv_document};
use costline::{FieldPolicy, LoadedReport, ReportLoader, TimeWindow};
use proptest::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap()
}

fn stamp(hours: i64) -> String {
    (base() + Duration::hours(hours))
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

/// (id, start hour, duration hours, product index, cost in cents)
type Spec = (u8, i64, i64, usize, i64);

const PRODUCTS: &[&str] = &["AmazonEC2", "AmazonS3", "AWSLambda"];

fn spec_strategy() -> impl Strategy<Value = Spec> {
    (0u8..40, 0i64..72, 0i64..6, 0usize..PRODUCTS.len(), -200i64..2000)
}

fn load(specs: &[Spec]) -> LoadedReport {
    let rows: Vec<String> = specs
        .iter()
        .map(|(id, start, len, product, cents)| {
            RowBuilder::new(&format!("item-{id}"))
                .interval(&format!("{}/{}", stamp(*start), stamp(start + len)))
                .product(PRODUCTS[*product])
                .cost(&format!("{:.2}", *cents as f64 / 100.0))
                .build()
        })
        .collect();
    let csv = csv_document(&rows);
    ReportLoader::new().load_from_reader(csv.as_bytes()).unwrap()
}

proptest! {
    #[test]
    fn prop_index_strictly_ascending(specs in prop::collection::vec(spec_strategy(), 0..60)) {
        let loaded = load(&specs);
        let starts: Vec<_> = loaded.report.sorted_starts().copied().collect();
        for pair in starts.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        prop_assert_eq!(starts.len(), loaded.report.bucket_count());
        for start in &starts {
            prop_assert!(loaded.report.bucket(start).is_some_and(|b| !b.is_empty()));
        }
    }

    #[test]
    fn prop_each_identity_stored_once(specs in prop::collection::vec(spec_strategy(), 0..60)) {
        let loaded = load(&specs);
        let mut distinct: Vec<(u8, i64)> = specs.iter().map(|s| (s.0, s.1)).collect();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(loaded.report.len(), distinct.len());
        prop_assert_eq!(
            loaded.summary.inserted + loaded.summary.duplicates,
            specs.len()
        );
    }

    #[test]
    fn prop_range_query_matches_overlap_rule(
        specs in prop::collection::vec(spec_strategy(), 0..60),
        window_start in 0i64..80,
        window_len in 0i64..24,
    ) {
        let loaded = load(&specs);
        let window = TimeWindow::new(
            base() + Duration::hours(window_start),
            base() + Duration::hours(window_start + window_len),
        ).unwrap();

        let hits = loaded.report.range_query(&window);
        for item in loaded.report.items() {
            let expected = item.end > window.start && item.start <= window.end;
            let found = hits.iter().any(|hit| std::ptr::eq(*hit, item));
            prop_assert_eq!(found, expected);
        }
    }

    #[test]
    fn prop_group_sums_match_positive_costs(
        specs in prop::collection::vec(spec_strategy(), 0..60),
        window_start in 0i64..80,
        window_len in 0i64..24,
    ) {
        let loaded = load(&specs);
        let window = TimeWindow::new(
            base() + Duration::hours(window_start),
            base() + Duration::hours(window_start + window_len),
        ).unwrap();

        let aggregation = loaded
            .report
            .group_by(&["lineItem/ProductCode"], &window, FieldPolicy::Strict)
            .unwrap();

        for product in PRODUCTS {
            let expected: f64 = loaded
                .report
                .range_query(&window)
                .into_iter()
                .filter(|item| item.product_code == *product && item.unblended_cost > 0.0)
                .map(|item| item.unblended_cost)
                .sum();
            match aggregation.totals.get(*product) {
                Some(total) => {
                    prop_assert!(*total > 0.0);
                    prop_assert!((total - expected).abs() < 1e-6);
                }
                None => prop_assert_eq!(expected, 0.0),
            }
        }
    }
}
