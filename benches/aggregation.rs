use chrono::{Duration, TimeZone, Utc};
use costline::{FieldPolicy, LineItem, Report, TimeWindow};
use costline_core::identity::IdentityHasher;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn create_test_report(count: usize) -> Report {
    let hasher = IdentityHasher::default();
    let base = Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap();
    let mut report = Report::new();

    for i in 0..count {
        let start = base + Duration::hours((i / 10) as i64);
        report.ingest(LineItem {
            uid: hasher.hash(&format!("line-item-{i}")),
            start,
            end: start + Duration::hours(1),
            product_code: ["AmazonEC2", "AmazonS3", "AWSLambda"][i % 3].to_string(),
            operation: ["RunInstances", "PutObject", "Invoke"][i % 3].to_string(),
            usage_account_id: format!("{:012}", i % 7),
            unblended_cost: (i % 97) as f64 * 0.013,
            ..Default::default()
        });
    }
    report
}

fn benchmark_range_query(c: &mut Criterion) {
    let report = create_test_report(10_000);
    let base = Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap();

    let mut group = c.benchmark_group("range_query");
    for hours in [24, 240, 1000] {
        let window = TimeWindow::new(base, base + Duration::hours(hours)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(hours), &window, |b, window| {
            b.iter(|| report.range_query(black_box(window)).len())
        });
    }
    group.finish();
}

fn benchmark_group_by(c: &mut Criterion) {
    let report = create_test_report(10_000);
    let base = Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap();
    let window = TimeWindow::new(base, base + Duration::days(31)).unwrap();

    let mut group = c.benchmark_group("group_by");
    group.bench_function("product_operation", |b| {
        b.iter(|| {
            report
                .group_by(
                    black_box(&["lineItem/ProductCode", "lineItem/Operation"]),
                    &window,
                    FieldPolicy::Strict,
                )
                .unwrap()
        })
    });
    group.bench_function("usage_account", |b| {
        b.iter(|| {
            report
                .group_by(
                    black_box(&["lineItem/UsageAccountId"]),
                    &window,
                    FieldPolicy::Strict,
                )
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, benchmark_range_query, benchmark_group_by);
criterion_main!(benches);
