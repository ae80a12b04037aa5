use std::hint::black_box;

use chrono::{Duration, TimeZone, Utc};
use commit_browser::filters::{FilterSpec, filter_records, parse_query};
use commit_browser::models::CommitRecord;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Synthetic commits, one per hour, spread over a handful of authors
fn generate_records(num_records: usize) -> Vec<CommitRecord> {
    let base = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    (0..num_records)
        .map(|i| {
            let time = base + Duration::hours(i as i64);
            CommitRecord {
                id: format!("{:040x}", i),
                primary_text: format!("Dev {} <dev{}@example.com>", i % 7, i % 7),
                secondary_text: if i % 4 == 0 {
                    format!("Fix crash in module {}", i % 11)
                } else {
                    format!("Refactor module {}", i % 11)
                },
                magnitude: (i % 200) as u64,
                author_time: time,
                commit_time: time,
                full_message: format!("Change number {}", i),
            }
        })
        .collect()
}

fn bench_filter_application(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_application");

    let specs = [
        ("author_filter", parse_query("author:dev3").unwrap()),
        ("topic_filter", parse_query("topic:\"FIX CRASH\"").unwrap()),
        ("date_filter", parse_query("since:2023-02-01 until:2023-03-01").unwrap()),
        ("combined_filter", parse_query("author:dev3 topic:fix since:2023-02-01").unwrap()),
        ("empty_filter", FilterSpec::new()),
    ];

    for (name, spec) in specs.iter() {
        for size in [1_000, 10_000, 50_000].iter() {
            let records = generate_records(*size);

            group.throughput(Throughput::Elements(*size as u64));
            group.bench_with_input(BenchmarkId::new(*name, size), size, |b, _| {
                b.iter(|| filter_records(black_box(records.clone()), black_box(spec)));
            });
        }
    }

    group.finish();
}

fn bench_query_parsing(c: &mut Criterion) {
    c.bench_function("parse_query", |b| {
        b.iter(|| parse_query(black_box("author:jane AND topic:\"fix the build\" since:2024-01-01")).unwrap());
    });
}

criterion_group!(benches, bench_filter_application, bench_query_parsing);
criterion_main!(benches);
