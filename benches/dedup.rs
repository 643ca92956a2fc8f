// benches/dedup.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cert_scrape::dedup::{resolve_discard, resolve_mark};
use cert_scrape::record::Record;

fn sample_records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record {
            seq: i,
            date: chrono::NaiveDate::from_ymd_opt(2022, 1, (i % 28 + 1) as u32),
            cve: Some(format!("CVE-2022-{:04}", i % 500)),
            title: format!("Security Advisory 2022-{:03}", i % 200),
            source: format!("2022-{:03}.html", i % 200),
            url: format!("https://cert.europa.eu/publications/security-advisories/2022-{:03}/", i % 200),
        })
        .collect()
}

fn bench_dedup(c: &mut Criterion) {
    let records = sample_records(10_000);

    c.bench_function("resolve_discard_10k", |b| {
        b.iter(|| {
            let (canonical, duplicates) = resolve_discard(black_box(records.clone()));
            black_box(canonical.len() + duplicates.len())
        })
    });

    c.bench_function("resolve_mark_10k", |b| {
        b.iter(|| {
            let mut batch = black_box(records.clone());
            black_box(resolve_mark(&mut batch))
        })
    });
}

criterion_group!(benches, bench_dedup);
criterion_main!(benches);
