//! Report export throughput benchmarks
//!
//! Measures the full resolve → compile → fill → export pipeline with varying:
//! - Record counts (1, 100, 1000)
//! - Output formats (all six)
//! - Template caching (on, off)
//!
//! Run benchmarks: `cargo bench --bench export_throughput`
//!
//! Compare specific groups:
//! ```
//! cargo bench --bench export_throughput -- "format"
//! cargo bench --bench export_throughput -- "template_cache"
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use inventory_export::ExportSettings;
use inventory_report::ReportService;
use inventory_report::config::ReportConfig;
use inventory_types::{ExportFormat, Item};
use std::hint::black_box;

fn generate_items(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| Item::new(format!("Item {}", i), (i % 50) as i32, i as f64 * 0.25))
        .collect()
}

fn service(cache_compiled: bool) -> ReportService {
    let config = ReportConfig {
        cache_compiled,
        ..Default::default()
    };
    ReportService::from_config(&config, ExportSettings::default())
}

/// PDF export with varying record counts
fn benchmark_record_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_count");
    let service = service(true);

    for count in [1, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        let items = generate_items(count);

        group.bench_with_input(BenchmarkId::new("pdf", count), &items, |b, items| {
            b.iter(|| {
                let report = service
                    .export_report(black_box(items), ExportFormat::Pdf)
                    .expect("export failed");
                black_box(report.len())
            });
        });
    }

    group.finish();
}

/// Every output format over the same 100 items
fn benchmark_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    let service = service(true);
    let items = generate_items(100);
    group.throughput(Throughput::Elements(items.len() as u64));

    for format in ExportFormat::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(format), &format, |b, &format| {
            b.iter(|| {
                let report = service
                    .export_report(black_box(&items), format)
                    .expect("export failed");
                black_box(report.len())
            });
        });
    }

    group.finish();
}

/// Cost of recompiling the template on every request
fn benchmark_template_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_cache");
    let items = generate_items(10);

    for cache_compiled in [true, false] {
        let service = service(cache_compiled);
        let label = if cache_compiled { "cached" } else { "uncached" };
        group.bench_function(label, |b| {
            b.iter(|| {
                let report = service
                    .export_report(black_box(&items), ExportFormat::Csv)
                    .expect("export failed");
                black_box(report.len())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_record_counts,
    benchmark_formats,
    benchmark_template_cache
);
criterion_main!(benches);
