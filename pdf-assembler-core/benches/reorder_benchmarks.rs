//! Reordering Performance Benchmarks
//!
//! Measures layout computation and live drag moves over strips of
//! increasing length.
//!
//! Run with: `cargo bench reorder_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdf_assembler::upload::IngestBatch;
use pdf_assembler::{Assembler, AssemblerConfig, ManualClock, Preview, SourceFile};
use std::sync::Arc;

fn assembler_with_pages(count: usize) -> Assembler {
    let previews = (0..count)
        .map(|i| {
            let (width, height) = if i % 3 == 0 { (110.0, 85.0) } else { (85.0, 110.0) };
            Preview::new(format!("data:{i}"), width, height)
        })
        .collect();
    let batch = IngestBatch {
        files: vec![SourceFile {
            name: "bench.pdf".to_string(),
            pdf: String::new(),
            previews,
        }],
        skipped: Vec::new(),
    };

    let mut assembler =
        Assembler::with_clock(AssemblerConfig::default(), Arc::new(ManualClock::new())).unwrap();
    assembler.commit_ingest(batch);
    assembler.flush();
    assembler
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for count in [10, 100, 1000] {
        let assembler = assembler_with_pages(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &assembler, |b, assembler| {
            b.iter(|| black_box(assembler.layout()))
        });
    }

    group.finish();
}

fn bench_drag_across_strip(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_across_strip");

    for count in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || assembler_with_pages(count),
                |mut assembler| {
                    let width = assembler.layout().content_width;
                    assembler.drag_start(0).unwrap();
                    let mut x = 0.0;
                    while x < width {
                        x += 40.0;
                        black_box(assembler.drag_move(x).unwrap());
                    }
                    assembler.drag_end().unwrap()
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_remove_and_purge(c: &mut Criterion) {
    c.bench_function("remove_and_purge_100", |b| {
        b.iter_batched(
            || assembler_with_pages(100),
            |mut assembler| {
                assembler.remove(50).unwrap();
                black_box(assembler.flush())
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_layout,
    bench_drag_across_strip,
    bench_remove_and_purge
);
criterion_main!(benches);
