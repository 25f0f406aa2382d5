//! Benchmarks for the energy model and the optimization loop
//!
//! Run with: cargo bench -p h2vqe-core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use h2vqe_core::problems::coefficients;
use h2vqe_core::runners::{EnergySurfaceScanner, VqeRunner, linspace};
use h2vqe_core::{Cobyla, Spsa, evaluate};

/// Benchmark a single energy evaluation
fn bench_evaluate(c: &mut Criterion) {
    let h = coefficients(0.735);
    let params = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];

    c.bench_function("evaluate", |b| {
        b.iter(|| evaluate(black_box(&params), black_box(&h)));
    });
}

/// Benchmark full optimizations at several budgets
fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("vqe_run");

    for max_iterations in &[10, 50, 100] {
        group.bench_with_input(
            BenchmarkId::new("cobyla", max_iterations),
            max_iterations,
            |b, &n| {
                b.iter(|| {
                    let mut runner = VqeRunner::with_optimizer(0.735, Cobyla::new());
                    runner.run_with_rng(None, n, StdRng::seed_from_u64(42))
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("spsa", max_iterations),
            max_iterations,
            |b, &n| {
                b.iter(|| {
                    let mut runner = VqeRunner::with_optimizer(0.735, Spsa::new());
                    runner.run_with_rng(None, n, StdRng::seed_from_u64(42))
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the default bond-length scan
fn bench_scan(c: &mut Criterion) {
    let scanner = EnergySurfaceScanner::new();
    let grid = linspace(0.3, 2.0, 15).unwrap();

    c.bench_function("scan_15", |b| {
        b.iter(|| scanner.scan(black_box(&grid)));
    });
}

criterion_group!(benches, bench_evaluate, bench_run, bench_scan);
criterion_main!(benches);
