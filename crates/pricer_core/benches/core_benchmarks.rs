//! Criterion benchmarks for pricer_core lattice kernels.
//!
//! Measures the discounted-expectation kernel and geometric state values
//! across layer widths on both sides of the parallel threshold.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::math::{
    discounted_expectation, geometric_state_values, node_count, TransitionMatrix,
    UniformProbabilities, PARALLEL_MIN_NODES,
};

/// Benchmark one continuation step by layer index.
fn bench_discounted_expectation(c: &mut Criterion) {
    let mut group = c.benchmark_group("discounted_expectation");
    let probs = UniformProbabilities::new(0.25, 0.5, 0.25);

    for layer in [100, PARALLEL_MIN_NODES / 2 - 1, 10_000] {
        let matrix = TransitionMatrix::uniform(node_count(layer), probs);
        let values: Vec<f64> = (0..node_count(layer + 1)).map(|k| k as f64).collect();
        group.bench_with_input(
            BenchmarkId::new("nodes", node_count(layer)),
            &(&matrix, &values),
            |b, (matrix, values)| {
                b.iter(|| discounted_expectation(0.9999, black_box(matrix), black_box(values), layer));
            },
        );
    }

    group.finish();
}

/// Benchmark geometric state value construction.
fn bench_state_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometric_state_values");

    for layer in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("layer", layer), &layer, |b, &layer| {
            b.iter(|| geometric_state_values(black_box(100.0_f64), 0.99, 1.0, layer));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_discounted_expectation, bench_state_values);
criterion_main!(benches);
