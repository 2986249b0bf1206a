//! Criterion benchmarks for the backward-induction driver.
//!
//! Measures a full walk for scalar contracts and for the Asian average grid
//! across tree sizes, including trees wide enough to take the parallel
//! continuation path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::math::UniformProbabilities;
use pricer_models::instruments::{
    AmericanOption, AsianArithmeticOption, EuropeanOption, OptionParams, PutCall,
};
use pricer_pricing::induction::price;
use pricer_pricing::tree::UniformTrinomialTree;

/// Boyle tree for spot 100, rate 5%, volatility 20%, one year.
fn tree(steps: usize) -> UniformTrinomialTree {
    let (rate, vol) = (0.05_f64, 0.2_f64);
    let dt = 1.0 / steps as f64;
    let up = (vol * (3.0 * dt).sqrt()).exp();
    let drift = (rate - 0.5 * vol * vol) * (dt / (12.0 * vol * vol)).sqrt();
    UniformTrinomialTree::new(
        100.0,
        1.0 / up,
        1.0,
        steps,
        UniformProbabilities::new(1.0 / 6.0 - drift, 2.0 / 3.0, 1.0 / 6.0 + drift),
        (-rate * dt).exp(),
    )
    .unwrap()
}

/// Benchmark European and American pricing by tree size.
fn bench_scalar_contracts(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_contracts");
    let params = OptionParams::new(100.0, 1.0).unwrap();
    let european = EuropeanOption::new(params, PutCall::Put);
    let american = AmericanOption::new(params, PutCall::Put);

    for steps in [100, 500, 2500] {
        let tree = tree(steps);
        group.bench_with_input(BenchmarkId::new("european", steps), &tree, |b, tree| {
            b.iter(|| price(black_box(&european), black_box(tree)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("american", steps), &tree, |b, tree| {
            b.iter(|| price(black_box(&american), black_box(tree)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the Asian average grid by grid size.
fn bench_asian_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("asian_grid");
    group.sample_size(20);
    let params = OptionParams::new(100.0, 1.0).unwrap();
    let tree = tree(100);

    for points in [11, 41, 101] {
        let asian = AsianArithmeticOption::new(params, PutCall::Call, points).unwrap();
        group.bench_with_input(BenchmarkId::new("points", points), &asian, |b, asian| {
            b.iter(|| price(black_box(asian), black_box(&tree)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scalar_contracts, bench_asian_grid);
criterion_main!(benches);
