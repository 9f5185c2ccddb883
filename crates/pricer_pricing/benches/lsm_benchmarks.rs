//! Criterion benchmarks for the LSM American option engine.
//!
//! Benchmarks cover:
//! - GBM lattice generation per backend (1K, 10K paths)
//! - Backward induction over one batch
//! - Full fixed-budget pricing runs
//! - Greeks via bump-and-revalue

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::{ContractParameters, OptionKind};
use pricer_pricing::greeks::{GreekSampling, GreeksConfig, GreeksEstimator};
use pricer_pricing::lsm::{
    ComputeBackend, ContinuationValueEstimator, ExercisePolicy, PathSimulator, PricingEngine,
    SimulationConfig,
};
use pricer_pricing::rng::PricerRng;

fn atm_put() -> ContractParameters {
    ContractParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionKind::Put)
}

fn fixed_budget(batch_size: usize, batches: usize, backend: ComputeBackend) -> SimulationConfig {
    SimulationConfig::builder()
        .steps(50)
        .batch_size(batch_size)
        .max_paths(batch_size * batches)
        .tolerance(1e-9)
        .adaptive_batching(false)
        .backend(backend)
        .seed(42)
        .build()
        .expect("valid benchmark configuration")
}

/// Benchmark lattice generation for each backend.
fn bench_path_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_generation");
    let contract = atm_put();

    for backend in [ComputeBackend::Cpu, ComputeBackend::Rayon] {
        for n_paths in [1_000, 10_000] {
            group.bench_with_input(
                BenchmarkId::new(backend.as_str(), n_paths),
                &n_paths,
                |b, &n| {
                    let simulator = PathSimulator::new(&contract, 50, backend);
                    let mut rng = PricerRng::from_seed(42);
                    b.iter(|| black_box(simulator.simulate(n, &mut rng)));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark one backward-induction pass.
fn bench_backward_induction(c: &mut Criterion) {
    let mut group = c.benchmark_group("backward_induction");
    let contract = atm_put();
    let dt = contract.maturity / 50.0;

    for degree in [2, 4] {
        let lattice = PathSimulator::new(&contract, 50, ComputeBackend::Cpu)
            .simulate(5_000, &mut PricerRng::from_seed(7));
        let policy = ExercisePolicy::new(
            contract.kind,
            contract.strike,
            (-contract.rate * dt).exp(),
            ContinuationValueEstimator::new(degree),
            ComputeBackend::Cpu,
        );
        group.bench_with_input(BenchmarkId::new("degree", degree), &degree, |b, _| {
            b.iter(|| black_box(policy.evaluate(&lattice)));
        });
    }

    group.finish();
}

/// Benchmark complete pricing runs with a fixed path budget.
fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("lsm_engine");
    group.sample_size(20);

    for backend in [ComputeBackend::Cpu, ComputeBackend::Rayon] {
        let engine = PricingEngine::new(atm_put(), fixed_budget(5_000, 4, backend))
            .expect("valid benchmark inputs");
        group.bench_function(BenchmarkId::new("american_put_20k", backend.as_str()), |b| {
            b.iter(|| black_box(engine.price()));
        });
    }

    group.finish();
}

/// Benchmark bump-and-revalue Greeks.
fn bench_greeks(c: &mut Criterion) {
    let mut group = c.benchmark_group("greeks");
    group.sample_size(10);

    let estimator = GreeksEstimator::new(
        fixed_budget(2_000, 2, ComputeBackend::Rayon),
        GreeksConfig {
            sampling: GreekSampling::CommonRandomNumbers,
            ..GreeksConfig::default()
        },
    );
    let contract = atm_put();
    group.bench_function("bump_and_revalue", |b| {
        b.iter(|| black_box(estimator.estimate(&contract)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_path_generation,
    bench_backward_induction,
    bench_engine,
    bench_greeks
);
criterion_main!(benches);
