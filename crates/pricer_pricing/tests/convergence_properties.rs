//! Statistical properties of the convergence machinery.
//!
//! # Test Categories
//!
//! 1. **Stopping Rule**: degenerate histories through the public tracker API
//! 2. **Coverage**: confidence intervals from independent seeds cover a
//!    high-precision reference
//! 3. **Budget**: non-converged runs still return a priced result

use pricer_core::types::{ContractParameters, OptionKind};
use pricer_pricing::lsm::{
    ConvergenceCriteria, ConvergenceTracker, PricingEngine, SimulationConfig,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn put() -> ContractParameters {
    ContractParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionKind::Put)
}

/// Exactly `batches` batches of 2000 paths on a 20-step grid.
fn fixed_batches(batches: usize, seed: u64) -> SimulationConfig {
    SimulationConfig::builder()
        .steps(20)
        .batch_size(2_000)
        .max_paths(2_000 * batches)
        .tolerance(1e-9)
        .adaptive_batching(false)
        .seed(seed)
        .build()
        .unwrap()
}

// ============================================================================
// Stopping Rule
// ============================================================================

#[test]
fn test_single_batch_history_not_converged() {
    let criteria = ConvergenceCriteria::new(1.0, 1, 1.0, 0.95).unwrap();
    let mut tracker = ConvergenceTracker::new(criteria);
    let stats = tracker.record(6.0);

    assert!(!stats.converged);
    assert_eq!(stats.std_dev, 0.0);
    assert_eq!(stats.margin_of_error, 0.0);
}

#[test]
fn test_identical_history_converges() {
    let criteria = ConvergenceCriteria::new(0.05, 3, 0.1, 0.95).unwrap();
    let mut tracker = ConvergenceTracker::new(criteria);
    for _ in 0..10 {
        tracker.record(6.0);
    }
    assert!(tracker.is_converged());
    assert_eq!(tracker.statistics().mean, 6.0);
}

// ============================================================================
// Coverage
// ============================================================================

#[test]
fn test_confidence_intervals_cover_reference() {
    init_tracing();

    // Same batch size and grid as the trials, so both carry the same
    // regression bias
    let reference = PricingEngine::new(put(), fixed_batches(200, 1))
        .unwrap()
        .price()
        .price;

    let trials = 20;
    let covered = (0..trials)
        .filter(|&trial| {
            let result = PricingEngine::new(put(), fixed_batches(10, 1_000 + trial))
                .unwrap()
                .price();
            let (lower, upper) = (result.statistics.ci_lower, result.statistics.ci_upper);
            lower <= reference && reference <= upper
        })
        .count();

    // Nominal 95%; ten batches with a normal quantile cover a little less
    assert!(covered >= 15, "{} of {} intervals covered {}", covered, trials, reference);
}

// ============================================================================
// Budget
// ============================================================================

#[test]
fn test_budget_exhaustion_returns_best_effort_price() {
    init_tracing();
    let result = PricingEngine::new(put(), fixed_batches(4, 17))
        .unwrap()
        .price();

    assert!(!result.converged);
    assert_eq!(result.batches, 4);
    assert_eq!(result.total_paths, 8_000);
    assert!(result.price > 5.0 && result.price < 7.0, "price {}", result.price);
}

#[test]
fn test_adaptive_run_converges_with_default_settings() {
    init_tracing();
    let config = SimulationConfig::builder()
        .tolerance(0.02)
        .seed(31)
        .build()
        .unwrap();
    let result = PricingEngine::new(put(), config).unwrap().price();

    assert!(result.converged);
    assert!(result.batches >= 3);
    let stats = result.statistics;
    assert!(stats.margin_of_error < 0.02 * stats.mean);
    assert!(stats.coefficient_of_variation < 0.1);
}
