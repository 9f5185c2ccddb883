//! Batch orchestration for one LSM pricing run.
//!
//! The engine repeats simulate → exercise → aggregate on fresh batches,
//! feeding each batch price to a [`ConvergenceTracker`], until the stopping
//! rule holds or the path budget is spent. The reported price is the mean
//! of all batch prices.

use pricer_core::types::{ContractParameters, ValidationError};
use tracing::{debug, info, info_span, warn};

use super::config::SimulationConfig;
use super::convergence::{
    adaptive_batch_size, BatchStatistics, ConvergenceCriteria, ConvergenceTracker,
};
use super::exercise::ExercisePolicy;
use super::paths::PathSimulator;
use super::payoff::PayoffAggregator;
use super::regression::ContinuationValueEstimator;
use crate::rng::PricerRng;

/// Outcome of one [`PricingEngine`] run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineResult {
    /// Mean of all batch price estimates.
    pub price: f64,
    /// Statistics after the final batch.
    pub statistics: BatchStatistics,
    /// `false` when the path budget ran out before the stopping rule held.
    pub converged: bool,
    /// Paths simulated across all batches.
    pub total_paths: usize,
    /// Number of batches run.
    pub batches: usize,
    /// Batch size in effect when the run stopped.
    pub final_batch_size: usize,
    /// Seed the run was drawn from.
    pub seed: u64,
    /// Paths exercised before expiry, across all batches.
    pub early_exercises: usize,
    /// Regression fallbacks, across all batches.
    pub regression_fallbacks: usize,
}

/// LSM pricing engine bound to one contract and one configuration.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{ContractParameters, OptionKind};
/// use pricer_pricing::lsm::{PricingEngine, SimulationConfig};
///
/// let contract = ContractParameters::new(100.0, 105.0, 0.05, 0.2, 0.5, OptionKind::Put);
/// let config = SimulationConfig::builder()
///     .steps(20)
///     .batch_size(1_000)
///     .max_paths(10_000)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let engine = PricingEngine::new(contract, config).unwrap();
/// let result = engine.price();
///
/// assert!(result.price > 0.0);
/// assert!(result.total_paths >= 1_000);
/// ```
#[derive(Clone, Debug)]
pub struct PricingEngine {
    contract: ContractParameters,
    config: SimulationConfig,
    criteria: ConvergenceCriteria,
    simulator: PathSimulator,
    policy: ExercisePolicy,
    aggregator: PayoffAggregator,
}

impl PricingEngine {
    /// Validates inputs and prepares the per-run components.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an invalid contract or configuration.
    pub fn new(
        contract: ContractParameters,
        config: SimulationConfig,
    ) -> Result<Self, ValidationError> {
        contract.validate()?;
        config.validate()?;

        let criteria = ConvergenceCriteria::from_config(&config)?;
        let backend = config.backend();
        let simulator = PathSimulator::new(&contract, config.steps(), backend);
        let dt = simulator.params().dt;
        let policy = ExercisePolicy::new(
            contract.kind,
            contract.strike,
            (-contract.rate * dt).exp(),
            ContinuationValueEstimator::new(config.degree()),
            backend,
        );
        let aggregator = PayoffAggregator::new(contract.rate, dt, contract.maturity, backend);

        Ok(Self {
            contract,
            config,
            criteria,
            simulator,
            policy,
            aggregator,
        })
    }

    /// Contract being priced.
    #[inline]
    pub fn contract(&self) -> &ContractParameters {
        &self.contract
    }

    /// Configuration in use.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Prices with an RNG seeded from the configuration, or from OS
    /// entropy when no seed is configured.
    pub fn price(&self) -> EngineResult {
        let mut rng = PricerRng::from_optional_seed(self.config.seed());
        self.price_with_rng(&mut rng)
    }

    /// Prices drawing all randomness from `rng`.
    pub fn price_with_rng(&self, rng: &mut PricerRng) -> EngineResult {
        let c = &self.contract;
        let config = &self.config;
        let _span = info_span!(
            "lsm_engine.price",
            kind = %c.kind,
            backend = %config.backend(),
            seed = rng.seed()
        )
        .entered();

        info!(
            spot = c.spot,
            strike = c.strike,
            rate = c.rate,
            volatility = c.volatility,
            maturity = c.maturity,
            steps = config.steps(),
            batch_size = config.batch_size(),
            max_paths = config.max_paths(),
            adaptive = config.adaptive_batching(),
            "starting LSM pricing run"
        );

        let mut tracker = ConvergenceTracker::new(self.criteria);
        let mut batch_size = config.batch_size();
        let mut total_paths = 0usize;
        let mut early_exercises = 0usize;
        let mut regression_fallbacks = 0usize;

        while total_paths < config.max_paths() {
            let lattice = self.simulator.simulate(batch_size, rng);
            let state = self.policy.evaluate(&lattice);
            let batch_price = self.aggregator.batch_price(&state);

            total_paths += batch_size;
            early_exercises += state.diagnostics().total_exercised();
            regression_fallbacks += state.diagnostics().fallback_count();

            let stats = *tracker.record(batch_price);
            let rate = tracker.convergence_rate();
            debug!(
                batch = stats.n_batches,
                batch_price,
                total_paths,
                batch_size,
                mean = stats.mean,
                std_dev = stats.std_dev,
                std_error = stats.std_error,
                margin = stats.margin_of_error,
                cv = stats.coefficient_of_variation,
                ci_lower = stats.ci_lower,
                ci_upper = stats.ci_upper,
                convergence_rate = ?rate,
                "convergence check"
            );

            if stats.converged {
                info!(
                    price = stats.mean,
                    total_paths,
                    batches = stats.n_batches,
                    "converged"
                );
                break;
            }

            if config.adaptive_batching() {
                if let Some(rate) = rate {
                    let resized = adaptive_batch_size(
                        batch_size,
                        rate,
                        config.min_batch_size(),
                        config.max_batch_size(),
                    );
                    if resized != batch_size {
                        info!(from = batch_size, to = resized, rate, "adjusting batch size");
                        batch_size = resized;
                    }
                }
            }
        }

        let statistics = *tracker.statistics();
        if !statistics.converged {
            warn!(
                price = statistics.mean,
                total_paths,
                margin = statistics.margin_of_error,
                "path budget exhausted before convergence"
            );
        }
        debug!(early_exercises, regression_fallbacks, "exercise totals");

        EngineResult {
            price: statistics.mean,
            statistics,
            converged: statistics.converged,
            total_paths,
            batches: tracker.len(),
            final_batch_size: batch_size,
            seed: rng.seed(),
            early_exercises,
            regression_fallbacks,
        }
    }
}
