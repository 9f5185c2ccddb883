//! Top-level American option pricing entry point.

use pricer_core::types::{ContractParameters, PricingError};
use tracing::info_span;

use crate::greeks::{GreeksConfig, GreeksEstimator, GreeksResult};
use crate::lsm::{BatchStatistics, PricingEngine, SimulationConfig};

/// Price, Greeks and run metadata for one pricing request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingResult {
    /// Mean of all batch price estimates.
    pub price: f64,
    /// Finite-difference sensitivities.
    pub greeks: GreeksResult,
    /// Statistics of the headline run after its final batch.
    pub statistics: BatchStatistics,
    /// `false` when the headline run exhausted its path budget.
    pub converged: bool,
    /// Paths simulated by the headline run.
    pub total_paths: usize,
    /// Batches run by the headline run.
    pub batches: usize,
    /// Batch size in effect when the headline run stopped.
    pub final_batch_size: usize,
    /// Seed of the headline run.
    pub seed: u64,
}

impl PricingResult {
    /// Confidence interval `(lower, upper)` around the price.
    #[inline]
    pub fn confidence_interval(&self) -> (f64, f64) {
        (self.statistics.ci_lower, self.statistics.ci_upper)
    }
}

/// Prices an American option by LSM and estimates its Greeks.
///
/// All inputs are validated before any simulation runs. A run that spends
/// its whole path budget without converging still succeeds, with
/// `converged == false`.
///
/// # Errors
///
/// Returns [`PricingError::Validation`] for an invalid contract, simulation
/// configuration or Greeks shift.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{ContractParameters, OptionKind};
/// use pricer_pricing::greeks::GreeksConfig;
/// use pricer_pricing::lsm::SimulationConfig;
/// use pricer_pricing::price_american_option;
///
/// let contract = ContractParameters::new(100.0, 105.0, 0.05, 0.2, 0.5, OptionKind::Put);
/// let simulation = SimulationConfig::builder()
///     .steps(10)
///     .batch_size(1_000)
///     .max_paths(5_000)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let result = price_american_option(&contract, &simulation, &GreeksConfig::default()).unwrap();
/// let (lower, upper) = result.confidence_interval();
///
/// assert!(result.price > 0.0);
/// assert!(lower <= result.price && result.price <= upper);
/// ```
pub fn price_american_option(
    contract: &ContractParameters,
    simulation: &SimulationConfig,
    greeks: &GreeksConfig,
) -> Result<PricingResult, PricingError> {
    let _span = info_span!(
        "price_american_option",
        kind = %contract.kind,
        spot = contract.spot,
        strike = contract.strike
    )
    .entered();

    greeks.validate()?;
    let engine = PricingEngine::new(*contract, simulation.clone())?;
    let headline = engine.price();

    let sensitivities = GreeksEstimator::new(simulation.clone(), *greeks).estimate(contract)?;

    Ok(PricingResult {
        price: headline.price,
        greeks: sensitivities,
        statistics: headline.statistics,
        converged: headline.converged,
        total_paths: headline.total_paths,
        batches: headline.batches,
        final_batch_size: headline.final_batch_size,
        seed: headline.seed,
    })
}
