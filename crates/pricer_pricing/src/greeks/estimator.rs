//! Bump-and-revalue Greeks over the full LSM engine.
//!
//! Each Greek is built from independent [`PricingEngine`] runs on bumped
//! copies of the contract, all using the simulation settings originally
//! supplied. No paths are shared between runs unless
//! [`GreekSampling::CommonRandomNumbers`] is selected.

use pricer_core::types::{ContractParameters, ValidationError};
use tracing::{debug, info_span};

use super::config::{GreekSampling, GreeksConfig};
use super::result::GreeksResult;
use crate::lsm::{PricingEngine, SimulationConfig};
use crate::rng::PricerRng;

/// Constituent pricing runs, in the order they are executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bump {
    Base,
    SpotUp,
    SpotDown,
    VolUp,
    VolDown,
    RateUp,
    RateDown,
    MaturityDown,
}

impl Bump {
    const ALL: [Bump; 8] = [
        Bump::Base,
        Bump::SpotUp,
        Bump::SpotDown,
        Bump::VolUp,
        Bump::VolDown,
        Bump::RateUp,
        Bump::RateDown,
        Bump::MaturityDown,
    ];

    fn ordinal(self) -> u64 {
        self as u64
    }

    fn apply(self, contract: &ContractParameters, eps: f64) -> ContractParameters {
        let c = *contract;
        match self {
            Bump::Base => c,
            Bump::SpotUp => c.with_spot(c.spot * (1.0 + eps)),
            Bump::SpotDown => c.with_spot(c.spot * (1.0 - eps)),
            Bump::VolUp => c.with_volatility(c.volatility + eps),
            Bump::VolDown => c.with_volatility((c.volatility - eps).max(0.0)),
            Bump::RateUp => c.with_rate(c.rate + eps),
            Bump::RateDown => c.with_rate(c.rate - eps),
            Bump::MaturityDown => c.with_maturity(c.maturity * (1.0 - eps)),
        }
    }
}

/// Finite-difference Greeks estimator.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{ContractParameters, OptionKind};
/// use pricer_pricing::greeks::{GreekSampling, GreeksConfig, GreeksEstimator};
/// use pricer_pricing::lsm::SimulationConfig;
///
/// let simulation = SimulationConfig::builder()
///     .steps(10)
///     .batch_size(1_000)
///     .max_paths(3_000)
///     .seed(3)
///     .build()
///     .unwrap();
/// let greeks = GreeksConfig::builder()
///     .sampling(GreekSampling::CommonRandomNumbers)
///     .build()
///     .unwrap();
///
/// let contract = ContractParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionKind::Put);
/// let result = GreeksEstimator::new(simulation, greeks).estimate(&contract).unwrap();
/// assert!(result.is_finite());
/// ```
#[derive(Clone, Debug)]
pub struct GreeksEstimator {
    simulation: SimulationConfig,
    config: GreeksConfig,
}

impl GreeksEstimator {
    /// Creates an estimator using `simulation` for every constituent run.
    pub fn new(simulation: SimulationConfig, config: GreeksConfig) -> Self {
        Self { simulation, config }
    }

    /// Greeks configuration in use.
    #[inline]
    pub fn config(&self) -> &GreeksConfig {
        &self.config
    }

    /// Seed for each constituent run.
    fn run_seeds(&self) -> [Option<u64>; 8] {
        match self.config.sampling {
            GreekSampling::Independent => Bump::ALL.map(|bump| {
                self.simulation
                    .seed()
                    .map(|seed| seed.wrapping_add(bump.ordinal() + 1))
            }),
            GreekSampling::CommonRandomNumbers => {
                let seed = self
                    .simulation
                    .seed()
                    .unwrap_or_else(PricerRng::entropy_seed);
                [Some(seed); 8]
            }
        }
    }

    /// Computes delta, gamma, vega, rho and theta for `contract`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the contract, the simulation settings
    /// or the shift are invalid.
    pub fn estimate(&self, contract: &ContractParameters) -> Result<GreeksResult, ValidationError> {
        self.config.validate()?;
        contract.validate()?;
        self.simulation.validate()?;

        let eps = self.config.shift;
        let _span = info_span!(
            "greeks.estimate",
            shift = eps,
            sampling = ?self.config.sampling
        )
        .entered();

        let seeds = self.run_seeds();
        let mut prices = [0.0; 8];
        for (bump, seed) in Bump::ALL.iter().zip(seeds) {
            let bumped = bump.apply(contract, eps);
            let engine = PricingEngine::new(bumped, self.simulation.with_seed(seed))?;
            let result = engine.price();
            debug!(?bump, price = result.price, converged = result.converged, "greek run");
            prices[bump.ordinal() as usize] = result.price;
        }

        let price = |bump: Bump| prices[bump.ordinal() as usize];
        let base = price(Bump::Base);
        let (s0, sigma, maturity) = (contract.spot, contract.volatility, contract.maturity);

        let delta = (price(Bump::SpotUp) - price(Bump::SpotDown)) / (2.0 * s0 * eps);
        let gamma = (price(Bump::SpotUp) + price(Bump::SpotDown) - 2.0 * base) / (s0 * eps).powi(2);
        let vol_width = (sigma + eps) - (sigma - eps).max(0.0);
        let vega = (price(Bump::VolUp) - price(Bump::VolDown)) / vol_width;
        let rho = (price(Bump::RateUp) - price(Bump::RateDown)) / (2.0 * eps);
        let theta = (price(Bump::MaturityDown) - base) / (maturity * eps);

        Ok(GreeksResult {
            delta,
            gamma,
            vega,
            rho,
            theta,
        })
    }
}
