//! Geometric Brownian motion path generation.
//!
//! Paths use the exact log-space discretisation
//!
//! ```text
//! S(t_j) = S₀ · exp( Σ_{i<j} [(r − ½σ²)dt + σ√dt · Z_i] )
//! ```
//!
//! # Memory Layout
//!
//! A [`PriceLattice`] is stored row-major with one row per path:
//! `prices[path * (steps + 1) + step]`, where `step = 0` is the initial spot.

use pricer_core::types::ContractParameters;

use super::backend::ComputeBackend;
use crate::rng::PricerRng;

/// Per-step GBM constants derived from a contract and a step count.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::lsm::GbmParams;
///
/// let params = GbmParams::new(100.0, 0.05, 0.2, 1.0, 50);
/// assert!((params.dt - 0.02).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmParams {
    /// Initial spot price (S₀).
    pub spot: f64,
    /// Time increment T / steps.
    pub dt: f64,
    /// Log drift per step: (r − ½σ²)·dt.
    pub drift_dt: f64,
    /// Diffusion scale per step: σ·√dt.
    pub vol_sqrt_dt: f64,
}

impl GbmParams {
    /// Precomputes the per-step constants.
    #[inline]
    pub fn new(spot: f64, rate: f64, volatility: f64, maturity: f64, steps: usize) -> Self {
        let dt = maturity / steps as f64;
        Self {
            spot,
            dt,
            drift_dt: (rate - 0.5 * volatility * volatility) * dt,
            vol_sqrt_dt: volatility * dt.sqrt(),
        }
    }

    /// Constants for a validated contract.
    #[inline]
    pub fn from_contract(contract: &ContractParameters, steps: usize) -> Self {
        Self::new(
            contract.spot,
            contract.rate,
            contract.volatility,
            contract.maturity,
            steps,
        )
    }
}

/// Simulated prices for one batch, shape `n_paths × (steps + 1)`.
///
/// Column 0 equals S₀ for every path.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceLattice {
    n_paths: usize,
    steps: usize,
    prices: Vec<f64>,
}

impl PriceLattice {
    /// Number of paths (rows).
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time increments; each row holds `steps + 1` prices.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Price of `path` at time index `step`.
    #[inline]
    pub fn price(&self, path: usize, step: usize) -> f64 {
        self.prices[path * (self.steps + 1) + step]
    }

    /// Full trajectory of one path.
    #[inline]
    pub fn path(&self, path: usize) -> &[f64] {
        let width = self.steps + 1;
        &self.prices[path * width..(path + 1) * width]
    }

    /// Row-major backing storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }
}

/// Generates [`PriceLattice`] batches for one contract.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{ContractParameters, OptionKind};
/// use pricer_pricing::lsm::{ComputeBackend, PathSimulator};
/// use pricer_pricing::rng::PricerRng;
///
/// let contract = ContractParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionKind::Put);
/// let simulator = PathSimulator::new(&contract, 10, ComputeBackend::Cpu);
///
/// let mut rng = PricerRng::from_seed(1);
/// let lattice = simulator.simulate(500, &mut rng);
///
/// assert_eq!(lattice.n_paths(), 500);
/// assert_eq!(lattice.path(0).len(), 11);
/// assert_eq!(lattice.price(42, 0), 100.0);
/// ```
#[derive(Clone, Debug)]
pub struct PathSimulator {
    params: GbmParams,
    steps: usize,
    backend: ComputeBackend,
}

impl PathSimulator {
    /// Creates a simulator for a validated contract.
    pub fn new(contract: &ContractParameters, steps: usize, backend: ComputeBackend) -> Self {
        Self {
            params: GbmParams::from_contract(contract, steps),
            steps,
            backend,
        }
    }

    /// Per-step constants in use.
    #[inline]
    pub fn params(&self) -> GbmParams {
        self.params
    }

    /// Simulates `n_paths` independent paths.
    ///
    /// Normals are drawn from `rng` in row-major order before any
    /// per-path work, so the result does not depend on the backend.
    pub fn simulate(&self, n_paths: usize, rng: &mut PricerRng) -> PriceLattice {
        let steps = self.steps;
        let mut normals = vec![0.0; n_paths * steps];
        rng.fill_normal(&mut normals);

        let mut prices = vec![0.0; n_paths * (steps + 1)];
        let GbmParams {
            spot,
            drift_dt,
            vol_sqrt_dt,
            ..
        } = self.params;

        self.backend
            .zip_rows(&mut prices, steps + 1, &normals, steps, |row, z| {
                let mut log_offset = 0.0;
                row[0] = spot;
                for (slot, &z) in row[1..].iter_mut().zip(z) {
                    log_offset += drift_dt + vol_sqrt_dt * z;
                    *slot = spot * log_offset.exp();
                }
            });

        PriceLattice {
            n_paths,
            steps,
            prices,
        }
    }
}
