//! Finite-difference Greeks for the LSM engine.
//!
//! - [`GreeksConfig`] / [`GreekSampling`]: shift ε and randomness sharing
//! - [`GreeksEstimator`]: reprices bumped contracts through full engine runs
//! - [`GreeksResult`]: delta, gamma, vega, rho, theta

mod config;
mod estimator;
mod result;


pub use config::{GreekSampling, GreeksConfig, GreeksConfigBuilder};
pub use estimator::GreeksEstimator;
pub use result::GreeksResult;
