//! Numerical helpers for the LSM engine.
//!
//! ## Modules
//!
//! - [`statistics`]: Sample moments over batch estimates
//! - [`distributions`]: Standard normal quantiles for confidence intervals
//! - [`least_squares`]: SVD-based ordinary least squares

pub mod distributions;
pub mod least_squares;
pub mod statistics;

pub use distributions::confidence_z_score;
pub use least_squares::solve_least_squares;
pub use statistics::{mean, sample_std_dev};
