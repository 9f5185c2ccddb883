//! Error types for structured error handling.
//!
//! This module provides:
//! - `ValidationError`: Malformed or out-of-range inputs, rejected before simulation
//! - `SolverError`: Errors from the least-squares solver (absorbed by the LSM fallback)
//! - `PricingError`: The single error type crossing the public pricing API

use thiserror::Error;

/// Input validation errors.
///
/// Raised before any simulation runs. Callers should treat these as
/// client faults: the request itself is malformed.
///
/// # Examples
/// ```
/// use pricer_core::types::ValidationError;
///
/// let err = ValidationError::InvalidSpot { spot: -1.0 };
/// assert_eq!(format!("{}", err), "Invalid spot price: S = -1 (must be positive and finite)");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Spot price not strictly positive or not finite.
    #[error("Invalid spot price: S = {spot} (must be positive and finite)")]
    InvalidSpot {
        /// The rejected spot price
        spot: f64,
    },

    /// Strike not strictly positive or not finite.
    #[error("Invalid strike: K = {strike} (must be positive and finite)")]
    InvalidStrike {
        /// The rejected strike
        strike: f64,
    },

    /// Volatility negative or not finite.
    #[error("Invalid volatility: σ = {volatility} (must be non-negative and finite)")]
    InvalidVolatility {
        /// The rejected volatility
        volatility: f64,
    },

    /// Time to expiry not strictly positive or not finite.
    #[error("Invalid time to expiry: T = {maturity} (must be positive and finite)")]
    InvalidMaturity {
        /// The rejected time to expiry in years
        maturity: f64,
    },

    /// Risk-free rate not finite.
    #[error("Invalid rate: r = {rate} (must be finite)")]
    InvalidRate {
        /// The rejected rate
        rate: f64,
    },

    /// Option kind string other than "call" or "put".
    #[error("Invalid option kind '{0}': expected 'call' or 'put'")]
    InvalidOptionKind(String),

    /// Any other simulation or Greeks setting outside its valid range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidParameter`].
    pub fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Least-squares solver errors.
///
/// These describe a regression step that cannot be solved. The LSM engine
/// recovers from every variant locally, so they never reach a pricing caller.
///
/// # Examples
/// ```
/// use pricer_core::types::SolverError;
///
/// let err = SolverError::Underdetermined { rows: 2, cols: 3 };
/// assert!(format!("{}", err).contains("2 observations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Fewer observations than coefficients.
    #[error("Underdetermined system: {rows} observations for {cols} coefficients")]
    Underdetermined {
        /// Number of observations
        rows: usize,
        /// Number of coefficients
        cols: usize,
    },

    /// Design matrix is rank-deficient.
    #[error("Singular design matrix: rank {rank} < {cols} columns")]
    Singular {
        /// Numerical rank found by the decomposition
        rank: usize,
        /// Number of columns
        cols: usize,
    },

    /// Design matrix or target contains NaN or infinity.
    #[error("Non-finite value in least-squares input")]
    NonFinite,

    /// Dimension mismatch between design matrix and target.
    #[error("Dimension mismatch: design has {design_rows} rows, target has {target_len}")]
    DimensionMismatch {
        /// Rows in the design matrix
        design_rows: usize,
        /// Length of the target vector
        target_len: usize,
    },

    /// Decomposition failed to produce a solution.
    #[error("Decomposition failed: {0}")]
    Decomposition(String),
}

/// Pricing errors surfaced to callers.
///
/// Only input validation failures propagate as hard errors. A pricing run
/// that exhausts its path budget without converging still succeeds.
///
/// # Examples
/// ```
/// use pricer_core::types::{PricingError, ValidationError};
///
/// let err: PricingError = ValidationError::InvalidStrike { strike: 0.0 }.into();
/// assert!(err.is_validation());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Invalid contract or simulation input.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl PricingError {
    /// Returns `true` for client-side input faults.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
