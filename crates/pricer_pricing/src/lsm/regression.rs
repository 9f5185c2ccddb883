//! Continuation-value regression.
//!
//! At each backward step the in-the-money prices are normalised by their
//! mean and regressed onto the monomial basis `[1, x, x², …, x^degree]`.
//! The fitted polynomial evaluated at the same points is the continuation
//! estimate for those paths.

use nalgebra::{DMatrix, DVector};
use pricer_core::math::{mean, solve_least_squares};
use pricer_core::types::SolverError;

/// Builds the monomial design matrix with rows `[1, x, …, x^degree]`.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::lsm::polynomial_basis;
///
/// let basis = polynomial_basis(&[2.0, 3.0], 2);
/// assert_eq!(basis.shape(), (2, 3));
/// assert_eq!(basis[(1, 2)], 9.0);
/// ```
pub fn polynomial_basis(xs: &[f64], degree: usize) -> DMatrix<f64> {
    let cols = degree + 1;
    DMatrix::from_fn(xs.len(), cols, |i, j| xs[i].powi(j as i32))
}

/// Continuation values for one time step, plus the reason the regression
/// was bypassed if it was.
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuationEstimate {
    /// One value per in-the-money path, in input order.
    pub values: Vec<f64>,
    /// Solver failure that triggered the intrinsic-value fallback.
    pub fallback: Option<SolverError>,
}

impl ContinuationEstimate {
    /// Whether the intrinsic value was used instead of a fitted polynomial.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Least-squares estimator of the value of holding the option one more step.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::lsm::ContinuationValueEstimator;
///
/// let estimator = ContinuationValueEstimator::new(2);
/// let prices = [80.0, 85.0, 90.0, 95.0];
/// let targets = [19.0, 14.5, 10.0, 6.0];
/// let intrinsic = [20.0, 15.0, 10.0, 5.0];
///
/// let estimate = estimator.estimate(&prices, &targets, &intrinsic);
/// assert!(!estimate.is_fallback());
/// assert_eq!(estimate.values.len(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContinuationValueEstimator {
    degree: usize,
}

impl Default for ContinuationValueEstimator {
    fn default() -> Self {
        Self::new(2)
    }
}

impl ContinuationValueEstimator {
    /// Creates an estimator with the given polynomial degree.
    #[inline]
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }

    /// Polynomial degree.
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Fits `targets` against `prices` and evaluates the fit at `prices`.
    ///
    /// # Errors
    ///
    /// Any [`SolverError`] from the least-squares solve, including
    /// [`SolverError::Underdetermined`] when fewer than `degree + 1`
    /// paths are supplied.
    pub fn fit(&self, prices: &[f64], targets: &[f64]) -> Result<Vec<f64>, SolverError> {
        if prices.len() != targets.len() {
            return Err(SolverError::DimensionMismatch {
                design_rows: prices.len(),
                target_len: targets.len(),
            });
        }
        let scale = mean(prices);
        if !(scale.is_finite() && scale != 0.0) {
            return Err(SolverError::Underdetermined {
                rows: prices.len(),
                cols: self.degree + 1,
            });
        }

        let xs: Vec<f64> = prices.iter().map(|&s| s / scale).collect();
        let design = polynomial_basis(&xs, self.degree);
        let target = DVector::from_column_slice(targets);

        let beta = solve_least_squares(&design, &target)?;
        let fitted = &design * &beta;

        if fitted.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NonFinite);
        }
        Ok(fitted.iter().copied().collect())
    }

    /// Like [`fit`](Self::fit), but falls back to `intrinsic` on any solver
    /// failure, so that no path exercises at this step.
    pub fn estimate(
        &self,
        prices: &[f64],
        targets: &[f64],
        intrinsic: &[f64],
    ) -> ContinuationEstimate {
        match self.fit(prices, targets) {
            Ok(values) => ContinuationEstimate {
                values,
                fallback: None,
            },
            Err(err) => ContinuationEstimate {
                values: intrinsic.to_vec(),
                fallback: Some(err),
            },
        }
    }
}
