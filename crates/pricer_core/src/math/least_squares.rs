//! Ordinary least squares via singular value decomposition.
//!
//! Solves `min ‖A·β − y‖₂` for a tall design matrix `A`. The numerical rank
//! is checked before solving, so a rank-deficient basis is reported as
//! [`SolverError::Singular`] instead of producing a minimum-norm solution.

use nalgebra::{DMatrix, DVector};

use crate::types::SolverError;

/// Solves the least-squares problem `design · β ≈ target`.
///
/// Singular values below `ε · max(rows, cols) · σ_max` are treated as zero
/// when computing the numerical rank.
///
/// # Errors
///
/// - [`SolverError::DimensionMismatch`] if `target.len() != design.nrows()`
/// - [`SolverError::Underdetermined`] if there are fewer rows than columns
/// - [`SolverError::NonFinite`] if any input is NaN or infinite
/// - [`SolverError::Singular`] if the design matrix is rank-deficient
///
/// # Examples
/// ```
/// use nalgebra::{DMatrix, DVector};
/// use pricer_core::math::solve_least_squares;
///
/// // y = 1 + 2x sampled exactly
/// let design = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let target = DVector::from_vec(vec![1.0, 3.0, 5.0]);
/// let beta = solve_least_squares(&design, &target).unwrap();
/// assert!((beta[0] - 1.0).abs() < 1e-10);
/// assert!((beta[1] - 2.0).abs() < 1e-10);
/// ```
pub fn solve_least_squares(
    design: &DMatrix<f64>,
    target: &DVector<f64>,
) -> Result<DVector<f64>, SolverError> {
    let (rows, cols) = design.shape();

    if target.len() != rows {
        return Err(SolverError::DimensionMismatch {
            design_rows: rows,
            target_len: target.len(),
        });
    }
    if cols == 0 || rows < cols {
        return Err(SolverError::Underdetermined { rows, cols });
    }
    if design.iter().chain(target.iter()).any(|v| !v.is_finite()) {
        return Err(SolverError::NonFinite);
    }

    let svd = design.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    let eps = f64::EPSILON * rows.max(cols) as f64 * sigma_max;

    let rank = svd.rank(eps);
    if rank < cols {
        return Err(SolverError::Singular { rank, cols });
    }

    svd.solve(target, eps)
        .map_err(|msg| SolverError::Decomposition(msg.to_string()))
}
