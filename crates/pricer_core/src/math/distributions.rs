//! Standard normal quantiles.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::types::ValidationError;

/// Two-sided z-score for a confidence level.
///
/// Returns `Φ⁻¹((1 + level) / 2)`, e.g. ≈ 1.96 for 0.95.
///
/// # Errors
///
/// Returns `ValidationError::InvalidParameter` unless `0 < level < 1`.
///
/// # Examples
/// ```
/// use pricer_core::math::confidence_z_score;
///
/// let z = confidence_z_score(0.95).unwrap();
/// assert!((z - 1.959964).abs() < 1e-5);
/// ```
pub fn confidence_z_score(level: f64) -> Result<f64, ValidationError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(ValidationError::parameter(
            "confidence_level",
            format!("{} is not in (0, 1)", level),
        ));
    }
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| ValidationError::parameter("confidence_level", e.to_string()))?;
    Ok(standard.inverse_cdf(0.5 * (1.0 + level)))
}
