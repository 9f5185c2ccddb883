//! Greeks calculation result type.

/// Finite-difference sensitivities of an American option price.
///
/// - `delta`: ∂V/∂S
/// - `gamma`: ∂²V/∂S²
/// - `vega`: ∂V/∂σ
/// - `rho`: ∂V/∂r
/// - `theta`: one-sided difference in maturity, `(V(T(1−ε)) − V(T)) / (Tε)`
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::GreeksResult;
///
/// let greeks = GreeksResult {
///     delta: -0.42,
///     gamma: 0.03,
///     vega: 27.0,
///     rho: -30.0,
///     theta: -4.1,
/// };
/// assert!(greeks.is_finite());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreeksResult {
    /// Sensitivity to spot price.
    pub delta: f64,
    /// Convexity with respect to spot.
    pub gamma: f64,
    /// Sensitivity to volatility.
    pub vega: f64,
    /// Sensitivity to the risk-free rate.
    pub rho: f64,
    /// Sensitivity to time to expiry.
    pub theta: f64,
}

impl GreeksResult {
    /// Returns `true` if every sensitivity is finite.
    pub fn is_finite(&self) -> bool {
        [self.delta, self.gamma, self.vega, self.rho, self.theta]
            .iter()
            .all(|v| v.is_finite())
    }
}
