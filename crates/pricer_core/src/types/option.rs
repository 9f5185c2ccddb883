//! Option contract types.
//!
//! [`ContractParameters`] is immutable for the duration of one pricing call.
//! Sensitivity calculations derive bumped copies through the `with_*`
//! methods rather than mutating the original.

use std::fmt;
use std::str::FromStr;

use super::error::ValidationError;

/// Exercise payoff direction.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionKind;
///
/// let kind: OptionKind = "Put".parse().unwrap();
/// assert_eq!(kind, OptionKind::Put);
/// assert_eq!(kind.intrinsic(90.0, 100.0), 10.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionKind {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionKind {
    /// Immediate exercise value: `max(S - K, 0)` for calls, `max(K - S, 0)` for puts.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionKind::Call => (spot - strike).max(0.0),
            OptionKind::Put => (strike - spot).max(0.0),
        }
    }

    /// Lowercase name as accepted by [`FromStr`].
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKind::Call => "call",
            OptionKind::Put => "put",
        }
    }
}

impl FromStr for OptionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" => Ok(OptionKind::Call),
            "put" => Ok(OptionKind::Put),
            _ => Err(ValidationError::InvalidOptionKind(s.to_string())),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market and contract inputs for one pricing call.
///
/// # Invariants
///
/// After [`validate`](Self::validate) succeeds:
/// - `spot > 0`, `strike > 0`, `maturity > 0`
/// - `volatility >= 0`
/// - every field is finite
///
/// Already-expired contracts (`maturity <= 0`) must be handled by the caller.
///
/// # Examples
/// ```
/// use pricer_core::types::{ContractParameters, OptionKind};
///
/// let contract = ContractParameters::new(100.0, 105.0, 0.05, 0.2, 0.5, OptionKind::Put);
/// assert!(contract.validate().is_ok());
///
/// let bumped = contract.with_spot(101.0);
/// assert_eq!(bumped.spot, 101.0);
/// assert_eq!(contract.spot, 100.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractParameters {
    /// Spot price of the underlying (S₀).
    pub spot: f64,
    /// Strike price (K).
    pub strike: f64,
    /// Continuously compounded risk-free rate (r); may be negative.
    pub rate: f64,
    /// Annualised volatility (σ).
    pub volatility: f64,
    /// Time to expiry in years (T).
    pub maturity: f64,
    /// Call or put.
    pub kind: OptionKind,
}

impl ContractParameters {
    /// Creates a new parameter set. Call [`validate`](Self::validate) before pricing.
    #[inline]
    pub fn new(
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        maturity: f64,
        kind: OptionKind,
    ) -> Self {
        Self {
            spot,
            strike,
            rate,
            volatility,
            maturity,
            kind,
        }
    }

    /// Checks the preconditions listed on the type.
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition as a [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.spot > 0.0 && self.spot.is_finite()) {
            return Err(ValidationError::InvalidSpot { spot: self.spot });
        }
        if !(self.strike > 0.0 && self.strike.is_finite()) {
            return Err(ValidationError::InvalidStrike {
                strike: self.strike,
            });
        }
        if !self.rate.is_finite() {
            return Err(ValidationError::InvalidRate { rate: self.rate });
        }
        if !(self.volatility >= 0.0 && self.volatility.is_finite()) {
            return Err(ValidationError::InvalidVolatility {
                volatility: self.volatility,
            });
        }
        if !(self.maturity > 0.0 && self.maturity.is_finite()) {
            return Err(ValidationError::InvalidMaturity {
                maturity: self.maturity,
            });
        }
        Ok(())
    }

    /// Intrinsic value at the current spot.
    #[inline]
    pub fn intrinsic(&self, spot: f64) -> f64 {
        self.kind.intrinsic(spot, self.strike)
    }

    /// Copy with a different spot price.
    #[inline]
    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    /// Copy with a different volatility.
    #[inline]
    pub fn with_volatility(self, volatility: f64) -> Self {
        Self { volatility, ..self }
    }

    /// Copy with a different rate.
    #[inline]
    pub fn with_rate(self, rate: f64) -> Self {
        Self { rate, ..self }
    }

    /// Copy with a different time to expiry.
    #[inline]
    pub fn with_maturity(self, maturity: f64) -> Self {
        Self { maturity, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atm_call() -> ContractParameters {
        ContractParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionKind::Call)
    }

    #[test]
    fn test_intrinsic_value_call() {
        let values: Vec<f64> = [90.0, 100.0, 110.0]
            .iter()
            .map(|&s| OptionKind::Call.intrinsic(s, 100.0))
            .collect();
        assert_eq!(values, vec![0.0, 0.0, 10.0]);
    }

    #[test]
    fn test_intrinsic_value_put() {
        let values: Vec<f64> = [90.0, 100.0, 110.0]
            .iter()
            .map(|&s| OptionKind::Put.intrinsic(s, 100.0))
            .collect();
        assert_eq!(values, vec![10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_option_kind_parse() {
        assert_eq!("call".parse::<OptionKind>().unwrap(), OptionKind::Call);
        assert_eq!(" PUT ".parse::<OptionKind>().unwrap(), OptionKind::Put);
        assert!(matches!(
            "american".parse::<OptionKind>(),
            Err(ValidationError::InvalidOptionKind(s)) if s == "american"
        ));
        assert_eq!(OptionKind::Put.to_string(), "put");
    }

    #[test]
    fn test_validate_accepts_standard_contract() {
        assert!(atm_call().validate().is_ok());
        // Zero volatility and negative rates are legitimate inputs
        assert!(atm_call().with_volatility(0.0).validate().is_ok());
        assert!(atm_call().with_rate(-0.01).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_inputs() {
        assert!(matches!(
            atm_call().with_spot(0.0).validate(),
            Err(ValidationError::InvalidSpot { .. })
        ));
        assert!(matches!(
            ContractParameters { strike: -5.0, ..atm_call() }.validate(),
            Err(ValidationError::InvalidStrike { .. })
        ));
        assert!(matches!(
            atm_call().with_volatility(-0.1).validate(),
            Err(ValidationError::InvalidVolatility { .. })
        ));
        assert!(matches!(
            atm_call().with_maturity(0.0).validate(),
            Err(ValidationError::InvalidMaturity { .. })
        ));
        assert!(matches!(
            atm_call().with_rate(f64::NAN).validate(),
            Err(ValidationError::InvalidRate { .. })
        ));
        assert!(atm_call().with_spot(f64::INFINITY).validate().is_err());
    }
}
