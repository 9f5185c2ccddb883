//! Simulation configuration for the LSM engine.
//!
//! [`SimulationConfig`] is immutable once built. Construct it through
//! [`SimulationConfig::builder`], or load it from TOML and layer
//! `PRICER_LSM_*` environment overrides on top.

#[cfg(feature = "serde")]
use std::path::Path;

use pricer_core::types::ValidationError;

use super::backend::ComputeBackend;
use super::error::ConfigError;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 10_000;

/// Maximum polynomial degree for the continuation regression.
pub const MAX_DEGREE: usize = 8;

/// Environment variable names read by [`SimulationConfig::apply_env_overrides`].
pub mod env {
    /// Number of time steps.
    pub const STEPS: &str = "PRICER_LSM_STEPS";
    /// Initial paths per batch.
    pub const BATCH_SIZE: &str = "PRICER_LSM_BATCH_SIZE";
    /// Ceiling on total simulated paths.
    pub const MAX_PATHS: &str = "PRICER_LSM_MAX_PATHS";
    /// Relative precision target.
    pub const TOLERANCE: &str = "PRICER_LSM_TOLERANCE";
    /// Adaptive batch sizing on/off.
    pub const ADAPTIVE: &str = "PRICER_LSM_ADAPTIVE";
    /// Compute backend name.
    pub const BACKEND: &str = "PRICER_LSM_BACKEND";
    /// RNG seed.
    pub const SEED: &str = "PRICER_LSM_SEED";
}

/// LSM simulation settings.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::lsm::{ComputeBackend, SimulationConfig};
///
/// let config = SimulationConfig::builder()
///     .steps(50)
///     .batch_size(2_000)
///     .max_paths(40_000)
///     .tolerance(0.01)
///     .backend(ComputeBackend::Rayon)
///     .seed(7)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.steps(), 50);
/// assert_eq!(config.seed(), Some(7));
/// assert_eq!(config.degree(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SimulationConfig {
    steps: usize,
    batch_size: usize,
    max_paths: usize,
    tolerance: f64,
    degree: usize,
    adaptive_batching: bool,
    min_batches: usize,
    max_coefficient_of_variation: f64,
    confidence_level: f64,
    min_batch_size: usize,
    max_batch_size: usize,
    backend: ComputeBackend,
    seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 50,
            batch_size: 5_000,
            max_paths: 100_000,
            tolerance: 0.005,
            degree: 2,
            adaptive_batching: true,
            min_batches: 3,
            max_coefficient_of_variation: 0.1,
            confidence_level: 0.95,
            min_batch_size: 1_000,
            max_batch_size: 20_000,
            backend: ComputeBackend::Cpu,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Creates a builder starting from the default settings.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of time increments per path.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Paths in the first batch.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Hard ceiling on total simulated paths.
    #[inline]
    pub fn max_paths(&self) -> usize {
        self.max_paths
    }

    /// Relative precision target.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Degree of the continuation-value polynomial.
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Whether the batch size is resized between batches.
    #[inline]
    pub fn adaptive_batching(&self) -> bool {
        self.adaptive_batching
    }

    /// Batches required before convergence can be declared.
    #[inline]
    pub fn min_batches(&self) -> usize {
        self.min_batches
    }

    /// Upper bound on the coefficient of variation of batch means.
    #[inline]
    pub fn max_coefficient_of_variation(&self) -> f64 {
        self.max_coefficient_of_variation
    }

    /// Two-sided confidence level for the stopping rule.
    #[inline]
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Lower clamp for adaptive resizing.
    #[inline]
    pub fn min_batch_size(&self) -> usize {
        self.min_batch_size
    }

    /// Upper clamp for adaptive resizing.
    #[inline]
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Array-operations backend.
    #[inline]
    pub fn backend(&self) -> ComputeBackend {
        self.backend
    }

    /// Optional RNG seed. `None` draws a fresh seed per pricing run.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Copy with a different seed.
    #[inline]
    pub(crate) fn with_seed(&self, seed: Option<u64>) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    /// Checks every setting against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] naming the first
    /// offending setting.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.steps == 0 || self.steps > MAX_STEPS {
            return Err(ValidationError::parameter(
                "steps",
                format!("{} outside [1, {}]", self.steps, MAX_STEPS),
            ));
        }
        if self.batch_size == 0 {
            return Err(ValidationError::parameter("batch_size", "must be at least 1"));
        }
        if self.max_paths < self.batch_size {
            return Err(ValidationError::parameter(
                "max_paths",
                format!(
                    "{} is smaller than batch_size {}",
                    self.max_paths, self.batch_size
                ),
            ));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(ValidationError::parameter(
                "tolerance",
                format!("{} must be positive and finite", self.tolerance),
            ));
        }
        if self.degree > MAX_DEGREE {
            return Err(ValidationError::parameter(
                "degree",
                format!("{} exceeds {}", self.degree, MAX_DEGREE),
            ));
        }
        if self.min_batches == 0 {
            return Err(ValidationError::parameter("min_batches", "must be at least 1"));
        }
        if !(self.max_coefficient_of_variation > 0.0
            && self.max_coefficient_of_variation.is_finite())
        {
            return Err(ValidationError::parameter(
                "max_coefficient_of_variation",
                format!(
                    "{} must be positive and finite",
                    self.max_coefficient_of_variation
                ),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ValidationError::parameter(
                "confidence_level",
                format!("{} outside (0, 1)", self.confidence_level),
            ));
        }
        if self.min_batch_size == 0 || self.min_batch_size > self.max_batch_size {
            return Err(ValidationError::parameter(
                "min_batch_size",
                format!(
                    "clamp range [{}, {}] is empty or starts at zero",
                    self.min_batch_size, self.max_batch_size
                ),
            ));
        }
        Ok(())
    }

    /// Parses and validates a TOML document. Missing keys take their defaults.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::lsm::{ComputeBackend, SimulationConfig};
    ///
    /// let config = SimulationConfig::from_toml_str(r#"
    ///     steps = 25
    ///     backend = "rayon"
    ///     seed = 11
    /// "#).unwrap();
    ///
    /// assert_eq!(config.steps(), 25);
    /// assert_eq!(config.backend(), ComputeBackend::Rayon);
    /// assert_eq!(config.batch_size(), 5_000);
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    #[cfg(feature = "serde")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Overrides settings from `PRICER_LSM_*` environment variables and
    /// re-validates.
    ///
    /// Recognised variables are listed in [`env`]. Unset variables leave the
    /// current value untouched.
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(v) = lookup(env::STEPS) {
            self.steps = parse_override(env::STEPS, v)?;
        }
        if let Some(v) = lookup(env::BATCH_SIZE) {
            self.batch_size = parse_override(env::BATCH_SIZE, v)?;
        }
        if let Some(v) = lookup(env::MAX_PATHS) {
            self.max_paths = parse_override(env::MAX_PATHS, v)?;
        }
        if let Some(v) = lookup(env::TOLERANCE) {
            self.tolerance = parse_override(env::TOLERANCE, v)?;
        }
        if let Some(v) = lookup(env::ADAPTIVE) {
            self.adaptive_batching = parse_override(env::ADAPTIVE, v.to_lowercase())?;
        }
        if let Some(v) = lookup(env::BACKEND) {
            self.backend = parse_override(env::BACKEND, v)?;
        }
        if let Some(v) = lookup(env::SEED) {
            self.seed = Some(parse_override(env::SEED, v)?);
        }
        self.validate()?;
        Ok(self)
    }
}

fn parse_override<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}

/// Builder for [`SimulationConfig`].
///
/// Unset fields keep the values of [`SimulationConfig::default`];
/// [`build`](Self::build) validates the result.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    /// Sets the number of time steps, in [1, 10_000].
    #[inline]
    pub fn steps(mut self, steps: usize) -> Self {
        self.config.steps = steps;
        self
    }

    /// Sets the number of paths in the first batch.
    #[inline]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Sets the total path budget. Must be at least `batch_size`.
    #[inline]
    pub fn max_paths(mut self, max_paths: usize) -> Self {
        self.config.max_paths = max_paths;
        self
    }

    /// Sets the relative precision target.
    #[inline]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Sets the regression polynomial degree.
    #[inline]
    pub fn degree(mut self, degree: usize) -> Self {
        self.config.degree = degree;
        self
    }

    /// Enables or disables adaptive batch sizing.
    #[inline]
    pub fn adaptive_batching(mut self, adaptive: bool) -> Self {
        self.config.adaptive_batching = adaptive;
        self
    }

    /// Sets the minimum number of batches before convergence is checked.
    #[inline]
    pub fn min_batches(mut self, min_batches: usize) -> Self {
        self.config.min_batches = min_batches;
        self
    }

    /// Sets the maximum coefficient of variation of batch means.
    #[inline]
    pub fn max_coefficient_of_variation(mut self, max_cv: f64) -> Self {
        self.config.max_coefficient_of_variation = max_cv;
        self
    }

    /// Sets the two-sided confidence level, in (0, 1).
    #[inline]
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.config.confidence_level = level;
        self
    }

    /// Sets the clamp range applied by adaptive resizing.
    #[inline]
    pub fn batch_size_range(mut self, min: usize, max: usize) -> Self {
        self.config.min_batch_size = min;
        self.config.max_batch_size = max;
        self
    }

    /// Selects the compute backend.
    #[inline]
    pub fn backend(mut self, backend: ComputeBackend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Fixes the RNG seed for reproducible runs.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if any setting is out of range.
    pub fn build(self) -> Result<SimulationConfig, ValidationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.steps(), 50);
        assert_eq!(config.batch_size(), 5_000);
        assert_eq!(config.max_paths(), 100_000);
        assert_eq!(config.tolerance(), 0.005);
        assert_eq!(config.degree(), 2);
        assert!(config.adaptive_batching());
        assert_eq!(config.min_batches(), 3);
        assert_eq!(config.max_coefficient_of_variation(), 0.1);
        assert_eq!(config.confidence_level(), 0.95);
        assert_eq!((config.min_batch_size(), config.max_batch_size()), (1_000, 20_000));
        assert_eq!(config.backend(), ComputeBackend::Cpu);
        assert_eq!(config.seed(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = SimulationConfig::builder()
            .steps(10)
            .batch_size(100)
            .max_paths(1_000)
            .degree(3)
            .adaptive_batching(false)
            .batch_size_range(50, 500)
            .seed(3)
            .build()
            .unwrap();

        assert_eq!(config.steps(), 10);
        assert_eq!(config.batch_size(), 100);
        assert_eq!(config.degree(), 3);
        assert!(!config.adaptive_batching());
        assert_eq!(config.min_batch_size(), 50);
        assert_eq!(config.seed(), Some(3));
    }

    #[test]
    fn test_builder_rejects_invalid_settings() {
        let invalid = [
            SimulationConfig::builder().steps(0),
            SimulationConfig::builder().steps(MAX_STEPS + 1),
            SimulationConfig::builder().batch_size(0),
            SimulationConfig::builder().batch_size(10_000).max_paths(5_000),
            SimulationConfig::builder().tolerance(0.0),
            SimulationConfig::builder().tolerance(f64::NAN),
            SimulationConfig::builder().degree(MAX_DEGREE + 1),
            SimulationConfig::builder().min_batches(0),
            SimulationConfig::builder().max_coefficient_of_variation(-1.0),
            SimulationConfig::builder().confidence_level(1.0),
            SimulationConfig::builder().batch_size_range(0, 100),
            SimulationConfig::builder().batch_size_range(500, 100),
        ];
        for builder in invalid {
            assert!(matches!(
                builder.build(),
                Err(ValidationError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_max_paths_equal_to_batch_size_is_valid() {
        let config = SimulationConfig::builder()
            .batch_size(1_000)
            .max_paths(1_000)
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_with_seed_keeps_other_settings() {
        let config = SimulationConfig::builder().steps(12).build().unwrap();
        let seeded = config.with_seed(Some(9));
        assert_eq!(seeded.seed(), Some(9));
        assert_eq!(seeded.steps(), 12);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_env_overrides() {
        let config = SimulationConfig::default()
            .apply_overrides(lookup(&[
                (env::STEPS, "20"),
                (env::BATCH_SIZE, " 2000 "),
                (env::ADAPTIVE, "FALSE"),
                (env::BACKEND, "rayon"),
                (env::SEED, "99"),
            ]))
            .unwrap();

        assert_eq!(config.steps(), 20);
        assert_eq!(config.batch_size(), 2_000);
        assert!(!config.adaptive_batching());
        assert_eq!(config.backend(), ComputeBackend::Rayon);
        assert_eq!(config.seed(), Some(99));
        assert_eq!(config.max_paths(), 100_000);
    }

    #[test]
    fn test_env_overrides_reject_garbage() {
        let result = SimulationConfig::default().apply_overrides(lookup(&[(env::STEPS, "fifty")]));
        assert!(matches!(
            result,
            Err(ConfigError::Env { var: env::STEPS, .. })
        ));

        let result =
            SimulationConfig::default().apply_overrides(lookup(&[(env::MAX_PATHS, "10")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_toml_str() {
        let config = SimulationConfig::from_toml_str(
            r#"
            steps = 30
            batch_size = 2000
            tolerance = 0.01
            adaptive_batching = false
            backend = "rayon"
            "#,
        )
        .unwrap();

        assert_eq!(config.steps(), 30);
        assert_eq!(config.batch_size(), 2_000);
        assert_eq!(config.tolerance(), 0.01);
        assert!(!config.adaptive_batching());
        assert_eq!(config.backend(), ComputeBackend::Rayon);
        assert_eq!(config.min_batches(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_toml_str_errors() {
        assert!(matches!(
            SimulationConfig::from_toml_str("steps = \"many\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("unknown_key = 1"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("steps = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_file_missing() {
        let result = SimulationConfig::from_file("/nonexistent/lsm.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_file_round_trip() {
        let path = std::env::temp_dir().join(format!("lsm_config_{}.toml", std::process::id()));
        std::fs::write(&path, "steps = 40\nseed = 5\n").unwrap();

        let config = SimulationConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.steps(), 40);
        assert_eq!(config.seed(), Some(5));
    }
}
