//! Batch convergence tracking and adaptive batch sizing.
//!
//! The tracker keeps every batch price estimate of one pricing run and
//! recomputes [`BatchStatistics`] after each new batch. A run has converged
//! when, with at least `max(min_batches, 2)` batches,
//!
//! ```text
//! z·se        < tol·|mean|
//! std / |mean| < max_cv
//! 2·z·se      < 2·tol·|mean|
//! ```
//!
//! all hold together, where `se = std / √n` and `std` is the sample
//! standard deviation of the batch means.

use pricer_core::math::{confidence_z_score, mean, sample_std_dev};
use pricer_core::types::ValidationError;

use super::config::SimulationConfig;

/// Means with magnitude at or below this are treated as zero.
const MEAN_EPSILON: f64 = 1e-10;

/// Batches per window in the convergence-rate estimate.
pub const RATE_WINDOW: usize = 5;

/// Summary of the batch means recorded so far.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchStatistics {
    /// Number of batches summarised.
    pub n_batches: usize,
    /// Mean of the batch means (the running price estimate).
    pub mean: f64,
    /// Sample standard deviation of the batch means.
    pub std_dev: f64,
    /// `std_dev / √n`.
    pub std_error: f64,
    /// `z · std_error`.
    pub margin_of_error: f64,
    /// `mean − margin_of_error`.
    pub ci_lower: f64,
    /// `mean + margin_of_error`.
    pub ci_upper: f64,
    /// `std_dev / |mean|`, infinite when the mean is zero.
    pub coefficient_of_variation: f64,
    /// Whether every stopping criterion held.
    pub converged: bool,
}

impl BatchStatistics {
    /// Width of the confidence interval.
    #[inline]
    pub fn ci_width(&self) -> f64 {
        self.ci_upper - self.ci_lower
    }
}

/// Thresholds for the stopping rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvergenceCriteria {
    /// Relative precision target.
    pub tolerance: f64,
    /// Batches required before convergence can be declared.
    pub min_batches: usize,
    /// Upper bound on the coefficient of variation.
    pub max_coefficient_of_variation: f64,
    /// Two-sided confidence level.
    pub confidence_level: f64,
    /// Standard normal quantile for `confidence_level`.
    pub z_score: f64,
}

impl ConvergenceCriteria {
    /// Builds criteria and resolves the z-score for `confidence_level`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `confidence_level` is outside (0, 1).
    pub fn new(
        tolerance: f64,
        min_batches: usize,
        max_coefficient_of_variation: f64,
        confidence_level: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            tolerance,
            min_batches,
            max_coefficient_of_variation,
            confidence_level,
            z_score: confidence_z_score(confidence_level)?,
        })
    }

    /// Criteria carried by a simulation configuration.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ValidationError> {
        Self::new(
            config.tolerance(),
            config.min_batches(),
            config.max_coefficient_of_variation(),
            config.confidence_level(),
        )
    }

    /// Computes statistics for `history` and applies the stopping rule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::lsm::ConvergenceCriteria;
    ///
    /// let criteria = ConvergenceCriteria::new(0.01, 3, 0.1, 0.95).unwrap();
    ///
    /// let tight = criteria.evaluate(&[10.0, 10.01, 9.99, 10.0, 10.005]);
    /// assert!(tight.converged);
    ///
    /// let loose = criteria.evaluate(&[10.0, 12.0, 8.0]);
    /// assert!(!loose.converged);
    /// ```
    pub fn evaluate(&self, history: &[f64]) -> BatchStatistics {
        let n = history.len();
        if n == 0 {
            return BatchStatistics::default();
        }

        let mean = mean(history);
        let std_dev = sample_std_dev(history);
        let std_error = std_dev / (n as f64).sqrt();
        let margin_of_error = self.z_score * std_error;
        let abs_mean = mean.abs();
        let coefficient_of_variation = if abs_mean > MEAN_EPSILON {
            std_dev / abs_mean
        } else {
            f64::INFINITY
        };
        let ci_lower = mean - margin_of_error;
        let ci_upper = mean + margin_of_error;

        let converged = n >= self.min_batches.max(2)
            && margin_of_error < self.tolerance * abs_mean
            && coefficient_of_variation < self.max_coefficient_of_variation
            && (ci_upper - ci_lower) < 2.0 * self.tolerance * abs_mean;

        BatchStatistics {
            n_batches: n,
            mean,
            std_dev,
            std_error,
            margin_of_error,
            ci_lower,
            ci_upper,
            coefficient_of_variation,
            converged,
        }
    }
}

/// Relative change between the mean of the last [`RATE_WINDOW`] batches and
/// a reference level.
///
/// The reference is the mean of the window before that when at least
/// `2 · RATE_WINDOW` batches exist, otherwise the first batch. Returns
/// `None` with fewer than `RATE_WINDOW` batches, and `1.0` when the
/// reference is zero.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::lsm::convergence_rate;
///
/// assert_eq!(convergence_rate(&[1.0, 1.0, 1.0]), None);
/// assert_eq!(convergence_rate(&[10.0; 6]), Some(0.0));
/// ```
pub fn convergence_rate(history: &[f64]) -> Option<f64> {
    let n = history.len();
    if n < RATE_WINDOW {
        return None;
    }
    let recent = mean(&history[n - RATE_WINDOW..]);
    let reference = if n >= 2 * RATE_WINDOW {
        mean(&history[n - 2 * RATE_WINDOW..n - RATE_WINDOW])
    } else {
        history[0]
    };

    if reference.abs() > MEAN_EPSILON {
        Some((recent - reference).abs() / reference.abs())
    } else {
        Some(1.0)
    }
}

/// Next batch size given the current size and convergence rate.
///
/// Slow-moving estimates get larger batches (×1.5 below 0.01, ×1.2 below
/// 0.05); fast-moving estimates get smaller ones (×0.8 above 0.2). The
/// result is clamped to `[min_size, max_size]`.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::lsm::adaptive_batch_size;
///
/// assert_eq!(adaptive_batch_size(1_000, 0.005, 1_000, 20_000), 1_500);
/// assert_eq!(adaptive_batch_size(2_000, 0.3, 1_000, 20_000), 1_600);
/// assert_eq!(adaptive_batch_size(25_000, 0.5, 1_000, 20_000), 20_000);
/// ```
pub fn adaptive_batch_size(current: usize, rate: f64, min_size: usize, max_size: usize) -> usize {
    let factor = if rate < 0.01 {
        1.5
    } else if rate < 0.05 {
        1.2
    } else if rate > 0.2 {
        0.8
    } else {
        1.0
    };
    let resized = (current as f64 * factor) as usize;
    resized.clamp(min_size, max_size)
}

/// Running history of batch price estimates for one pricing run.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::lsm::{ConvergenceCriteria, ConvergenceTracker};
///
/// let criteria = ConvergenceCriteria::new(0.01, 3, 0.1, 0.95).unwrap();
/// let mut tracker = ConvergenceTracker::new(criteria);
///
/// assert!(!tracker.record(5.0).converged);
/// for _ in 0..9 {
///     tracker.record(5.0);
/// }
/// assert!(tracker.is_converged());
/// assert_eq!(tracker.statistics().mean, 5.0);
/// ```
#[derive(Clone, Debug)]
pub struct ConvergenceTracker {
    criteria: ConvergenceCriteria,
    history: Vec<f64>,
    statistics: BatchStatistics,
}

impl ConvergenceTracker {
    /// Creates an empty tracker.
    pub fn new(criteria: ConvergenceCriteria) -> Self {
        Self {
            criteria,
            history: Vec::new(),
            statistics: BatchStatistics::default(),
        }
    }

    /// Appends one batch price and refreshes the statistics.
    pub fn record(&mut self, batch_price: f64) -> &BatchStatistics {
        self.history.push(batch_price);
        self.statistics = self.criteria.evaluate(&self.history);
        &self.statistics
    }

    /// Latest statistics.
    #[inline]
    pub fn statistics(&self) -> &BatchStatistics {
        &self.statistics
    }

    /// Whether the latest statistics satisfied the stopping rule.
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.statistics.converged
    }

    /// Every batch price recorded so far, oldest first.
    #[inline]
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Number of batches recorded.
    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no batch has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Criteria in use.
    #[inline]
    pub fn criteria(&self) -> &ConvergenceCriteria {
        &self.criteria
    }

    /// See [`convergence_rate`].
    #[inline]
    pub fn convergence_rate(&self) -> Option<f64> {
        convergence_rate(&self.history)
    }
}
