//! Discounted payoff aggregation for one batch.

use pricer_core::math::mean;

use super::backend::ComputeBackend;
use super::exercise::ExerciseState;

/// Reduces an [`ExerciseState`] to one batch price estimate.
///
/// Each path pays `intrinsic(t*)·exp(−r·t*·dt)` if it exercises at interior
/// step `t*`, and `intrinsic(T)·exp(−r·T)` otherwise. The batch price is
/// the mean over paths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PayoffAggregator {
    rate: f64,
    dt: f64,
    maturity: f64,
    backend: ComputeBackend,
}

impl PayoffAggregator {
    /// Creates an aggregator for the given rate and step grid.
    pub fn new(rate: f64, dt: f64, maturity: f64, backend: ComputeBackend) -> Self {
        Self {
            rate,
            dt,
            maturity,
            backend,
        }
    }

    /// Discounted payoff of every path, in path order.
    pub fn path_payoffs(&self, state: &ExerciseState) -> Vec<f64> {
        let steps = state.steps();
        let terminal_discount = (-self.rate * self.maturity).exp();
        let (rate, dt) = (self.rate, self.dt);

        self.backend
            .collect_indexed(state.n_paths(), |p| match state.exercise_time(p) {
                Some(t) => state.intrinsic(p, t) * (-rate * t as f64 * dt).exp(),
                None => state.intrinsic(p, steps) * terminal_discount,
            })
    }

    /// Mean discounted payoff; zero for an empty batch.
    pub fn batch_price(&self, state: &ExerciseState) -> f64 {
        mean(&self.path_payoffs(state))
    }
}
