//! Backward-induction exercise policy.
//!
//! The policy walks time steps from `steps − 1` down to 1. At each step it
//! regresses the discounted realised cash flow of the in-the-money paths on
//! their normalised spot, and marks a path for exercise when its intrinsic
//! value beats the fitted continuation value. Exercising resets the path's
//! realised cash flow to the intrinsic value at that step, so earlier
//! regressions see the policy implied by later decisions.
//!
//! At `t = steps − 1` the regression target is the next-step intrinsic value
//! discounted one step; it is not the intrinsic value at `t`, which is
//! linear in spot on the in-the-money set and would be reproduced by the fit.
//!
//! Terminal exercise is not part of the decision matrix; the payoff stage
//! reads the terminal intrinsic value directly.

use pricer_core::types::OptionKind;
use tracing::debug;

use super::backend::ComputeBackend;
use super::paths::PriceLattice;
use super::regression::ContinuationValueEstimator;

/// Per-step counters collected while running the policy on one batch.
///
/// Vectors are indexed by time step and have length `steps + 1`; entries
/// 0 and `steps` stay zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExerciseDiagnostics {
    /// In-the-money paths at each interior step.
    pub itm_paths: Vec<usize>,
    /// Paths whose earliest exercise falls on each interior step.
    pub exercised_paths: Vec<usize>,
    /// Steps at which the regression failed and intrinsic value was used.
    pub fallback_steps: Vec<usize>,
}

impl ExerciseDiagnostics {
    fn new(steps: usize) -> Self {
        Self {
            itm_paths: vec![0; steps + 1],
            exercised_paths: vec![0; steps + 1],
            fallback_steps: Vec::new(),
        }
    }

    /// Paths exercised before expiry.
    pub fn total_exercised(&self) -> usize {
        self.exercised_paths.iter().sum()
    }

    /// Number of regression fallbacks.
    #[inline]
    pub fn fallback_count(&self) -> usize {
        self.fallback_steps.len()
    }
}

/// Per-batch intrinsic, continuation and decision matrices.
///
/// All three share the lattice layout (`n_paths × (steps + 1)`, row-major).
/// Continuation entries are zero wherever no regression was evaluated.
#[derive(Clone, Debug)]
pub struct ExerciseState {
    n_paths: usize,
    steps: usize,
    intrinsic: Vec<f64>,
    continuation: Vec<f64>,
    decisions: Vec<bool>,
    exercise_times: Vec<Option<usize>>,
    diagnostics: ExerciseDiagnostics,
}

impl ExerciseState {
    #[inline]
    fn index(&self, path: usize, step: usize) -> usize {
        path * (self.steps + 1) + step
    }

    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time increments.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Intrinsic value of `path` at `step`.
    #[inline]
    pub fn intrinsic(&self, path: usize, step: usize) -> f64 {
        self.intrinsic[self.index(path, step)]
    }

    /// Continuation estimate of `path` at `step`.
    #[inline]
    pub fn continuation(&self, path: usize, step: usize) -> f64 {
        self.continuation[self.index(path, step)]
    }

    /// Whether exercise dominates continuation for `path` at `step`.
    #[inline]
    pub fn decision(&self, path: usize, step: usize) -> bool {
        self.decisions[self.index(path, step)]
    }

    /// Earliest interior exercise step of `path`, or `None` for expiry.
    #[inline]
    pub fn exercise_time(&self, path: usize) -> Option<usize> {
        self.exercise_times[path]
    }

    /// Counters gathered during the backward pass.
    #[inline]
    pub fn diagnostics(&self) -> &ExerciseDiagnostics {
        &self.diagnostics
    }
}

/// First step in `decisions` that is `true`, skipping step 0 and expiry.
///
/// `decisions` is one lattice row of length `steps + 1`.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::lsm::earliest_exercise;
///
/// assert_eq!(earliest_exercise(&[false, false, true, true, false]), Some(2));
/// assert_eq!(earliest_exercise(&[false, false, false, false]), None);
/// // Expiry is never an interior exercise
/// assert_eq!(earliest_exercise(&[false, false, true]), None);
/// ```
pub fn earliest_exercise(decisions: &[bool]) -> Option<usize> {
    let steps = decisions.len().checked_sub(1)?;
    (1..steps).find(|&t| decisions[t])
}

/// Backward-induction policy for one contract and step grid.
#[derive(Clone, Debug)]
pub struct ExercisePolicy {
    kind: OptionKind,
    strike: f64,
    step_discount: f64,
    estimator: ContinuationValueEstimator,
    backend: ComputeBackend,
}

impl ExercisePolicy {
    /// Creates a policy.
    ///
    /// `step_discount` is `exp(−r·dt)`.
    pub fn new(
        kind: OptionKind,
        strike: f64,
        step_discount: f64,
        estimator: ContinuationValueEstimator,
        backend: ComputeBackend,
    ) -> Self {
        Self {
            kind,
            strike,
            step_discount,
            estimator,
            backend,
        }
    }

    /// Runs backward induction over one lattice.
    pub fn evaluate(&self, lattice: &PriceLattice) -> ExerciseState {
        let n_paths = lattice.n_paths();
        let steps = lattice.steps();
        let width = steps + 1;

        let mut intrinsic = vec![0.0; lattice.as_slice().len()];
        let (kind, strike) = (self.kind, self.strike);
        self.backend
            .map_into(&mut intrinsic, lattice.as_slice(), |s| kind.intrinsic(s, strike));

        let mut continuation = vec![0.0; intrinsic.len()];
        let mut decisions = vec![false; intrinsic.len()];
        let mut diagnostics = ExerciseDiagnostics::new(steps);

        // Realised cash flow per path, valued at the step being processed
        let mut cash_flow: Vec<f64> = (0..n_paths)
            .map(|p| intrinsic[p * width + steps])
            .collect();

        let mut itm: Vec<usize> = Vec::with_capacity(n_paths);
        let mut itm_prices: Vec<f64> = Vec::with_capacity(n_paths);
        let mut itm_targets: Vec<f64> = Vec::with_capacity(n_paths);
        let mut itm_intrinsic: Vec<f64> = Vec::with_capacity(n_paths);

        for t in (1..steps).rev() {
            for cf in cash_flow.iter_mut() {
                *cf *= self.step_discount;
            }

            itm.clear();
            itm_prices.clear();
            itm_targets.clear();
            itm_intrinsic.clear();
            for p in 0..n_paths {
                let value = intrinsic[p * width + t];
                if value > 0.0 {
                    itm.push(p);
                    itm_prices.push(lattice.price(p, t));
                    itm_targets.push(cash_flow[p]);
                    itm_intrinsic.push(value);
                }
            }
            diagnostics.itm_paths[t] = itm.len();
            if itm.is_empty() {
                continue;
            }

            let estimate = self
                .estimator
                .estimate(&itm_prices, &itm_targets, &itm_intrinsic);
            if let Some(err) = &estimate.fallback {
                debug!(step = t, itm = itm.len(), error = %err, "regression fallback");
                diagnostics.fallback_steps.push(t);
            }

            for (k, &p) in itm.iter().enumerate() {
                let idx = p * width + t;
                let cont = estimate.values[k];
                continuation[idx] = cont;
                let value = itm_intrinsic[k];
                if value > cont && value > 0.0 {
                    decisions[idx] = true;
                    cash_flow[p] = value;
                }
            }
        }

        let exercise_times = self.backend.collect_indexed(n_paths, |p| {
            earliest_exercise(&decisions[p * width..(p + 1) * width])
        });
        for t in exercise_times.iter().flatten() {
            diagnostics.exercised_paths[*t] += 1;
        }

        ExerciseState {
            n_paths,
            steps,
            intrinsic,
            continuation,
            decisions,
            exercise_times,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsm::paths::PathSimulator;
    use crate::rng::PricerRng;
    use pricer_core::types::ContractParameters;

    fn policy_for(contract: &ContractParameters, steps: usize, backend: ComputeBackend) -> ExercisePolicy {
        let dt = contract.maturity / steps as f64;
        ExercisePolicy::new(
            contract.kind,
            contract.strike,
            (-contract.rate * dt).exp(),
            ContinuationValueEstimator::new(2),
            backend,
        )
    }

    #[test]
    fn test_earliest_exercise_scan() {
        assert_eq!(earliest_exercise(&[]), None);
        assert_eq!(earliest_exercise(&[true]), None);
        assert_eq!(earliest_exercise(&[true, true, false]), Some(1));
        assert_eq!(earliest_exercise(&[false, false, false, true, false, true]), Some(3));
    }

    #[test]
    fn test_decisions_only_on_itm_interior_steps() {
        let contract = ContractParameters::new(100.0, 100.0, 0.06, 0.3, 1.0, OptionKind::Put);
        let lattice = PathSimulator::new(&contract, 10, ComputeBackend::Cpu)
            .simulate(2_000, &mut PricerRng::from_seed(11));
        let state = policy_for(&contract, 10, ComputeBackend::Cpu).evaluate(&lattice);

        for p in 0..state.n_paths() {
            assert!(!state.decision(p, 0));
            assert!(!state.decision(p, 10));
            for t in 1..10 {
                if state.decision(p, t) {
                    assert!(state.intrinsic(p, t) > 0.0);
                    assert!(state.intrinsic(p, t) > state.continuation(p, t));
                }
            }
            if let Some(t) = state.exercise_time(p) {
                assert!(state.decision(p, t));
                assert!((1..t).all(|s| !state.decision(p, s)));
            }
        }
        assert!(state.diagnostics().total_exercised() > 0);
    }

    #[test]
    fn test_last_interior_step_regresses_discounted_terminal_intrinsic() {
        let contract = ContractParameters::new(100.0, 105.0, 0.05, 0.25, 1.0, OptionKind::Put);
        let steps = 10;
        let discount = (-contract.rate * contract.maturity / steps as f64).exp();
        let lattice = PathSimulator::new(&contract, steps, ComputeBackend::Cpu)
            .simulate(1_000, &mut PricerRng::from_seed(13));
        let state = policy_for(&contract, steps, ComputeBackend::Cpu).evaluate(&lattice);

        let t = steps - 1;
        let itm: Vec<usize> = (0..state.n_paths())
            .filter(|&p| state.intrinsic(p, t) > 0.0)
            .collect();
        let prices: Vec<f64> = itm.iter().map(|&p| lattice.price(p, t)).collect();
        let targets: Vec<f64> = itm
            .iter()
            .map(|&p| state.intrinsic(p, steps) * discount)
            .collect();
        let intrinsic: Vec<f64> = itm.iter().map(|&p| state.intrinsic(p, t)).collect();

        let expected = ContinuationValueEstimator::new(2).estimate(&prices, &targets, &intrinsic);
        assert!(expected.fallback.is_none());
        for (k, &p) in itm.iter().enumerate() {
            approx::assert_relative_eq!(
                state.continuation(p, t),
                expected.values[k],
                max_relative = 1e-12
            );
        }
        // The fitted continuation is not the current intrinsic value
        assert!(itm
            .iter()
            .any(|&p| (state.continuation(p, t) - state.intrinsic(p, t)).abs() > 1e-6));
    }

    #[test]
    fn test_deep_itm_put_exercises_early() {
        // High rate and deep moneyness: waiting costs more interest than it buys
        let contract = ContractParameters::new(70.0, 100.0, 0.1, 0.2, 1.0, OptionKind::Put);
        let lattice = PathSimulator::new(&contract, 10, ComputeBackend::Cpu)
            .simulate(4_000, &mut PricerRng::from_seed(21));
        let state = policy_for(&contract, 10, ComputeBackend::Cpu).evaluate(&lattice);

        let diagnostics = state.diagnostics();
        assert!(diagnostics.total_exercised() > 2_000);
        assert_eq!(diagnostics.itm_paths[1], 4_000);
        assert!(diagnostics.exercised_paths[1] > 2_000);
    }

    #[test]
    fn test_zero_volatility_uses_fallback() {
        let contract = ContractParameters::new(90.0, 100.0, 0.05, 0.0, 1.0, OptionKind::Put);
        let lattice = PathSimulator::new(&contract, 5, ComputeBackend::Cpu)
            .simulate(50, &mut PricerRng::from_seed(1));
        let state = policy_for(&contract, 5, ComputeBackend::Cpu).evaluate(&lattice);

        assert_eq!(state.diagnostics().fallback_count(), 4);
        assert_eq!(state.diagnostics().total_exercised(), 0);
        assert!((0..50).all(|p| state.exercise_time(p).is_none()));
    }

    #[test]
    fn test_out_of_the_money_paths_never_exercise() {
        let contract = ContractParameters::new(100.0, 50.0, 0.05, 0.1, 1.0, OptionKind::Put);
        let lattice = PathSimulator::new(&contract, 8, ComputeBackend::Cpu)
            .simulate(500, &mut PricerRng::from_seed(4));
        let state = policy_for(&contract, 8, ComputeBackend::Cpu).evaluate(&lattice);

        assert!(state.diagnostics().itm_paths.iter().all(|&n| n == 0));
        assert_eq!(state.diagnostics().fallback_count(), 0);
        assert!((0..500).all(|p| state.exercise_time(p).is_none()));
    }

    #[test]
    fn test_backends_agree() {
        let contract = ContractParameters::new(100.0, 110.0, 0.05, 0.2, 1.0, OptionKind::Put);
        let lattice = PathSimulator::new(&contract, 12, ComputeBackend::Cpu)
            .simulate(1_000, &mut PricerRng::from_seed(99));

        let cpu = policy_for(&contract, 12, ComputeBackend::Cpu).evaluate(&lattice);
        let par = policy_for(&contract, 12, ComputeBackend::Rayon).evaluate(&lattice);

        assert_eq!(cpu.diagnostics(), par.diagnostics());
        assert!((0..1_000).all(|p| cpu.exercise_time(p) == par.exercise_time(p)));
    }
}
