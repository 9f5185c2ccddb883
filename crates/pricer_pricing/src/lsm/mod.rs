//! Least-Squares Monte Carlo pricing of American options.
//!
//! # Pipeline
//!
//! ```text
//! PathSimulator ──► ExercisePolicy ──► PayoffAggregator ──► ConvergenceTracker
//!                        │                                        │
//!           ContinuationValueEstimator                 resize / stop / continue
//! ```
//!
//! [`PricingEngine`] drives the pipeline batch by batch. Every per-batch
//! structure ([`PriceLattice`], [`ExerciseState`]) is dropped before the
//! next batch starts; only the scalar batch prices persist.

mod backend;
mod config;
mod convergence;
mod engine;
mod error;
mod exercise;
mod paths;
mod payoff;
mod regression;

pub use backend::ComputeBackend;
pub use config::{env, SimulationConfig, SimulationConfigBuilder, MAX_DEGREE, MAX_STEPS};
pub use convergence::{
    adaptive_batch_size, convergence_rate, BatchStatistics, ConvergenceCriteria,
    ConvergenceTracker, RATE_WINDOW,
};
pub use engine::{EngineResult, PricingEngine};
pub use error::ConfigError;
pub use exercise::{earliest_exercise, ExerciseDiagnostics, ExercisePolicy, ExerciseState};
pub use paths::{GbmParams, PathSimulator, PriceLattice};
pub use payoff::PayoffAggregator;
pub use regression::{polynomial_basis, ContinuationEstimate, ContinuationValueEstimator};
