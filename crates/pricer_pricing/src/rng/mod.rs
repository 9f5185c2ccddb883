//! # Random Number Generation
//!
//! Seeded standard-normal draws for path simulation.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: a fixed seed always yields the same sequence, so a
//!   pricing run with `SimulationConfig::seed` set is deterministic
//! - **Fresh randomness**: without a seed, each run draws its seed from OS
//!   entropy and records it for logging
//! - **Zero allocation**: batch operations fill caller-owned `&mut [f64]` slices
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::PricerRng;
//!
//! let mut rng = PricerRng::from_seed(12345);
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;

pub use prng::PricerRng;
