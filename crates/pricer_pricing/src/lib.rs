//! # pricer_pricing: LSM Engine for American Options (Layer 3)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing prices American-style options on a single GBM underlying:
//! - Seeded random number generation (`rng`)
//! - Least-Squares Monte Carlo with adaptive convergence (`lsm`)
//! - Bump-and-revalue Greeks over the full engine (`greeks`)
//! - The [`price_american_option`] entry point
//!
//! Contract types and numerical helpers come from `pricer_core` (Layer 1).
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::types::{ContractParameters, OptionKind};
//! use pricer_pricing::greeks::GreeksConfig;
//! use pricer_pricing::lsm::SimulationConfig;
//! use pricer_pricing::price_american_option;
//!
//! let contract = ContractParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionKind::Put);
//! let simulation = SimulationConfig::builder()
//!     .steps(20)
//!     .batch_size(1_000)
//!     .max_paths(5_000)
//!     .seed(2024)
//!     .build()
//!     .unwrap();
//!
//! let result = price_american_option(&contract, &simulation, &GreeksConfig::default()).unwrap();
//! assert!(result.price > 0.0);
//! assert!(result.greeks.delta < 0.0);
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events and spans (`price_american_option`,
//! `lsm_engine.price`, `greeks.estimate`) but never installs a subscriber.
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialisation of configuration and results, and
//!   TOML loading via `SimulationConfig::from_toml_str` / `from_file`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod greeks;
pub mod lsm;
mod pricing;
pub mod rng;

pub use pricing::{price_american_option, PricingResult};
