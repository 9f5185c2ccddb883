//! # pricer_core: Foundation for the LSM American Option Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Contract types: `OptionKind`, `ContractParameters` (`types::option`)
//! - Error types: `ValidationError`, `SolverError`, `PricingError` (`types::error`)
//! - Sample statistics and normal quantiles (`math::statistics`, `math::distributions`)
//! - SVD-based least squares (`math::least_squares`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - nalgebra: Dense matrices and SVD
//! - statrs: Inverse normal CDF
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::{ContractParameters, OptionKind};
//!
//! let kind: OptionKind = "call".parse().unwrap();
//! let contract = ContractParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, kind);
//! contract.validate().unwrap();
//! assert_eq!(contract.intrinsic(110.0), 10.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `OptionKind` and `ContractParameters`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
