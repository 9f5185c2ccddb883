//! Contract and error types.
//!
//! This module provides:
//! - `option`: [`OptionKind`] and [`ContractParameters`]
//! - `error`: [`ValidationError`], [`SolverError`] and [`PricingError`]

pub mod error;
pub mod option;

// Re-export commonly used types at module level
pub use error::{PricingError, SolverError, ValidationError};
pub use option::{ContractParameters, OptionKind};
