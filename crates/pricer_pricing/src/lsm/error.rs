//! Configuration loading errors.

use pricer_core::types::ValidationError;
use thiserror::Error;

/// Error raised while loading a [`SimulationConfig`](super::SimulationConfig)
/// from a file, a TOML string or the environment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Failed to read config file '{path}': {message}")]
    Io {
        /// Path that was requested
        path: String,
        /// Underlying I/O error text
        message: String,
    },

    /// Configuration text is not valid TOML for this schema.
    #[error("Failed to parse TOML: {0}")]
    Parse(String),

    /// An environment override could not be parsed.
    #[error("Invalid environment override {var}='{value}'")]
    Env {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// Loaded values are outside their valid ranges.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
