//! Error types for the VQE core.

use thiserror::Error;

use crate::optimizers::OptimizerError;

/// Errors that can occur while building or running the VQE workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VqeError {
    /// The iteration budget must be at least one.
    #[error("Invalid iteration budget {0}: at least one iteration is required")]
    InvalidIterationBudget(usize),

    /// A parameter vector with no entries was supplied.
    #[error("Parameter vector is empty")]
    EmptyParameters,

    /// The ansatz received a different number of parameters than it binds.
    #[error("Ansatz expects {expected} parameters, got {got}")]
    ParameterCount {
        /// Number of parameters the ansatz binds.
        expected: usize,
        /// Number of parameters supplied.
        got: usize,
    },

    /// The requested ansatz shape cannot be built.
    #[error("Invalid ansatz: {0}")]
    InvalidAnsatz(String),

    /// A bond-length scan was requested with an unusable grid.
    #[error("Invalid scan: {0}")]
    InvalidScan(String),

    /// The minimizer failed; the run is aborted.
    #[error("Optimizer failure: {0}")]
    Optimizer(#[from] OptimizerError),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for VqeError {
    fn from(e: serde_json::Error) -> Self {
        VqeError::Config(e.to_string())
    }
}

impl From<serde_yaml_ng::Error> for VqeError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        VqeError::Config(e.to_string())
    }
}

impl From<std::io::Error> for VqeError {
    fn from(e: std::io::Error) -> Self {
        VqeError::Config(e.to_string())
    }
}

/// Result type for VQE operations.
pub type VqeResult<T> = Result<T, VqeError>;
