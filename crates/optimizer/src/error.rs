//! Error types for portfolio optimization.

use frontier_primitives::ParseError;
use frontier_risk::RiskError;
use frontier_traits::SolverError;

/// Errors that can occur during portfolio optimization.
#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    /// Degenerate or inconsistent input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No start converged, including the fallback retry.
    #[error("optimization failed: {message}")]
    OptimizationFailed {
        /// Diagnostic from the last solver attempt.
        message: String,
    },

    /// The solver reported success but the weights violate a constraint.
    #[error("optimization produced invalid weights: {0}")]
    InvalidResult(String),

    /// The frontier sweep produced no valid point.
    #[error("efficient frontier is empty: no target return could be solved")]
    EmptyFrontier,

    /// Risk metric error.
    #[error("risk error: {0}")]
    Risk(#[from] RiskError),

    /// Solver error.
    #[error("solver error: {0}")]
    Solver(#[from] SolverError),
}

impl From<ParseError> for OptimizerError {
    fn from(err: ParseError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl OptimizerError {
    /// Returns whether a retry with another seed or more iterations may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::OptimizationFailed { .. } | Self::EmptyFrontier)
    }
}
