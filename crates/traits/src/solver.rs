//! Constrained solver trait definitions.

use thiserror::Error;

use crate::{Bounds, LinearConstraint, Objective};

/// Errors raised before or while running a constrained solve.
///
/// Failure to converge is not an error: it is reported through
/// [`SolveOutcome::converged`] so callers can try another start.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Start point, bounds, or constraints disagree on dimension.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being checked.
        context: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Bounds are not finite or are inverted.
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// The start point produced a non-finite objective value.
    #[error("objective '{0}' is not finite at the start point")]
    NonFiniteStart(String),

    /// The numerical backend reported an error.
    #[error("solver backend error: {0}")]
    Backend(String),
}

impl SolverError {
    /// Check if this error is recoverable by retrying from another start.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NonFiniteStart(_) | Self::Backend(_))
    }
}

/// A box-bounded problem with linear side constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    bounds: Bounds,
    constraints: Vec<LinearConstraint>,
}

impl Problem {
    /// Create a problem with bounds and no side constraints.
    #[must_use]
    pub const fn new(bounds: Bounds) -> Self {
        Self { bounds, constraints: Vec::new() }
    }

    /// Add a linear constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: LinearConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Add a linear constraint in place.
    pub fn push_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Variable bounds.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Side constraints.
    #[must_use]
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Number of decision variables.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Largest violation across bounds and side constraints.
    #[must_use]
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        self.constraints.iter().map(|c| c.violation(x)).fold(self.bounds.violation(x), f64::max)
    }

    /// Check that bounds and constraints agree with each other and with `x0`.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found.
    pub fn validate(&self, x0: &[f64]) -> Result<(), SolverError> {
        let n = self.dimension();
        if !self.bounds.is_well_formed() {
            return Err(SolverError::InvalidBounds(
                "bounds must be finite with lower <= upper".to_string(),
            ));
        }
        if x0.len() != n {
            return Err(SolverError::DimensionMismatch {
                context: "start point",
                expected: n,
                actual: x0.len(),
            });
        }
        if let Some(c) = self.constraints.iter().find(|c| c.dimension() != n) {
            return Err(SolverError::DimensionMismatch {
                context: "constraint coefficients",
                expected: n,
                actual: c.dimension(),
            });
        }
        Ok(())
    }
}

/// Result of a single constrained solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// Final point.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub value: f64,
    /// Whether the solver met its convergence and feasibility criteria.
    pub converged: bool,
    /// Outer iterations performed.
    pub iterations: usize,
    /// Largest constraint or bound violation at `x`.
    pub max_violation: f64,
    /// Human-readable termination reason.
    pub message: String,
}

/// Minimizes an [`Objective`] over a [`Problem`].
pub trait ConstrainedSolver: Send + Sync {
    /// Solver configuration type.
    type Settings: Default + Clone;

    /// Create a solver with the given settings.
    fn with_settings(settings: Self::Settings) -> Self
    where
        Self: Sized;

    /// Minimize `objective` starting from `x0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the problem is malformed or the backend fails
    /// in a way that leaves no usable point.
    fn minimize(
        &self,
        objective: &dyn Objective,
        problem: &Problem,
        x0: &[f64],
    ) -> Result<SolveOutcome, SolverError>;

    /// A copy of this solver with a more generous iteration budget.
    #[must_use]
    fn relaxed(&self) -> Self
    where
        Self: Sized;
}
