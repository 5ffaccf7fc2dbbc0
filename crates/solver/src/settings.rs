//! Solver configuration.

/// Iteration budgets and tolerances for [`AugmentedLagrangianSolver`].
///
/// [`AugmentedLagrangianSolver`]: crate::AugmentedLagrangianSolver
#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    /// Maximum multiplier updates.
    pub max_outer_iterations: usize,
    /// Maximum L-BFGS iterations per subproblem.
    pub max_inner_iterations: u64,
    /// Largest constraint violation accepted as feasible.
    pub feasibility_tolerance: f64,
    /// Relative objective change between outer iterations treated as converged.
    pub cost_tolerance: f64,
    /// Gradient-norm tolerance for the inner L-BFGS solve.
    pub gradient_tolerance: f64,
    /// Starting quadratic penalty weight.
    pub initial_penalty: f64,
    /// Upper limit for the penalty weight.
    pub max_penalty: f64,
    /// Penalty growth factor when the violation stalls.
    pub penalty_growth: f64,
    /// L-BFGS history size.
    pub lbfgs_memory: usize,
    /// Fraction of each bound range by which start points are pulled inside.
    pub interior_margin: f64,
    /// Initial simplex edge for the Nelder-Mead fallback.
    pub simplex_step: f64,
    /// Largest violation left after the projection polish.
    pub polish_tolerance: f64,
    /// Maximum alternating-projection sweeps.
    pub polish_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_outer_iterations: 50,
            max_inner_iterations: 500,
            feasibility_tolerance: 1e-8,
            cost_tolerance: 1e-9,
            gradient_tolerance: 1e-10,
            initial_penalty: 10.0,
            max_penalty: 1e9,
            penalty_growth: 10.0,
            lbfgs_memory: 10,
            interior_margin: 1e-3,
            simplex_step: 0.1,
            polish_tolerance: 1e-10,
            polish_iterations: 500,
        }
    }
}

impl SolverSettings {
    /// Doubled iteration budgets, used when retrying a failed solve.
    #[must_use]
    pub fn relaxed(&self) -> Self {
        Self {
            max_outer_iterations: self.max_outer_iterations * 2,
            max_inner_iterations: self.max_inner_iterations * 2,
            polish_iterations: self.polish_iterations * 2,
            ..self.clone()
        }
    }

    /// Set the outer iteration budget.
    #[must_use]
    pub const fn with_max_outer_iterations(mut self, n: usize) -> Self {
        self.max_outer_iterations = n;
        self
    }

    /// Set the inner iteration budget.
    #[must_use]
    pub const fn with_max_inner_iterations(mut self, n: u64) -> Self {
        self.max_inner_iterations = n;
        self
    }

    /// Set the feasibility tolerance.
    #[must_use]
    pub const fn with_feasibility_tolerance(mut self, tol: f64) -> Self {
        self.feasibility_tolerance = tol;
        self
    }

    /// Set the relative cost tolerance.
    #[must_use]
    pub const fn with_cost_tolerance(mut self, tol: f64) -> Self {
        self.cost_tolerance = tol;
        self
    }
}
