//! Augmented-Lagrangian constrained solver.

use argmin_math::ArgminL2Norm;
use frontier_traits::{ConstrainedSolver, Objective, Problem, SolveOutcome, SolverError};
use tracing::{debug, trace};

use crate::{
    AugmentedLagrangian, BoxTransform, SolverSettings,
    inner::{Subproblem, minimize_lbfgs, minimize_nelder_mead},
    project_feasible,
};

/// Penalty grows when an outer iteration reduces the violation by less than this factor.
const SUFFICIENT_DECREASE: f64 = 0.25;

/// Local minimizer for box-bounded problems with linear side constraints.
///
/// Each outer iteration minimizes the augmented Lagrangian in sine-transformed
/// coordinates with L-BFGS (Nelder-Mead if the line search fails), then
/// updates the multipliers. The final point is projected onto the feasible
/// set. Convergence is reported when the violation is within tolerance and
/// the objective has stopped changing.
#[derive(Debug, Clone, Default)]
pub struct AugmentedLagrangianSolver {
    settings: SolverSettings,
}

impl AugmentedLagrangianSolver {
    /// Create a solver with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(SolverSettings::default())
    }

    /// Get the settings.
    #[must_use]
    pub const fn settings(&self) -> &SolverSettings {
        &self.settings
    }
}

impl ConstrainedSolver for AugmentedLagrangianSolver {
    type Settings = SolverSettings;

    fn with_settings(settings: Self::Settings) -> Self {
        Self { settings }
    }

    fn relaxed(&self) -> Self {
        Self::with_settings(self.settings.relaxed())
    }

    fn minimize(
        &self,
        objective: &dyn Objective,
        problem: &Problem,
        x0: &[f64],
    ) -> Result<SolveOutcome, SolverError> {
        problem.validate(x0)?;
        let s = &self.settings;

        let transform = BoxTransform::new(problem.bounds());
        let mut lagrangian =
            AugmentedLagrangian::new(objective, problem.constraints(), s.initial_penalty);

        let mut x = transform.to_unconstrained(x0, s.interior_margin);
        let mut w = transform.to_bounded(&x);
        let mut prev_value = objective.value(&w);
        if !prev_value.is_finite() {
            return Err(SolverError::NonFiniteStart(objective.name().to_string()));
        }
        let mut prev_violation = f64::INFINITY;

        let mut converged = false;
        let mut iterations = 0;
        let mut failure: Option<String> = None;

        for k in 0..s.max_outer_iterations {
            iterations = k + 1;
            let sub = Subproblem::new(&lagrangian, &transform);

            x = match minimize_lbfgs(sub, x.clone(), s) {
                Ok(next) => next,
                Err(err) => {
                    trace!(%err, iteration = k, "L-BFGS failed, trying Nelder-Mead");
                    match minimize_nelder_mead(sub, x.clone(), s) {
                        Ok(next) => next,
                        Err(err) => {
                            failure = Some(format!("inner solve failed: {err}"));
                            break;
                        }
                    }
                }
            };

            w = transform.to_bounded(&x);
            let value = objective.value(&w);
            let violation = lagrangian.violation(&w);
            trace!(
                iteration = k,
                value,
                violation,
                penalty = lagrangian.penalty(),
                grad_norm = transform.pull_back(&x, &lagrangian.gradient(&w)).l2_norm(),
                "outer iteration"
            );

            lagrangian.update_multipliers(&w);

            let stalled = (value - prev_value).abs() <= s.cost_tolerance * value.abs().max(1.0);
            if k > 0 && violation <= s.feasibility_tolerance && stalled {
                converged = true;
                break;
            }
            if violation > SUFFICIENT_DECREASE * prev_violation {
                lagrangian.grow_penalty(s.penalty_growth, s.max_penalty);
            }
            prev_value = value;
            prev_violation = violation;
        }

        let polished = project_feasible(problem, &w, s.polish_tolerance, s.polish_iterations);
        let value = objective.value(&polished);
        let max_violation = problem.max_violation(&polished);
        let feasible = max_violation <= s.feasibility_tolerance;

        let message = match (&failure, converged, feasible) {
            (Some(reason), _, _) => reason.clone(),
            (None, true, true) => format!("converged after {iterations} outer iterations"),
            (None, true, false) => {
                format!("projection left violation {max_violation:.3e} after convergence")
            }
            (None, false, _) => format!(
                "outer iteration limit {} reached with violation {max_violation:.3e}",
                s.max_outer_iterations
            ),
        };
        let converged = failure.is_none() && converged && feasible && value.is_finite();

        debug!(
            objective = objective.name(),
            iterations,
            converged,
            value,
            violation = max_violation,
            "constrained solve finished"
        );

        Ok(SolveOutcome { x: polished, value, converged, iterations, max_violation, message })
    }
}
