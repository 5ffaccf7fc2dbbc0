//! Unconstrained subproblem solves through `argmin`.

use argmin::{
    core::{ArgminError, CostFunction, Error, Executor, Gradient, State},
    solver::{linesearch::MoreThuenteLineSearch, neldermead::NelderMead, quasinewton::LBFGS},
};

use crate::{AugmentedLagrangian, BoxTransform, SolverSettings};

/// The augmented Lagrangian viewed in unconstrained coordinates.
#[derive(Clone, Copy)]
pub(crate) struct Subproblem<'a, 'b> {
    lagrangian: &'b AugmentedLagrangian<'a>,
    transform: &'b BoxTransform,
}

impl<'a, 'b> Subproblem<'a, 'b> {
    pub(crate) const fn new(
        lagrangian: &'b AugmentedLagrangian<'a>,
        transform: &'b BoxTransform,
    ) -> Self {
        Self { lagrangian, transform }
    }
}

impl CostFunction for Subproblem<'_, '_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.lagrangian.value(&self.transform.to_bounded(x));
        if !value.is_finite() {
            return Err(ArgminError::ConditionViolated {
                text: format!("non-finite cost {value}"),
            }
            .into());
        }
        Ok(value)
    }
}

impl Gradient for Subproblem<'_, '_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, Error> {
        let grad_w = self.lagrangian.gradient(&self.transform.to_bounded(x));
        let grad = self.transform.pull_back(x, &grad_w);
        if grad.iter().any(|g| !g.is_finite()) {
            return Err(ArgminError::ConditionViolated {
                text: "non-finite gradient".to_string(),
            }
            .into());
        }
        Ok(grad)
    }
}

type MoreThuente = MoreThuenteLineSearch<Vec<f64>, Vec<f64>, f64>;

/// L-BFGS with More-Thuente line search from `x0`.
pub(crate) fn minimize_lbfgs(
    problem: Subproblem<'_, '_>,
    x0: Vec<f64>,
    settings: &SolverSettings,
) -> Result<Vec<f64>, Error> {
    let linesearch: MoreThuente = MoreThuenteLineSearch::new().with_c(1e-4, 0.9)?;
    let solver: LBFGS<MoreThuente, Vec<f64>, Vec<f64>, f64> =
        LBFGS::new(linesearch, settings.lbfgs_memory)
            .with_tolerance_grad(settings.gradient_tolerance)?
            .with_tolerance_cost(settings.cost_tolerance * 1e-3)?;

    let result = Executor::new(problem, solver)
        .configure(|state| state.param(x0).max_iters(settings.max_inner_iterations))
        .run()?;

    result.state().get_best_param().cloned().ok_or_else(|| {
        ArgminError::PotentialBug { text: "L-BFGS finished without a best point".to_string() }
            .into()
    })
}

/// Nelder-Mead from a right-angled simplex anchored at `x0`.
pub(crate) fn minimize_nelder_mead(
    problem: Subproblem<'_, '_>,
    x0: Vec<f64>,
    settings: &SolverSettings,
) -> Result<Vec<f64>, Error> {
    let mut simplex = Vec::with_capacity(x0.len() + 1);
    for i in 0..x0.len() {
        let mut vertex = x0.clone();
        vertex[i] += settings.simplex_step;
        simplex.push(vertex);
    }
    simplex.push(x0);

    let solver: NelderMead<Vec<f64>, f64> = NelderMead::new(simplex).with_sd_tolerance(1e-12)?;
    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(settings.max_inner_iterations * 4))
        .run()?;

    result.state().get_best_param().cloned().ok_or_else(|| {
        ArgminError::PotentialBug { text: "Nelder-Mead finished without a best point".to_string() }
            .into()
    })
}
