//! Multi-start portfolio optimization.

use frontier_primitives::{
    Allocation, ObjectiveKind, PortfolioMode, ReturnsMatrix, RiskContributions,
};
use frontier_risk::{annualized_covariance, annualized_mean_returns, risk_decomposition_map};
use frontier_solver::AugmentedLagrangianSolver;
use frontier_traits::{ConstrainedSolver, Objective, Problem, SolveOutcome};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Dirichlet, Distribution};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    EsgBlend, EsgTilt, FrontierConfig, LayoutObjective, MinVarianceObjective, OptimizationResult,
    OptimizerConfig, OptimizerError, PortfolioMetrics, RatioObjective, WeightLayout,
};

/// Tolerance applied when checking the final weights.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Gross exposure of the randomized long/short starts.
const LONG_SHORT_START_GROSS: f64 = 0.5;

/// Portfolio optimizer over a fixed returns matrix.
///
/// Local solves are repeated from several starting points and the best
/// converged result is kept. This improves the odds of finding the global
/// optimum of non-convex ratio objectives but does not guarantee it.
#[derive(Debug, Clone)]
pub struct PortfolioOptimizer<S = AugmentedLagrangianSolver> {
    returns: ReturnsMatrix,
    config: OptimizerConfig,
    frontier: FrontierConfig,
    solver: S,
    mean_returns: Array1<f64>,
    covariance: Array2<f64>,
}

impl PortfolioOptimizer {
    /// Create an optimizer with the default solver.
    ///
    /// # Errors
    /// Returns [`OptimizerError::InvalidInput`] for an empty or non-finite
    /// returns matrix, fewer than two periods, or inconsistent configuration.
    pub fn new(returns: ReturnsMatrix, config: OptimizerConfig) -> Result<Self, OptimizerError> {
        validate_inputs(&returns, &config)?;
        let mean_returns = annualized_mean_returns(returns.values().view())?;
        let covariance = annualized_covariance(returns.values().view())?;

        Ok(Self {
            returns,
            config,
            frontier: FrontierConfig::default(),
            solver: AugmentedLagrangianSolver::new(),
            mean_returns,
            covariance,
        })
    }
}

impl<S: ConstrainedSolver> PortfolioOptimizer<S> {
    /// Replace the constrained solver.
    #[must_use]
    pub fn with_solver<T: ConstrainedSolver>(self, solver: T) -> PortfolioOptimizer<T> {
        PortfolioOptimizer {
            returns: self.returns,
            config: self.config,
            frontier: self.frontier,
            solver,
            mean_returns: self.mean_returns,
            covariance: self.covariance,
        }
    }

    /// Set the efficient-frontier policy.
    #[must_use]
    pub fn with_frontier_config(mut self, frontier: FrontierConfig) -> Self {
        self.frontier = frontier;
        self
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Get the frontier policy.
    #[must_use]
    pub const fn frontier_config(&self) -> &FrontierConfig {
        &self.frontier
    }

    /// Get the solver.
    #[must_use]
    pub const fn solver(&self) -> &S {
        &self.solver
    }

    /// Returns matrix being optimized.
    #[must_use]
    pub const fn returns(&self) -> &ReturnsMatrix {
        &self.returns
    }

    /// Annualized mean return per instrument.
    #[must_use]
    pub const fn mean_returns(&self) -> &Array1<f64> {
        &self.mean_returns
    }

    /// Annualized covariance matrix.
    #[must_use]
    pub const fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    pub(crate) fn layout(&self) -> WeightLayout {
        WeightLayout::for_mode(self.config.mode, self.returns.n_instruments())
    }

    pub(crate) fn equal_weights(&self) -> Vec<f64> {
        let n = self.returns.n_instruments();
        vec![1.0 / n as f64; n]
    }

    /// The configured objective, blended with ESG quality when active.
    #[must_use]
    pub fn objective(&self) -> Box<dyn Objective> {
        let values = self.returns.values();
        let rf = self.config.risk_free_rate;
        let base: Box<dyn Objective> = match self.config.objective {
            ObjectiveKind::Sharpe => Box::new(RatioObjective::sharpe(values, rf)),
            ObjectiveKind::Sortino => Box::new(RatioObjective::sortino(values, rf)),
            ObjectiveKind::Calmar => Box::new(RatioObjective::calmar(values)),
            ObjectiveKind::MinVariance => {
                Box::new(MinVarianceObjective::new(self.covariance.clone()))
            }
        };

        let scores = match &self.config.esg_scores {
            Some(scores) if self.config.esg_active() => scores,
            _ => return base,
        };

        let tilt = EsgTilt::new(scores, self.returns.symbols());
        if !tilt.covers_any() {
            warn!("no instrument in the returns matrix has an ESG score");
        }
        let scale = if self.config.objective.is_ratio() {
            self.config.esg_ratio_scale
        } else {
            MinVarianceObjective::new(self.covariance.clone()).max_variance()
        };
        Box::new(EsgBlend::new(base, tilt, self.config.esg_weight, scale))
    }

    /// Starting weights: equal weights first, then randomized draws.
    ///
    /// Long-only draws come from a flat Dirichlet over the simplex; long/short
    /// draws are uniform in `[-0.5, 0.5]` rescaled to a gross exposure of 0.5.
    #[must_use]
    pub fn starting_points(&self) -> Vec<Vec<f64>> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let n = self.returns.n_instruments();
        let equal = self.equal_weights();
        let dirichlet = Dirichlet::new_with_size(1.0, n).ok();

        let mut starts = Vec::with_capacity(self.config.restarts);
        starts.push(equal.clone());
        for _ in 1..self.config.restarts {
            let start = match self.config.mode {
                PortfolioMode::LongOnly => match &dirichlet {
                    Some(d) => d.sample(&mut rng),
                    None => equal.clone(),
                },
                PortfolioMode::LongShort => {
                    let raw: Vec<f64> = (0..n).map(|_| rng.gen_range(-0.5..0.5)).collect();
                    let gross: f64 = raw.iter().map(|w| w.abs()).sum();
                    if gross > 0.0 {
                        raw.iter().map(|w| w / gross * LONG_SHORT_START_GROSS).collect()
                    } else {
                        equal.clone()
                    }
                }
            };
            starts.push(start);
        }
        starts
    }

    /// Bounds, budget and leverage constraints of the configured mode.
    #[must_use]
    pub fn problem(&self) -> Problem {
        self.layout().problem(self.config.max_leverage)
    }

    /// Solve `objective` from weights `start`, returning the outcome in solver variables.
    pub(crate) fn solve_from(
        &self,
        solver: &S,
        objective: &dyn Objective,
        problem: &Problem,
        start: &[f64],
    ) -> Result<SolveOutcome, OptimizerError> {
        let layout = self.layout();
        let wrapped = LayoutObjective::new(objective, layout);
        Ok(solver.minimize(&wrapped, problem, &layout.encode(start))?)
    }

    /// Optimize the configured objective.
    ///
    /// Every starting point is solved in parallel and the converged solve
    /// with the lowest objective wins. When none converges, one more attempt
    /// is made from equal weights with a relaxed iteration budget.
    ///
    /// # Errors
    /// Returns [`OptimizerError::OptimizationFailed`] when no solve
    /// converges and [`OptimizerError::InvalidResult`] when the winning
    /// weights violate a constraint.
    pub fn optimize(&self) -> Result<OptimizationResult, OptimizerError> {
        let objective = self.objective();
        let problem = self.problem();
        let layout = self.layout();
        let starts = self.starting_points();

        let attempts: Vec<Result<SolveOutcome, OptimizerError>> = starts
            .par_iter()
            .map(|start| self.solve_from(&self.solver, objective.as_ref(), &problem, start))
            .collect();

        let mut best: Option<SolveOutcome> = None;
        let mut converged = 0;
        let mut last_message = String::from("no start was attempted");
        for (attempt, outcome) in attempts.into_iter().enumerate() {
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(OptimizerError::Solver(err)) if err.is_recoverable() => {
                    debug!(attempt, %err, "start failed");
                    last_message = err.to_string();
                    continue;
                }
                Err(err) => return Err(err),
            };
            debug!(
                attempt,
                converged = outcome.converged,
                value = outcome.value,
                iterations = outcome.iterations,
                "start finished"
            );
            if !outcome.converged {
                last_message = outcome.message;
                continue;
            }
            converged += 1;
            if best.as_ref().is_none_or(|b| outcome.value < b.value) {
                best = Some(outcome);
            }
        }

        let best = match best {
            Some(best) => best,
            None => {
                warn!(
                    objective = %self.config.objective,
                    mode = %self.config.mode,
                    %last_message,
                    "no start converged, retrying from equal weights"
                );
                let retry = self.solve_from(
                    &self.solver.relaxed(),
                    objective.as_ref(),
                    &problem,
                    &self.equal_weights(),
                );
                match retry {
                    Ok(outcome) if outcome.converged => outcome,
                    Ok(outcome) => {
                        return Err(OptimizerError::OptimizationFailed { message: outcome.message });
                    }
                    Err(OptimizerError::Solver(err)) if err.is_recoverable() => {
                        return Err(OptimizerError::OptimizationFailed { message: err.to_string() });
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        let weights = Array1::from(layout.weights(&best.x));
        self.validate_weights(&weights)?;

        let metrics = PortfolioMetrics::compute(
            self.returns.values().view(),
            weights.view(),
            self.config.objective,
            self.config.mode,
            self.config.risk_free_rate,
        )?;

        info!(
            objective = %self.config.objective,
            mode = %self.config.mode,
            restarts = starts.len(),
            converged,
            ratio = metrics.ratio,
            expected_return = metrics.expected_return,
            volatility = metrics.volatility,
            "portfolio optimized"
        );

        Ok(OptimizationResult {
            allocation: Allocation::new(self.returns.symbols().to_vec(), weights),
            metrics,
            objective: self.config.objective,
            mode: self.config.mode,
            objective_value: best.value,
            restarts_converged: converged,
        })
    }

    /// Check budget, bounds and leverage of final weights.
    ///
    /// # Errors
    /// Returns [`OptimizerError::InvalidResult`] naming the first violated constraint.
    pub fn validate_weights(&self, weights: &Array1<f64>) -> Result<(), OptimizerError> {
        if weights.len() != self.returns.n_instruments() {
            return Err(OptimizerError::InvalidResult(format!(
                "expected {} weights, got {}",
                self.returns.n_instruments(),
                weights.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(OptimizerError::InvalidResult("non-finite weight".to_string()));
        }

        let total = weights.sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(OptimizerError::InvalidResult(format!("weights sum to {total}, not 1")));
        }

        let (lo, hi) = self.config.mode.weight_bounds();
        if let Some(w) =
            weights.iter().find(|w| **w < lo - WEIGHT_TOLERANCE || **w > hi + WEIGHT_TOLERANCE)
        {
            return Err(OptimizerError::InvalidResult(format!(
                "weight {w} outside [{lo}, {hi}]"
            )));
        }

        if self.config.mode.allows_short() {
            let gross: f64 = weights.iter().map(|w| w.abs()).sum();
            if gross > self.config.max_leverage + WEIGHT_TOLERANCE {
                return Err(OptimizerError::InvalidResult(format!(
                    "gross exposure {gross} exceeds {}",
                    self.config.max_leverage
                )));
            }
        }
        Ok(())
    }

    /// Percentage share of portfolio risk per instrument.
    ///
    /// # Errors
    /// Returns [`OptimizerError::InvalidInput`] when the allocation's
    /// instruments differ from the returns matrix.
    pub fn risk_contributions(
        &self,
        allocation: &Allocation,
    ) -> Result<RiskContributions, OptimizerError> {
        if allocation.symbols() != self.returns.symbols() {
            return Err(OptimizerError::InvalidInput(
                "allocation instruments do not match the returns matrix".to_string(),
            ));
        }
        Ok(risk_decomposition_map(&self.returns, allocation.weights().view())?)
    }
}

fn validate_inputs(returns: &ReturnsMatrix, config: &OptimizerConfig) -> Result<(), OptimizerError> {
    let invalid = |msg: String| -> Result<(), OptimizerError> {
        Err(OptimizerError::InvalidInput(msg))
    };

    if returns.n_instruments() == 0 {
        return invalid("returns matrix has no instruments".to_string());
    }
    if returns.symbols().len() != returns.n_instruments() {
        return invalid(format!(
            "{} symbols for {} return columns",
            returns.symbols().len(),
            returns.n_instruments()
        ));
    }
    if returns.n_periods() < 2 {
        return invalid(format!("need at least 2 periods, got {}", returns.n_periods()));
    }
    if !returns.is_finite() {
        return invalid("returns matrix contains non-finite values".to_string());
    }
    if config.restarts == 0 {
        return invalid("at least one start is required".to_string());
    }
    if !config.risk_free_rate.is_finite() {
        return invalid(format!("risk-free rate {} is not finite", config.risk_free_rate));
    }
    if !(config.max_leverage.is_finite() && config.max_leverage >= 1.0) {
        return invalid(format!("leverage cap {} must be at least 1", config.max_leverage));
    }
    if !(0.0..=1.0).contains(&config.esg_weight) {
        return invalid(format!("ESG weight {} outside [0, 1]", config.esg_weight));
    }
    if !(config.esg_ratio_scale.is_finite() && config.esg_ratio_scale >= 0.0) {
        return invalid(format!("ESG scale {} must be non-negative", config.esg_ratio_scale));
    }
    if let Some((symbol, raw)) =
        config.esg_scores.iter().flat_map(|s| s.iter()).find(|(_, raw)| !raw.is_finite())
    {
        return invalid(format!("ESG score {raw} for {symbol} is not finite"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use frontier_primitives::{EsgScores, Symbol};
    use frontier_traits::SolverError;
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    /// How [`StubSolver`] answers every solve.
    #[derive(Debug, Clone, Copy)]
    enum StubMode {
        /// Report non-convergence at the start point.
        GiveUp,
        /// Fail with a recoverable backend error.
        Backend,
        /// Report convergence at half the start point.
        Shrink,
    }

    /// Solver with a scripted answer that counts its calls.
    #[derive(Debug, Clone)]
    struct StubSolver {
        mode: StubMode,
        calls: Arc<AtomicUsize>,
    }

    impl StubSolver {
        fn new(mode: StubMode) -> Self {
            Self { mode, calls: Arc::default() }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ConstrainedSolver for StubSolver {
        type Settings = ();

        fn with_settings(_settings: ()) -> Self {
            Self::new(StubMode::GiveUp)
        }

        fn minimize(
            &self,
            objective: &dyn Objective,
            _problem: &Problem,
            x0: &[f64],
        ) -> Result<SolveOutcome, SolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (x, converged) = match self.mode {
                StubMode::GiveUp => (x0.to_vec(), false),
                StubMode::Backend => {
                    return Err(SolverError::Backend("stub backend".to_string()));
                }
                StubMode::Shrink => (x0.iter().map(|v| v * 0.5).collect(), true),
            };
            Ok(SolveOutcome {
                value: objective.value(&x),
                x,
                converged,
                iterations: 1,
                max_violation: 0.0,
                message: "stub gave up".to_string(),
            })
        }

        fn relaxed(&self) -> Self {
            self.clone()
        }
    }

    fn matrix() -> ReturnsMatrix {
        ReturnsMatrix::new(
            vec!["A".into(), "B".into(), "C".into()],
            array![
                [0.010, -0.004, 0.002],
                [-0.012, 0.006, 0.001],
                [0.007, 0.003, -0.002],
                [0.004, -0.008, 0.003],
                [-0.003, 0.011, 0.000],
                [0.015, -0.002, -0.001],
                [-0.009, 0.004, 0.002],
                [0.006, 0.001, 0.001]
            ],
        )
    }

    fn optimizer(config: OptimizerConfig) -> PortfolioOptimizer {
        PortfolioOptimizer::new(matrix(), config).unwrap()
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let one_period =
            ReturnsMatrix::new(vec!["A".into()], Array2::from_elem((1, 1), 0.01));
        assert!(matches!(
            PortfolioOptimizer::new(one_period, OptimizerConfig::default()),
            Err(OptimizerError::InvalidInput(_))
        ));

        let empty = ReturnsMatrix::new(Vec::<Symbol>::new(), Array2::zeros((5, 0)));
        assert!(PortfolioOptimizer::new(empty, OptimizerConfig::default()).is_err());

        let mut values = matrix().values().clone();
        values[[2, 1]] = f64::NAN;
        let nan = ReturnsMatrix::new(matrix().symbols().to_vec(), values);
        assert!(PortfolioOptimizer::new(nan, OptimizerConfig::default()).is_err());
    }

    #[rstest]
    #[case(OptimizerConfig { esg_weight: 1.5, ..OptimizerConfig::default() })]
    #[case(OptimizerConfig { max_leverage: 0.5, ..OptimizerConfig::default() })]
    #[case(OptimizerConfig { restarts: 0, ..OptimizerConfig::default() })]
    #[case(OptimizerConfig::default().with_esg([("A", f64::NAN)].into_iter().collect(), 0.2))]
    fn rejects_invalid_config(#[case] config: OptimizerConfig) {
        assert!(matches!(
            PortfolioOptimizer::new(matrix(), config),
            Err(OptimizerError::InvalidInput(_))
        ));
    }

    #[test]
    fn seeded_starts_are_reproducible() {
        let config = OptimizerConfig::default().with_seed(7);
        let a = optimizer(config.clone()).starting_points();
        let b = optimizer(config).starting_points();
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert_eq!(a[0], vec![1.0 / 3.0; 3]);
        for start in &a[1..] {
            assert!(start.iter().all(|w| *w >= 0.0));
            assert!((start.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn long_short_starts_have_half_gross_exposure() {
        let config =
            OptimizerConfig::default().with_mode(PortfolioMode::LongShort).with_seed(11);
        for start in &optimizer(config).starting_points()[1..] {
            let gross: f64 = start.iter().map(|w| w.abs()).sum();
            assert!((gross - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn single_instrument_starts_are_equal_weights() {
        let single = ReturnsMatrix::new(vec!["A".into()], array![[0.01], [0.02], [-0.01]]);
        let opt = PortfolioOptimizer::new(single, OptimizerConfig::default().with_seed(1)).unwrap();
        assert!(opt.starting_points().iter().all(|s| s == &vec![1.0]));
    }

    #[test]
    fn validation_flags_each_constraint() {
        let opt = optimizer(OptimizerConfig::default());
        assert!(opt.validate_weights(&array![0.2, 0.3, 0.5]).is_ok());
        assert!(matches!(
            opt.validate_weights(&array![0.2, 0.3, 0.4]),
            Err(OptimizerError::InvalidResult(_))
        ));
        assert!(opt.validate_weights(&array![1.2, -0.2, 0.0]).is_err());

        let ls = optimizer(OptimizerConfig::default().with_mode(PortfolioMode::LongShort));
        assert!(ls.validate_weights(&array![0.9, -0.2, 0.3]).is_ok());
        // short weights are still bounded to [-1, 1]
        assert!(matches!(
            ls.validate_weights(&array![1.2, -0.2, 0.0]),
            Err(OptimizerError::InvalidResult(_))
        ));
        // gross exposure 2.0 breaks the cap
        assert!(ls.validate_weights(&array![1.0, -0.5, 0.5]).is_err());
    }

    #[test]
    fn esg_blend_changes_the_objective() {
        let scores: EsgScores = [("A", 10.0), ("B", 40.0), ("C", 20.0)].into_iter().collect();
        let plain = optimizer(OptimizerConfig::default()).objective();
        let blended = optimizer(OptimizerConfig::default().with_esg(scores, 0.5)).objective();
        let w = [0.4, 0.3, 0.3];
        assert!((plain.value(&w) - blended.value(&w)).abs() > 1e-6);
        assert_eq!(blended.name(), "sharpe");
    }

    #[test]
    fn risk_contributions_require_matching_symbols() {
        let opt = optimizer(OptimizerConfig::default());
        let ok = Allocation::equal(matrix().symbols().to_vec());
        let rc = opt.risk_contributions(&ok).unwrap();
        assert!((rc.total_abs() - 100.0).abs() < 1e-9);

        let other = Allocation::equal(vec!["X".into(), "Y".into(), "Z".into()]);
        assert!(matches!(opt.risk_contributions(&other), Err(OptimizerError::InvalidInput(_))));
    }

    #[test]
    fn optimizes_min_variance_long_only() {
        let opt = optimizer(
            OptimizerConfig::default().with_objective(ObjectiveKind::MinVariance).with_seed(3),
        );
        let result = opt.optimize().unwrap();
        let w = result.allocation.weights();
        assert!((w.sum() - 1.0).abs() <= WEIGHT_TOLERANCE);
        assert!(w.iter().all(|x| *x >= -WEIGHT_TOLERANCE));
        assert!(result.restarts_converged >= 1);
        // the lowest-variance instrument should dominate
        assert!(w[2] > w[0] && w[2] > w[1]);
    }

    #[test]
    fn no_convergence_retries_once_then_fails_with_solver_message() {
        let stub = StubSolver::new(StubMode::GiveUp);
        let opt = optimizer(OptimizerConfig::default().with_seed(1)).with_solver(stub.clone());
        match opt.optimize() {
            Err(OptimizerError::OptimizationFailed { message }) => {
                assert_eq!(message, "stub gave up");
            }
            other => panic!("expected OptimizationFailed, got {other:?}"),
        }
        // every restart plus the equal-weight retry
        assert_eq!(stub.calls(), opt.config().restarts + 1);
    }

    #[test]
    fn backend_errors_surface_as_optimization_failed() {
        let stub = StubSolver::new(StubMode::Backend);
        let opt = optimizer(OptimizerConfig::default().with_seed(2)).with_solver(stub.clone());
        let err = opt.optimize().unwrap_err();
        assert!(matches!(
            &err,
            OptimizerError::OptimizationFailed { message } if message.contains("stub backend")
        ));
        assert!(err.is_recoverable());
        assert_eq!(stub.calls(), 6);
    }

    #[test]
    fn converged_but_infeasible_weights_are_invalid_result() {
        let opt = optimizer(OptimizerConfig::default().with_seed(3))
            .with_solver(StubSolver::new(StubMode::Shrink));
        match opt.optimize() {
            Err(OptimizerError::InvalidResult(message)) => assert!(message.contains("not 1")),
            other => panic!("expected InvalidResult, got {other:?}"),
        }
    }

    #[test]
    fn frontier_without_any_solved_target_is_empty() {
        let opt = optimizer(OptimizerConfig::default())
            .with_solver(StubSolver::new(StubMode::GiveUp));
        assert!(matches!(
            opt.compute_efficient_frontier(8, None, None),
            Err(OptimizerError::EmptyFrontier)
        ));
    }
}
