//! Efficient-frontier construction.

use frontier_primitives::{Frontier, FrontierPoint};
use frontier_traits::{ConstrainedSolver, Objective, Problem};
use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::{
    MaxReturnObjective, MinVarianceObjective, OptimizerError, PortfolioOptimizer,
};

/// A solved frontier portfolio together with its weights.
#[derive(Debug, Clone)]
struct Solved {
    point: FrontierPoint,
    weights: Vec<f64>,
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => (0..n).map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64).collect(),
    }
}

/// Whether `value` exceeds `target` by the relative `buffer` (1.4 = 40%).
fn exceeds(value: f64, target: f64, buffer: f64) -> bool {
    value >= target + target.abs() * (buffer - 1.0)
}

impl<S: ConstrainedSolver> PortfolioOptimizer<S> {
    /// Portfolio risk and return of instrument weights.
    fn evaluate(&self, weights: &[f64]) -> FrontierPoint {
        let w = ArrayView1::from(weights);
        let variance = w.dot(&self.covariance().dot(&w));
        FrontierPoint::new(variance.max(0.0).sqrt(), w.dot(self.mean_returns()))
    }

    /// Converged instrument weights of `objective` from `start`, if any.
    fn converged_weights(
        &self,
        objective: &dyn Objective,
        problem: &Problem,
        start: &[f64],
    ) -> Result<Option<Vec<f64>>, OptimizerError> {
        match self.solve_from(self.solver(), objective, problem, start) {
            Ok(outcome) if outcome.converged => Ok(Some(self.layout().weights(&outcome.x))),
            Ok(outcome) => {
                trace!(message = %outcome.message, "frontier solve did not converge");
                Ok(None)
            }
            Err(OptimizerError::Solver(err)) if err.is_recoverable() => {
                trace!(%err, "frontier solve failed");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Minimum-variance portfolio for a target return, if one is found.
    fn solve_target(
        &self,
        objective: &MinVarianceObjective,
        target: f64,
        start: &[f64],
    ) -> Result<Option<Solved>, OptimizerError> {
        let layout = self.layout();
        let mu = self.mean_returns().to_vec();
        let problem = self.problem().with_constraint(layout.target_return(&mu, target));

        let solved = self.converged_weights(objective, &problem, start)?.and_then(|weights| {
            let point = self.evaluate(&weights);
            point.is_valid().then_some(Solved { point, weights })
        });
        debug!(target, found = solved.is_some(), "frontier target solved");
        Ok(solved)
    }

    /// Lowest and highest reachable annualized return.
    ///
    /// Falls back to the smallest and largest instrument mean when the
    /// corresponding solve does not converge. Converged end portfolios are
    /// returned as well so the curve keeps its endpoints even when the
    /// sweep targets overshoot them.
    fn return_bounds(&self) -> Result<(f64, f64, Vec<Solved>), OptimizerError> {
        let mu = self.mean_returns();
        let problem = self.problem();
        let equal = self.equal_weights();
        let mut ends = Vec::with_capacity(2);

        let min_variance = MinVarianceObjective::new(self.covariance().clone());
        let lower = match self.converged_weights(&min_variance, &problem, &equal)? {
            Some(w) => {
                let point = self.evaluate(&w);
                let lower = point.expected_return;
                if point.is_valid() {
                    ends.push(Solved { point, weights: w });
                }
                lower
            }
            None => mu.iter().copied().fold(f64::INFINITY, f64::min),
        };

        let max_return = MaxReturnObjective::new(mu.clone());
        let upper = match self.converged_weights(&max_return, &problem, &equal)? {
            Some(w) => {
                let point = self.evaluate(&w);
                let upper = point.expected_return;
                if point.is_valid() {
                    ends.push(Solved { point, weights: w });
                }
                upper
            }
            None => mu.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        };

        Ok((lower.min(upper), upper.max(lower), ends))
    }

    /// Warm start for a target: equal weights tilted toward high-return instruments.
    fn tilted_start(&self, target: f64, lower: f64, upper: f64) -> Vec<f64> {
        let mu = self.mean_returns();
        let floor = mu.iter().copied().fold(f64::INFINITY, f64::min);
        let excess: Array1<f64> = mu.mapv(|m| m - floor);
        let total = excess.sum();

        let equal = self.equal_weights();
        if total <= 0.0 || upper <= lower {
            return equal;
        }
        let lambda = ((target - lower) / (upper - lower)).clamp(0.0, 1.0);
        equal.iter().zip(excess.iter()).map(|(e, x)| (1.0 - lambda) * e + lambda * x / total).collect()
    }

    /// Trace the minimum-variance curve between the lowest and highest reachable return.
    ///
    /// `num_points` targets are spaced evenly and solved in parallel; failed
    /// targets are skipped. When `extend_beyond_return` or
    /// `extend_beyond_risk` is given (typically the optimized portfolio's own
    /// coordinates) the upper target is widened and, if the curve still falls
    /// short, extended sequentially past them.
    ///
    /// # Errors
    /// Returns [`OptimizerError::InvalidInput`] for zero points and
    /// [`OptimizerError::EmptyFrontier`] when no target could be solved.
    pub fn compute_efficient_frontier(
        &self,
        num_points: usize,
        extend_beyond_return: Option<f64>,
        extend_beyond_risk: Option<f64>,
    ) -> Result<Frontier, OptimizerError> {
        if num_points == 0 {
            return Err(OptimizerError::InvalidInput(
                "efficient frontier needs at least one point".to_string(),
            ));
        }
        let policy = self.frontier_config();

        let (lower, mut upper, ends) = self.return_bounds()?;
        if let Some(target) = extend_beyond_return {
            let widened =
                (target * policy.return_extension_factor).max(upper * policy.upper_bound_growth);
            upper = upper.max(widened);
        }
        debug!(lower, upper, num_points, "frontier return range");

        let objective = MinVarianceObjective::new(self.covariance().clone());
        let swept: Vec<Option<Solved>> = linspace(lower, upper, num_points)
            .par_iter()
            .map(|&target| {
                let start = self.tilted_start(target, lower, upper);
                self.solve_target(&objective, target, &start)
            })
            .collect::<Result<_, _>>()?;
        let mut solved: Vec<Solved> = swept.into_iter().flatten().collect();
        solved.extend(ends);

        if extend_beyond_return.is_some() || extend_beyond_risk.is_some() {
            let extra =
                self.extend(&objective, &solved, extend_beyond_return, extend_beyond_risk)?;
            solved.extend(extra);
        }

        let frontier = Frontier::from_points(
            solved.into_iter().map(|s| s.point).collect(),
            policy.duplicate_tolerance,
        );
        if frontier.is_empty() {
            return Err(OptimizerError::EmptyFrontier);
        }

        info!(
            points = frontier.len(),
            requested = num_points,
            max_risk = frontier.max_risk(),
            max_return = frontier.max_return(),
            "efficient frontier computed"
        );
        Ok(frontier)
    }

    /// Append points past the swept curve until it clears the extension targets.
    fn extend(
        &self,
        objective: &MinVarianceObjective,
        swept: &[Solved],
        beyond_return: Option<f64>,
        beyond_risk: Option<f64>,
    ) -> Result<Vec<Solved>, OptimizerError> {
        let policy = self.frontier_config();
        let reached = |risk: f64, ret: f64| {
            beyond_return.is_none_or(|t| exceeds(ret, t, policy.extension_buffer))
                && beyond_risk.is_none_or(|t| exceeds(risk, t, policy.extension_buffer))
        };

        let mut ordered: Vec<&Solved> = swept.iter().collect();
        ordered.sort_by(|a, b| a.point.risk.total_cmp(&b.point.risk));

        let max_risk = ordered.last().map_or(0.0, |s| s.point.risk);
        let max_return =
            ordered.iter().map(|s| s.point.expected_return).fold(f64::NEG_INFINITY, f64::max);
        if reached(max_risk, max_return) {
            return Ok(Vec::new());
        }

        let Some(last) = ordered.iter().max_by(|a, b| {
            a.point.expected_return.total_cmp(&b.point.expected_return)
        }) else {
            debug!("no swept point to extend from");
            return Ok(Vec::new());
        };

        let step = self.marginal_step(&ordered);
        let mut target = last.point.expected_return;
        let mut warm = last.weights.clone();
        let mut failures = 0;
        let mut extra = Vec::new();

        for _ in 0..policy.max_extension_points {
            target += step;
            match self.solve_target(objective, target, &warm)? {
                Some(solved) => {
                    failures = 0;
                    let done = reached(solved.point.risk, solved.point.expected_return);
                    warm.clone_from(&solved.weights);
                    extra.push(solved);
                    if done {
                        break;
                    }
                }
                None => {
                    failures += 1;
                    if failures >= policy.max_consecutive_failures {
                        debug!(target, failures, "frontier extension gave up");
                        break;
                    }
                }
            }
        }

        debug!(added = extra.len(), step, "frontier extended");
        Ok(extra)
    }

    /// Average return increment over the trailing window of the curve.
    fn marginal_step(&self, ordered: &[&Solved]) -> f64 {
        let window = self.frontier_config().marginal_window.max(2);
        let tail = &ordered[ordered.len().saturating_sub(window)..];
        let increments: Vec<f64> = tail
            .windows(2)
            .map(|pair| pair[1].point.expected_return - pair[0].point.expected_return)
            .collect();
        let mean = increments.iter().sum::<f64>() / increments.len().max(1) as f64;
        if mean.is_finite() && mean > 0.0 {
            return mean;
        }

        // Flat or single-point tail: a small fraction of the instrument return spread.
        let mu = self.mean_returns();
        let spread = mu.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            - mu.iter().copied().fold(f64::INFINITY, f64::min);
        if spread > 0.0 { spread / 30.0 } else { 1e-3 }
    }
}
