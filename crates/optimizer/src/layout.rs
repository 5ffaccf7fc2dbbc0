//! Decision-variable layouts for each portfolio mode.

use frontier_primitives::PortfolioMode;
use frontier_traits::{Bounds, LinearConstraint, Objective, Problem};

/// How portfolio weights are encoded as solver variables.
///
/// Long-only weights are used directly with bounds `[0, 1]`. Long/short
/// weights are split into long and short legs `w = u - v` with
/// `u, v` in `[0, 1]`, which turns the gross-exposure cap `sum |w| <= L`
/// into the linear constraint `sum (u + v) <= L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightLayout {
    /// One variable per instrument.
    Direct {
        /// Number of instruments.
        instruments: usize,
    },
    /// Long and short leg per instrument.
    Split {
        /// Number of instruments.
        instruments: usize,
    },
}

impl WeightLayout {
    /// Layout for a portfolio mode.
    #[must_use]
    pub const fn for_mode(mode: PortfolioMode, instruments: usize) -> Self {
        match mode {
            PortfolioMode::LongOnly => Self::Direct { instruments },
            PortfolioMode::LongShort => Self::Split { instruments },
        }
    }

    /// Number of instruments.
    #[must_use]
    pub const fn instruments(&self) -> usize {
        match self {
            Self::Direct { instruments } | Self::Split { instruments } => *instruments,
        }
    }

    /// Number of solver variables.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        match self {
            Self::Direct { instruments } => *instruments,
            Self::Split { instruments } => 2 * *instruments,
        }
    }

    /// Portfolio weights from solver variables.
    #[must_use]
    pub fn weights(&self, z: &[f64]) -> Vec<f64> {
        match self {
            Self::Direct { .. } => z.to_vec(),
            Self::Split { instruments } => {
                let (long, short) = z.split_at(*instruments);
                long.iter().zip(short).map(|(u, v)| u - v).collect()
            }
        }
    }

    /// Solver variables for portfolio weights.
    #[must_use]
    pub fn encode(&self, w: &[f64]) -> Vec<f64> {
        match self {
            Self::Direct { .. } => w.to_vec(),
            Self::Split { .. } => {
                w.iter().map(|x| x.max(0.0)).chain(w.iter().map(|x| (-x).max(0.0))).collect()
            }
        }
    }

    /// Lift a per-instrument coefficient vector to solver variables.
    #[must_use]
    pub fn lift(&self, coefficients: &[f64]) -> Vec<f64> {
        match self {
            Self::Direct { .. } => coefficients.to_vec(),
            Self::Split { .. } => {
                coefficients.iter().copied().chain(coefficients.iter().map(|c| -c)).collect()
            }
        }
    }

    /// Variable bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::uniform(self.dimension(), 0.0, 1.0)
    }

    /// Fully-invested constraint `sum w = 1`.
    #[must_use]
    pub fn budget(&self) -> LinearConstraint {
        LinearConstraint::equality(self.lift(&vec![1.0; self.instruments()]), 1.0, "budget")
    }

    /// Expected-return constraint `mu . w = target`.
    ///
    /// `target` is captured by value in the returned constraint.
    #[must_use]
    pub fn target_return(&self, mean_returns: &[f64], target: f64) -> LinearConstraint {
        LinearConstraint::equality(self.lift(mean_returns), target, "target_return")
    }

    /// Gross-exposure cap, present only for split layouts.
    #[must_use]
    pub fn leverage(&self, cap: f64) -> Option<LinearConstraint> {
        match self {
            Self::Direct { .. } => None,
            Self::Split { .. } => {
                Some(LinearConstraint::at_most(vec![1.0; self.dimension()], cap, "leverage"))
            }
        }
    }

    /// Bounds, budget and (if applicable) leverage cap.
    #[must_use]
    pub fn problem(&self, max_leverage: f64) -> Problem {
        let mut problem = Problem::new(self.bounds()).with_constraint(self.budget());
        if let Some(cap) = self.leverage(max_leverage) {
            problem.push_constraint(cap);
        }
        problem
    }
}

/// A weight-space objective seen through a [`WeightLayout`].
pub struct LayoutObjective<'a> {
    inner: &'a dyn Objective,
    layout: WeightLayout,
}

impl<'a> LayoutObjective<'a> {
    /// Wrap a weight-space objective.
    #[must_use]
    pub const fn new(inner: &'a dyn Objective, layout: WeightLayout) -> Self {
        Self { inner, layout }
    }
}

impl std::fmt::Debug for LayoutObjective<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutObjective")
            .field("inner", &self.inner.name())
            .field("layout", &self.layout)
            .finish()
    }
}

impl Objective for LayoutObjective<'_> {
    fn value(&self, z: &[f64]) -> f64 {
        self.inner.value(&self.layout.weights(z))
    }

    fn gradient(&self, z: &[f64]) -> Vec<f64> {
        let grad_w = self.inner.gradient(&self.layout.weights(z));
        self.layout.lift(&grad_w)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use frontier_traits::central_difference;

    use super::*;

    struct Linear;

    impl Objective for Linear {
        fn value(&self, w: &[f64]) -> f64 {
            w.iter().enumerate().map(|(i, x)| (i as f64 + 1.0) * x * x).sum()
        }

        fn name(&self) -> &str {
            "linear"
        }
    }

    #[test]
    fn split_round_trips_weights() {
        let layout = WeightLayout::for_mode(PortfolioMode::LongShort, 3);
        let w = [1.2, -0.3, 0.1];
        let z = layout.encode(&w);
        assert_eq!(z, vec![1.2, 0.0, 0.1, 0.0, 0.3, 0.0]);
        assert_eq!(layout.weights(&z), w.to_vec());
    }

    #[test]
    fn split_problem_caps_gross_exposure() {
        let layout = WeightLayout::for_mode(PortfolioMode::LongShort, 2);
        let problem = layout.problem(1.5);
        assert_eq!(problem.dimension(), 4);
        assert_eq!(problem.constraints().len(), 2);
        assert_eq!(problem.max_violation(&[1.0, 0.0, 0.0, 0.0]), 0.0);
        // legs summing to exactly the cap
        assert_eq!(problem.max_violation(&[1.0, 0.25, 0.0, 0.25]), 0.0);
        // w = (0.8, 0.2) is fully invested but the legs sum to 2.0
        assert_relative_eq!(problem.max_violation(&[1.0, 0.5, 0.2, 0.3]), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn direct_problem_has_budget_only() {
        let layout = WeightLayout::for_mode(PortfolioMode::LongOnly, 3);
        let problem = layout.problem(1.5);
        assert_eq!(problem.constraints().len(), 1);
        assert!(layout.leverage(1.5).is_none());
    }

    #[test]
    fn layout_gradient_is_chain_rule() {
        let layout = WeightLayout::for_mode(PortfolioMode::LongShort, 2);
        let objective = LayoutObjective::new(&Linear, layout);
        let z = [0.4, 0.1, 0.2, 0.3];
        let numeric = central_difference(|p| objective.value(p), &z, 1e-6);
        for (a, n) in objective.gradient(&z).iter().zip(&numeric) {
            assert_relative_eq!(a, n, epsilon = 1e-6);
        }
    }

    #[test]
    fn debug_shows_inner_objective() {
        let layout = WeightLayout::for_mode(PortfolioMode::LongShort, 2);
        let shown = format!("{:?}", LayoutObjective::new(&Linear, layout));
        assert!(shown.contains("\"linear\""));
        assert!(shown.contains("Split"));
    }

    #[test]
    fn target_constraint_captures_value() {
        let layout = WeightLayout::for_mode(PortfolioMode::LongOnly, 2);
        let constraints: Vec<_> =
            [0.1, 0.2].iter().map(|t| layout.target_return(&[0.05, 0.3], *t)).collect();
        assert_eq!(constraints[0].rhs(), 0.1);
        assert_eq!(constraints[1].rhs(), 0.2);
    }
}
