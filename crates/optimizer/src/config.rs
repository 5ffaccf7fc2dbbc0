//! Optimizer and frontier configuration.

use frontier_primitives::{EsgScores, ObjectiveKind, PortfolioMode};
use frontier_risk::DEFAULT_RISK_FREE_RATE;

/// Configuration for [`PortfolioOptimizer`](crate::PortfolioOptimizer).
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Score to optimize.
    pub objective: ObjectiveKind,
    /// Bounds and leverage regime.
    pub mode: PortfolioMode,
    /// Annual risk-free rate subtracted in the Sharpe and Sortino ratios.
    pub risk_free_rate: f64,
    /// Number of starting points, the first being equal weights.
    pub restarts: usize,
    /// Seed for the randomized starts (`None` draws from OS entropy).
    pub seed: Option<u64>,
    /// Gross exposure cap for long/short portfolios.
    pub max_leverage: f64,
    /// Raw ESG scores, lower is better.
    pub esg_scores: Option<EsgScores>,
    /// Blend weight of the ESG component in `[0, 1]`.
    pub esg_weight: f64,
    /// Multiplier bringing the ESG component to the scale of ratio objectives.
    pub esg_ratio_scale: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            objective: ObjectiveKind::default(),
            mode: PortfolioMode::default(),
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            restarts: 5,
            seed: None,
            max_leverage: 1.5,
            esg_scores: None,
            esg_weight: 0.0,
            esg_ratio_scale: 1.0,
        }
    }
}

impl OptimizerConfig {
    /// Set the objective.
    #[must_use]
    pub const fn with_objective(mut self, objective: ObjectiveKind) -> Self {
        self.objective = objective;
        self
    }

    /// Set the portfolio mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: PortfolioMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the seed for randomized starts.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of starting points.
    #[must_use]
    pub const fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the risk-free rate.
    #[must_use]
    pub const fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Attach ESG scores and their blend weight.
    #[must_use]
    pub fn with_esg(mut self, scores: EsgScores, weight: f64) -> Self {
        self.esg_scores = Some(scores);
        self.esg_weight = weight;
        self
    }

    /// Whether the ESG blend affects the objective.
    #[must_use]
    pub fn esg_active(&self) -> bool {
        self.esg_weight > 0.0 && self.esg_scores.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// Policy parameters for the efficient-frontier sweep and its extension.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontierConfig {
    /// The upper target return is raised to at least `extend_return * factor`.
    pub return_extension_factor: f64,
    /// The upper target return is raised to at least `upper * growth`.
    pub upper_bound_growth: f64,
    /// The extension stops once the curve exceeds each target by this factor
    /// (1.4 means 40% beyond the target).
    pub extension_buffer: f64,
    /// Maximum targets tried by the extension.
    pub max_extension_points: usize,
    /// Consecutive failed extension solves tolerated before giving up.
    pub max_consecutive_failures: usize,
    /// Number of trailing points used to estimate the return increment.
    pub marginal_window: usize,
    /// Relative risk gap below which neighbouring points are merged.
    pub duplicate_tolerance: f64,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            return_extension_factor: 1.4,
            upper_bound_growth: 1.15,
            extension_buffer: 1.4,
            max_extension_points: 60,
            max_consecutive_failures: 8,
            marginal_window: 3,
            duplicate_tolerance: 0.001,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.objective, ObjectiveKind::Sharpe);
        assert_eq!(config.mode, PortfolioMode::LongOnly);
        assert_eq!(config.restarts, 5);
        assert_eq!(config.max_leverage, 1.5);
        assert!(!config.esg_active());

        let frontier = FrontierConfig::default();
        assert_eq!(frontier.max_extension_points, 60);
        assert_eq!(frontier.duplicate_tolerance, 0.001);
    }

    #[test]
    fn esg_requires_weight_and_scores() {
        let scores: EsgScores = [("A", 10.0)].into_iter().collect();
        assert!(OptimizerConfig::default().with_esg(scores.clone(), 0.3).esg_active());
        assert!(!OptimizerConfig::default().with_esg(scores, 0.0).esg_active());
        assert!(!OptimizerConfig::default().with_esg(EsgScores::new(), 0.5).esg_active());
    }
}
