//! Summary metrics reported for an optimized portfolio.

use frontier_primitives::{Allocation, ObjectiveKind, PortfolioMode};
use frontier_risk::{
    DEFAULT_CONFIDENCE, RiskError, annualized_return, calmar_ratio, conditional_value_at_risk,
    max_drawdown, portfolio_returns, sharpe_ratio, sortino_ratio, value_at_risk, volatility,
};
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Risk and return statistics of a weighted portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Annualized mean return.
    pub expected_return: f64,
    /// Annualized volatility.
    pub volatility: f64,
    /// Ratio of the optimized objective (Sharpe for `min_variance`).
    pub ratio: f64,
    /// Sharpe ratio.
    pub sharpe_ratio: f64,
    /// Sortino ratio, absent without enough downside periods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortino_ratio: Option<f64>,
    /// Calmar ratio, absent when the portfolio never draws down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calmar_ratio: Option<f64>,
    /// Most negative drawdown.
    pub max_drawdown: f64,
    /// Daily 95% value at risk.
    pub value_at_risk: f64,
    /// Daily 95% expected shortfall.
    pub conditional_value_at_risk: f64,
    /// Gross exposure, reported for long/short portfolios.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<f64>,
}

impl PortfolioMetrics {
    /// Compute metrics for `weights` over a `periods x instruments` returns matrix.
    ///
    /// # Errors
    /// Returns an error for fewer than two periods or mismatched weights.
    pub fn compute(
        returns: ArrayView2<'_, f64>,
        weights: ArrayView1<'_, f64>,
        objective: ObjectiveKind,
        mode: PortfolioMode,
        risk_free_rate: f64,
    ) -> Result<Self, RiskError> {
        let series = portfolio_returns(returns, weights)?;
        let series = series.view();

        let sharpe = sharpe_ratio(series, risk_free_rate)?;
        let sortino = sortino_ratio(series, risk_free_rate)?;
        let calmar = calmar_ratio(series)?;
        let ratio = match objective {
            ObjectiveKind::Sharpe | ObjectiveKind::MinVariance => sharpe,
            ObjectiveKind::Sortino => sortino.unwrap_or(0.0),
            ObjectiveKind::Calmar => calmar.unwrap_or(0.0),
        };

        Ok(Self {
            expected_return: annualized_return(series)?,
            volatility: volatility(series, true)?,
            ratio,
            sharpe_ratio: sharpe,
            sortino_ratio: sortino,
            calmar_ratio: calmar,
            max_drawdown: max_drawdown(series),
            value_at_risk: value_at_risk(series, DEFAULT_CONFIDENCE)?,
            conditional_value_at_risk: conditional_value_at_risk(series, DEFAULT_CONFIDENCE)?,
            leverage: mode.allows_short().then(|| weights.iter().map(|w| w.abs()).sum()),
        })
    }
}

/// Outcome of [`PortfolioOptimizer::optimize`](crate::PortfolioOptimizer::optimize).
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    /// Optimized weights keyed by symbol.
    #[serde(rename = "weights")]
    pub allocation: Allocation,
    /// Metrics recomputed on the final weights.
    pub metrics: PortfolioMetrics,
    /// Objective that was optimized.
    pub objective: ObjectiveKind,
    /// Portfolio mode.
    pub mode: PortfolioMode,
    /// Objective value at the optimum (lower is better).
    pub objective_value: f64,
    /// Number of starts whose solve converged.
    pub restarts_converged: usize,
}
