//! Portfolio objectives in weight space.
//!
//! Every objective here is minimized: ratio objectives return the negated
//! ratio, with degenerate portfolios (no volatility, no downside, no
//! drawdown) scoring 0.0.

use frontier_primitives::PERIODS_PER_YEAR;
use frontier_risk::{calmar_ratio, sharpe_ratio, sortino_ratio};
use frontier_traits::Objective;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Step used for the column-shift finite differences.
const SHIFT_STEP: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ratio {
    Sharpe,
    Sortino,
    Calmar,
}

/// Negated risk-adjusted ratio of the portfolio return series `R w`.
#[derive(Debug, Clone)]
pub struct RatioObjective {
    ratio: Ratio,
    returns: Array2<f64>,
    centered: Array2<f64>,
    daily_mean: Array1<f64>,
    risk_free_rate: f64,
}

impl RatioObjective {
    fn new(ratio: Ratio, returns: &Array2<f64>, risk_free_rate: f64) -> Self {
        let daily_mean =
            returns.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(returns.ncols()));
        let centered = returns - &daily_mean;
        Self { ratio, returns: returns.clone(), centered, daily_mean, risk_free_rate }
    }

    /// Negated Sharpe ratio.
    #[must_use]
    pub fn sharpe(returns: &Array2<f64>, risk_free_rate: f64) -> Self {
        Self::new(Ratio::Sharpe, returns, risk_free_rate)
    }

    /// Negated Sortino ratio.
    #[must_use]
    pub fn sortino(returns: &Array2<f64>, risk_free_rate: f64) -> Self {
        Self::new(Ratio::Sortino, returns, risk_free_rate)
    }

    /// Negated Calmar ratio.
    #[must_use]
    pub fn calmar(returns: &Array2<f64>) -> Self {
        Self::new(Ratio::Calmar, returns, 0.0)
    }

    fn score(&self, series: ArrayView1<'_, f64>) -> f64 {
        let ratio = match self.ratio {
            Ratio::Sharpe => sharpe_ratio(series, self.risk_free_rate).unwrap_or(0.0),
            Ratio::Sortino => {
                sortino_ratio(series, self.risk_free_rate).ok().flatten().unwrap_or(0.0)
            }
            Ratio::Calmar => calmar_ratio(series).ok().flatten().unwrap_or(0.0),
        };
        -ratio
    }

    /// Analytic gradient of the negated Sharpe ratio.
    fn sharpe_gradient(&self, w: &Array1<f64>) -> Vec<f64> {
        let n = self.returns.nrows();
        if n < 2 {
            return vec![0.0; w.len()];
        }
        let deviations = self.centered.dot(w);
        let ss: f64 = deviations.iter().map(|d| d * d).sum();
        let sigma = (ss / (n - 1) as f64).sqrt();
        if sigma * PERIODS_PER_YEAR.sqrt() <= f64::EPSILON {
            return vec![0.0; w.len()];
        }

        let mean = self.daily_mean.dot(w);
        let sharpe =
            (mean * PERIODS_PER_YEAR - self.risk_free_rate) / (PERIODS_PER_YEAR.sqrt() * sigma);
        let d_sigma = self.centered.t().dot(&deviations) / ((n - 1) as f64 * sigma);

        let grad = &self.daily_mean * (PERIODS_PER_YEAR.sqrt() / sigma) - d_sigma * (sharpe / sigma);
        grad.iter().map(|g| -g).collect()
    }

    /// Central differences that shift the portfolio series by one column at a time.
    fn shifted_gradient(&self, w: &Array1<f64>) -> Vec<f64> {
        let base = self.returns.dot(w);
        self.returns
            .columns()
            .into_iter()
            .map(|column| {
                let plus = &base + &(&column * SHIFT_STEP);
                let minus = &base - &(&column * SHIFT_STEP);
                (self.score(plus.view()) - self.score(minus.view())) / (2.0 * SHIFT_STEP)
            })
            .collect()
    }
}

impl Objective for RatioObjective {
    fn value(&self, w: &[f64]) -> f64 {
        let series = self.returns.dot(&ArrayView1::from(w));
        self.score(series.view())
    }

    fn gradient(&self, w: &[f64]) -> Vec<f64> {
        let w = Array1::from(w.to_vec());
        match self.ratio {
            Ratio::Sharpe => self.sharpe_gradient(&w),
            Ratio::Sortino | Ratio::Calmar => self.shifted_gradient(&w),
        }
    }

    fn name(&self) -> &str {
        match self.ratio {
            Ratio::Sharpe => "sharpe",
            Ratio::Sortino => "sortino",
            Ratio::Calmar => "calmar",
        }
    }
}

/// Annualized portfolio variance `w' S w`.
#[derive(Debug, Clone)]
pub struct MinVarianceObjective {
    covariance: Array2<f64>,
}

impl MinVarianceObjective {
    /// Create from an annualized covariance matrix.
    #[must_use]
    pub const fn new(covariance: Array2<f64>) -> Self {
        Self { covariance }
    }

    /// Largest single-instrument variance.
    #[must_use]
    pub fn max_variance(&self) -> f64 {
        self.covariance.diag().iter().copied().fold(0.0, f64::max)
    }
}

impl Objective for MinVarianceObjective {
    fn value(&self, w: &[f64]) -> f64 {
        let w = ArrayView1::from(w);
        w.dot(&self.covariance.dot(&w))
    }

    fn gradient(&self, w: &[f64]) -> Vec<f64> {
        let w = ArrayView1::from(w);
        (self.covariance.dot(&w) * 2.0).to_vec()
    }

    fn name(&self) -> &str {
        "min_variance"
    }
}

/// Negated expected return `-mu . w`.
#[derive(Debug, Clone)]
pub struct MaxReturnObjective {
    mean_returns: Array1<f64>,
}

impl MaxReturnObjective {
    /// Create from annualized mean returns.
    #[must_use]
    pub const fn new(mean_returns: Array1<f64>) -> Self {
        Self { mean_returns }
    }
}

impl Objective for MaxReturnObjective {
    fn value(&self, w: &[f64]) -> f64 {
        -self.mean_returns.dot(&ArrayView1::from(w))
    }

    fn gradient(&self, _w: &[f64]) -> Vec<f64> {
        self.mean_returns.iter().map(|m| -m).collect()
    }

    fn name(&self) -> &str {
        "max_return"
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use frontier_traits::central_difference;
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    fn returns() -> Array2<f64> {
        array![
            [0.010, -0.004, 0.002],
            [-0.012, 0.006, 0.001],
            [0.007, 0.003, -0.002],
            [0.004, -0.008, 0.003],
            [-0.003, 0.011, 0.000],
            [0.015, -0.002, -0.001],
            [-0.009, 0.004, 0.002],
            [0.006, 0.001, 0.001]
        ]
    }

    #[test]
    fn sharpe_value_is_negated_ratio() {
        let r = returns();
        let objective = RatioObjective::sharpe(&r, 0.02);
        let w = [0.5, 0.3, 0.2];
        let series = r.dot(&array![0.5, 0.3, 0.2]);
        assert_relative_eq!(
            objective.value(&w),
            -sharpe_ratio(series.view(), 0.02).unwrap(),
            epsilon = 1e-12
        );
    }

    #[rstest]
    #[case(vec![0.5, 0.3, 0.2])]
    #[case(vec![0.9, -0.2, 0.3])]
    fn sharpe_gradient_matches_finite_difference(#[case] w: Vec<f64>) {
        let objective = RatioObjective::sharpe(&returns(), 0.02);
        let analytic = objective.gradient(&w);
        let numeric = central_difference(|p| objective.value(p), &w, 1e-7);
        for (a, n) in analytic.iter().zip(&numeric) {
            assert_relative_eq!(a, n, epsilon = 1e-4, max_relative = 1e-5);
        }
    }

    #[test]
    fn shifted_gradient_matches_generic_difference() {
        let objective = RatioObjective::sortino(&returns(), 0.02);
        let w = [0.4, 0.4, 0.2];
        let shifted = objective.gradient(&w);
        let generic = central_difference(|p| objective.value(p), &w, SHIFT_STEP);
        for (a, b) in shifted.iter().zip(&generic) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn degenerate_portfolio_scores_zero() {
        let flat = Array2::from_elem((6, 2), 0.001);
        let w = [0.5, 0.5];
        assert_eq!(RatioObjective::sharpe(&flat, 0.02).value(&w), 0.0);
        assert_eq!(RatioObjective::sortino(&flat, 0.02).value(&w), 0.0);
        assert_eq!(RatioObjective::calmar(&flat).value(&w), 0.0);
        assert!(RatioObjective::sharpe(&flat, 0.02).gradient(&w).iter().all(|g| *g == 0.0));
    }

    #[test]
    fn min_variance_gradient_is_twice_sigma_w() {
        let cov = array![[0.04, 0.01], [0.01, 0.09]];
        let objective = MinVarianceObjective::new(cov);
        let w = [0.6, 0.4];
        assert_relative_eq!(objective.value(&w), 0.0144 + 0.0048 + 0.0144, epsilon = 1e-12);
        let grad = objective.gradient(&w);
        assert_relative_eq!(grad[0], 2.0 * (0.024 + 0.004), epsilon = 1e-12);
        assert_relative_eq!(grad[1], 2.0 * (0.006 + 0.036), epsilon = 1e-12);
        assert_eq!(objective.max_variance(), 0.09);
    }

    #[test]
    fn max_return_is_negated_dot() {
        let objective = MaxReturnObjective::new(array![0.1, 0.2]);
        assert_relative_eq!(objective.value(&[0.25, 0.75]), -0.175);
        assert_eq!(objective.gradient(&[0.0, 0.0]), vec![-0.1, -0.2]);
    }
}
