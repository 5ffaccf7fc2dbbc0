//! Volatility and risk-adjusted return ratios.

use frontier_primitives::PERIODS_PER_YEAR;
use ndarray::{Array1, ArrayView1};

use crate::{
    RiskError, max_drawdown,
    stats::{ZERO_VOLATILITY, mean, sample_std},
};

/// Annual risk-free rate used when none is supplied.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Sample standard deviation of a return series.
///
/// Multiplied by `sqrt(252)` when `annualize` is set.
///
/// # Errors
/// Returns [`RiskError::InsufficientData`] for fewer than two observations.
pub fn volatility(series: ArrayView1<'_, f64>, annualize: bool) -> Result<f64, RiskError> {
    let std = sample_std(series)
        .ok_or(RiskError::InsufficientData { required: 2, actual: series.len() })?;
    Ok(if annualize { std * PERIODS_PER_YEAR.sqrt() } else { std })
}

/// Annualized arithmetic mean return (`mean * 252`).
///
/// # Errors
/// Returns [`RiskError::EmptyData`] for an empty series.
pub fn annualized_return(series: ArrayView1<'_, f64>) -> Result<f64, RiskError> {
    mean(series).map(|m| m * PERIODS_PER_YEAR).ok_or(RiskError::EmptyData)
}

/// Sharpe ratio: annualized excess return over annualized volatility.
///
/// A series with zero volatility scores 0.0. Annualized volatility at or
/// below `f64::EPSILON` counts as zero.
///
/// # Errors
/// Returns [`RiskError::InsufficientData`] for fewer than two observations.
pub fn sharpe_ratio(series: ArrayView1<'_, f64>, risk_free_rate: f64) -> Result<f64, RiskError> {
    let vol = volatility(series, true)?;
    if vol <= ZERO_VOLATILITY {
        return Ok(0.0);
    }
    Ok((annualized_return(series)? - risk_free_rate) / vol)
}

/// Sortino ratio: annualized excess return over annualized downside deviation.
///
/// Downside deviation is the sample standard deviation of the strictly
/// negative periods. Returns `None` when there are fewer than two such
/// periods or their deviation is zero.
///
/// # Errors
/// Returns [`RiskError::EmptyData`] for an empty series.
pub fn sortino_ratio(
    series: ArrayView1<'_, f64>,
    risk_free_rate: f64,
) -> Result<Option<f64>, RiskError> {
    let expected = annualized_return(series)?;
    let downside: Array1<f64> = series.iter().copied().filter(|r| *r < 0.0).collect();

    let ratio = sample_std(downside.view())
        .map(|std| std * PERIODS_PER_YEAR.sqrt())
        .filter(|dd| *dd > ZERO_VOLATILITY)
        .map(|dd| (expected - risk_free_rate) / dd);
    Ok(ratio)
}

/// Calmar ratio: annualized return over the magnitude of the maximum drawdown.
///
/// Returns `None` when the series never draws down.
///
/// # Errors
/// Returns [`RiskError::EmptyData`] for an empty series.
pub fn calmar_ratio(series: ArrayView1<'_, f64>) -> Result<Option<f64>, RiskError> {
    let expected = annualized_return(series)?;
    let mdd = max_drawdown(series);
    Ok((mdd < 0.0).then(|| expected / mdd.abs()))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    #[test]
    fn volatility_of_known_series() {
        let series = array![0.01, -0.01, 0.02, -0.02];
        // mean 0, ss = 0.001, var = 0.001 / 3
        let daily = (0.001_f64 / 3.0).sqrt();
        assert_relative_eq!(volatility(series.view(), false).unwrap(), daily, epsilon = 1e-12);
        assert_relative_eq!(
            volatility(series.view(), true).unwrap(),
            daily * 252_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![0.01])]
    fn volatility_requires_two_observations(#[case] values: Vec<f64>) {
        let series = Array1::from(values);
        assert!(matches!(
            volatility(series.view(), true),
            Err(RiskError::InsufficientData { required: 2, .. })
        ));
    }

    #[test]
    fn volatility_is_permutation_invariant() {
        let a = array![0.03, -0.02, 0.01, 0.005, -0.04];
        let b = array![-0.04, 0.01, 0.03, -0.02, 0.005];
        assert_relative_eq!(
            volatility(a.view(), true).unwrap(),
            volatility(b.view(), true).unwrap(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn sharpe_of_constant_series_is_zero() {
        let series = array![0.001, 0.001, 0.001, 0.001];
        assert_eq!(sharpe_ratio(series.view(), DEFAULT_RISK_FREE_RATE).unwrap(), 0.0);
    }

    #[test]
    fn sharpe_of_rounding_noise_is_zero() {
        let series = array![0.0, 1e-18, 0.0, 1e-18];
        assert!(volatility(series.view(), true).unwrap() > 0.0);
        assert_eq!(sharpe_ratio(series.view(), DEFAULT_RISK_FREE_RATE).unwrap(), 0.0);
    }

    #[test]
    fn sharpe_matches_formula() {
        let series = array![0.01, -0.005, 0.007, 0.002, -0.001];
        let vol = volatility(series.view(), true).unwrap();
        let expected = (series.mean().unwrap() * 252.0 - 0.02) / vol;
        assert_relative_eq!(sharpe_ratio(series.view(), 0.02).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn sortino_uses_negative_periods_only() {
        let series = array![0.02, -0.01, 0.03, -0.03];
        let downside_std = (0.0002_f64).sqrt() * 252_f64.sqrt();
        let expected = (0.0025 * 252.0 - 0.02) / downside_std;
        assert_relative_eq!(
            sortino_ratio(series.view(), 0.02).unwrap().unwrap(),
            expected,
            epsilon = 1e-10
        );
    }

    #[rstest]
    #[case(vec![0.01, 0.02, 0.0])]
    #[case(vec![0.01, -0.02, 0.03])]
    #[case(vec![-0.01, -0.01, 0.02])]
    fn sortino_without_downside_dispersion_is_none(#[case] values: Vec<f64>) {
        let series = Array1::from(values);
        assert!(sortino_ratio(series.view(), 0.02).unwrap().is_none());
    }

    #[test]
    fn calmar_divides_by_drawdown() {
        let series = array![0.1, -0.5, 0.2];
        let mdd = max_drawdown(series.view());
        let expected = series.mean().unwrap() * 252.0 / mdd.abs();
        assert_relative_eq!(calmar_ratio(series.view()).unwrap().unwrap(), expected);
    }

    #[test]
    fn calmar_without_drawdown_is_none() {
        let series = array![0.01, 0.0, 0.02];
        assert!(calmar_ratio(series.view()).unwrap().is_none());
        assert!(matches!(calmar_ratio(Array1::<f64>::zeros(0).view()), Err(RiskError::EmptyData)));
    }
}
