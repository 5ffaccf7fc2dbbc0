//! Rolling-window risk metrics.
//!
//! Positions without a full window of history are `NaN`, never zero, since
//! zero is a legitimate ratio or volatility.

use ndarray::{Array1, ArrayView1};

use crate::{RiskError, sharpe_ratio, volatility};

fn rolling<F>(series: ArrayView1<'_, f64>, window: usize, f: F) -> Result<Array1<f64>, RiskError>
where
    F: Fn(ArrayView1<'_, f64>) -> Result<f64, RiskError>,
{
    if window < 2 {
        return Err(RiskError::InvalidWindow(window));
    }

    let mut out = Array1::from_elem(series.len(), f64::NAN);
    for (i, w) in series.windows(window).into_iter().enumerate() {
        out[i + window - 1] = f(w)?;
    }
    Ok(out)
}

/// Annualized volatility over a trailing window of `window` periods.
///
/// # Errors
/// Returns [`RiskError::InvalidWindow`] when `window < 2`.
pub fn rolling_volatility(
    series: ArrayView1<'_, f64>,
    window: usize,
) -> Result<Array1<f64>, RiskError> {
    rolling(series, window, |w| volatility(w, true))
}

/// Sharpe ratio over a trailing window of `window` periods.
///
/// # Errors
/// Returns [`RiskError::InvalidWindow`] when `window < 2`.
pub fn rolling_sharpe_ratio(
    series: ArrayView1<'_, f64>,
    window: usize,
    risk_free_rate: f64,
) -> Result<Array1<f64>, RiskError> {
    rolling(series, window, |w| sharpe_ratio(w, risk_free_rate))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{array, s};
    use rstest::rstest;

    use super::*;

    #[test]
    fn leading_positions_are_nan() {
        let series = array![0.01, -0.02, 0.015, 0.0, 0.005];
        let vol = rolling_volatility(series.view(), 3).unwrap();
        assert_eq!(vol.len(), 5);
        assert!(vol[0].is_nan() && vol[1].is_nan());
        assert!(vol.iter().skip(2).all(|v| v.is_finite()));
    }

    #[test]
    fn window_values_match_full_computation() {
        let series = array![0.01, -0.02, 0.015, 0.0, 0.005];
        let rolling = rolling_sharpe_ratio(series.view(), 3, 0.02).unwrap();
        let last = sharpe_ratio(series.slice(s![2..]), 0.02).unwrap();
        assert_relative_eq!(rolling[4], last, epsilon = 1e-12);
    }

    #[test]
    fn constant_window_scores_zero_not_nan() {
        let series = array![0.01, 0.002, 0.002, 0.002];
        let rolling = rolling_sharpe_ratio(series.view(), 3, 0.02).unwrap();
        assert!(rolling[1].is_nan());
        assert_eq!(rolling[3], 0.0);
    }

    #[test]
    fn short_series_is_all_nan() {
        let series = array![0.01, 0.02];
        let vol = rolling_volatility(series.view(), 5).unwrap();
        assert!(vol.iter().all(|v| v.is_nan()));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn window_below_two_is_rejected(#[case] window: usize) {
        let series = array![0.01, 0.02, 0.03];
        assert!(matches!(
            rolling_volatility(series.view(), window),
            Err(RiskError::InvalidWindow(_))
        ));
    }
}
