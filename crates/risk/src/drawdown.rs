//! Cumulative return and drawdown curves.

use ndarray::{Array1, ArrayView1};

/// Compounded return to date for each period: `prod(1 + r) - 1`.
#[must_use]
pub fn cumulative_returns(series: ArrayView1<'_, f64>) -> Array1<f64> {
    let mut wealth = 1.0;
    series
        .iter()
        .map(|r| {
            wealth *= 1.0 + r;
            wealth - 1.0
        })
        .collect()
}

/// Fractional distance of the wealth curve below its running peak.
///
/// The peak starts at the initial unit of wealth, so a loss in the first
/// period already counts as a drawdown. Values are `<= 0`.
#[must_use]
pub fn drawdown_series(series: ArrayView1<'_, f64>) -> Array1<f64> {
    let mut wealth = 1.0_f64;
    let mut peak = 1.0_f64;
    series
        .iter()
        .map(|r| {
            wealth *= 1.0 + r;
            peak = peak.max(wealth);
            (wealth - peak) / peak
        })
        .collect()
}

/// Most negative value of [`drawdown_series`]; 0.0 for a series that never
/// falls below its peak (including an empty series).
#[must_use]
pub fn max_drawdown(series: ArrayView1<'_, f64>) -> f64 {
    drawdown_series(series).iter().copied().fold(0.0, f64::min)
}
