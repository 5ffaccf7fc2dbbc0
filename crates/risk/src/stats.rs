//! Shared sample statistics.

use ndarray::ArrayView1;

/// Arithmetic mean, `None` for an empty series.
pub(crate) fn mean(series: ArrayView1<'_, f64>) -> Option<f64> {
    if series.is_empty() { None } else { Some(series.sum() / series.len() as f64) }
}

/// Sample standard deviation (n - 1 denominator), `None` below two observations.
pub(crate) fn sample_std(series: ArrayView1<'_, f64>) -> Option<f64> {
    let n = series.len();
    if n < 2 {
        return None;
    }
    let m = mean(series)?;
    let ss: f64 = series.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Volatilities at or below this are treated as zero.
pub(crate) const ZERO_VOLATILITY: f64 = f64::EPSILON;
