//! Historical tail-risk measures.

use ndarray::ArrayView1;

use crate::RiskError;

/// Confidence level used when none is supplied.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Empirical `q`-quantile with linear interpolation between order statistics.
///
/// # Errors
/// Returns [`RiskError::EmptyData`] for an empty series and
/// [`RiskError::InvalidConfidence`] when `q` is outside `[0, 1]`.
pub fn quantile(series: ArrayView1<'_, f64>, q: f64) -> Result<f64, RiskError> {
    if series.is_empty() {
        return Err(RiskError::EmptyData);
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(RiskError::InvalidConfidence(q));
    }

    let mut sorted = series.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Historical value at risk: the `(1 - confidence)` quantile of the series.
///
/// Losses are negative, so a typical result is a negative return.
///
/// # Errors
/// Returns an error for an empty series or a confidence outside `(0, 1)`.
pub fn value_at_risk(series: ArrayView1<'_, f64>, confidence: f64) -> Result<f64, RiskError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(RiskError::InvalidConfidence(confidence));
    }
    quantile(series, 1.0 - confidence)
}

/// Expected shortfall: mean of all observations at or below the value at risk.
///
/// # Errors
/// Returns an error for an empty series or a confidence outside `(0, 1)`.
pub fn conditional_value_at_risk(
    series: ArrayView1<'_, f64>,
    confidence: f64,
) -> Result<f64, RiskError> {
    let var = value_at_risk(series, confidence)?;
    let (sum, count) = series
        .iter()
        .filter(|r| **r <= var)
        .fold((0.0, 0_usize), |(s, c), r| (s + r, c + 1));
    // The minimum observation is always <= any quantile, so count >= 1.
    Ok(sum / count.max(1) as f64)
}
