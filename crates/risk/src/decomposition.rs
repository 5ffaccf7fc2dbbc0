//! Per-instrument risk decomposition.

use frontier_primitives::{ReturnsMatrix, RiskContributions};
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{RiskError, annualized_covariance, stats::ZERO_VOLATILITY};

/// Percentage share of portfolio risk per instrument given a covariance matrix.
///
/// With `sigma = sqrt(w' S w)`, the contribution of instrument `i` is
/// `w_i (S w)_i / sigma`; each is reported as a percentage of the sum of
/// absolute contributions. Every share is 0 when `sigma` is at or below
/// `f64::EPSILON`.
///
/// # Errors
/// Returns [`RiskError::DimensionMismatch`] when shapes disagree.
pub fn risk_shares(
    covariance: ArrayView2<'_, f64>,
    weights: ArrayView1<'_, f64>,
) -> Result<Array1<f64>, RiskError> {
    let n = weights.len();
    if covariance.nrows() != n || covariance.ncols() != n {
        return Err(RiskError::DimensionMismatch { expected: n, actual: covariance.nrows() });
    }

    let sigma_w = covariance.dot(&weights);
    let variance = weights.dot(&sigma_w);
    let sigma = variance.max(0.0).sqrt();
    if sigma <= ZERO_VOLATILITY {
        return Ok(Array1::zeros(n));
    }

    let contributions = &weights * &sigma_w / sigma;
    let total: f64 = contributions.iter().map(|c| c.abs()).sum();
    if total <= 0.0 {
        return Ok(Array1::zeros(n));
    }
    Ok(contributions / total * 100.0)
}

/// Percentage share of portfolio risk per instrument from raw returns.
///
/// Uses the annualized sample covariance of `returns` (`periods x instruments`).
///
/// # Errors
/// Returns an error for fewer than two periods or mismatched weights.
pub fn risk_decomposition(
    returns: ArrayView2<'_, f64>,
    weights: ArrayView1<'_, f64>,
) -> Result<Array1<f64>, RiskError> {
    if weights.len() != returns.ncols() {
        return Err(RiskError::DimensionMismatch {
            expected: returns.ncols(),
            actual: weights.len(),
        });
    }
    let cov = annualized_covariance(returns)?;
    risk_shares(cov.view(), weights)
}

/// [`risk_decomposition`] keyed by instrument symbol.
///
/// # Errors
/// Returns an error for fewer than two periods or mismatched weights.
pub fn risk_decomposition_map(
    returns: &ReturnsMatrix,
    weights: ArrayView1<'_, f64>,
) -> Result<RiskContributions, RiskError> {
    let shares = risk_decomposition(returns.values().view(), weights)?;
    Ok(RiskContributions::new(returns.symbols().to_vec(), shares))
}
