//! Annualized first and second moments of a returns matrix.
//!
//! Matrices are `periods x instruments`.

use frontier_primitives::PERIODS_PER_YEAR;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::RiskError;

/// Per-instrument mean return scaled by 252.
///
/// # Errors
/// Returns [`RiskError::EmptyData`] when the matrix has no periods.
pub fn annualized_mean_returns(returns: ArrayView2<'_, f64>) -> Result<Array1<f64>, RiskError> {
    returns.mean_axis(Axis(0)).map(|m| m * PERIODS_PER_YEAR).ok_or(RiskError::EmptyData)
}

/// Sample covariance matrix (n - 1 denominator) scaled by 252.
///
/// # Errors
/// Returns [`RiskError::InsufficientData`] for fewer than two periods.
pub fn annualized_covariance(returns: ArrayView2<'_, f64>) -> Result<Array2<f64>, RiskError> {
    let n = returns.nrows();
    if n < 2 {
        return Err(RiskError::InsufficientData { required: 2, actual: n });
    }

    let means = returns.mean_axis(Axis(0)).ok_or(RiskError::EmptyData)?;
    let centered = &returns - &means;
    let cov = centered.t().dot(&centered) / (n - 1) as f64;
    Ok(cov * PERIODS_PER_YEAR)
}

/// Pearson correlation matrix.
///
/// Entries involving an instrument with zero variance are 0.
///
/// # Errors
/// Returns [`RiskError::InsufficientData`] for fewer than two periods.
pub fn correlation_matrix(returns: ArrayView2<'_, f64>) -> Result<Array2<f64>, RiskError> {
    let cov = annualized_covariance(returns)?;
    let std: Array1<f64> = cov.diag().mapv(f64::sqrt);

    Ok(Array2::from_shape_fn(cov.raw_dim(), |(i, j)| {
        let denom = std[i] * std[j];
        if denom > 0.0 { cov[[i, j]] / denom } else { 0.0 }
    }))
}

/// Per-period portfolio return `R w`.
///
/// # Errors
/// Returns [`RiskError::DimensionMismatch`] when the weight count differs
/// from the number of instruments.
pub fn portfolio_returns(
    returns: ArrayView2<'_, f64>,
    weights: ArrayView1<'_, f64>,
) -> Result<Array1<f64>, RiskError> {
    if weights.len() != returns.ncols() {
        return Err(RiskError::DimensionMismatch {
            expected: returns.ncols(),
            actual: weights.len(),
        });
    }
    Ok(returns.dot(&weights))
}
