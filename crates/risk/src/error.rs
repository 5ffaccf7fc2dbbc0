//! Error types for risk metrics.

/// Errors that can occur while computing risk metrics.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// Not enough observations for the requested statistic.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum number of observations.
        required: usize,
        /// Observations provided.
        actual: usize,
    },

    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Rolling window too small for a sample statistic.
    #[error("invalid window: {0} (must be at least 2)")]
    InvalidWindow(usize),

    /// Confidence level outside the open unit interval.
    #[error("invalid confidence: {0} (must be in (0, 1))")]
    InvalidConfidence(f64),

    /// Empty data.
    #[error("empty data provided")]
    EmptyData,
}
