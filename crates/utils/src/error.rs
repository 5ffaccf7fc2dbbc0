//! Error types for data adapters.

/// Errors that can occur while adapting tabular data.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Invalid parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// The table has no numeric price column.
    #[error("no numeric price columns found")]
    NoPriceColumns,

    /// Too few complete rows remain after cleaning.
    #[error("insufficient data: need at least {required} return periods, got {actual}")]
    InsufficientData {
        /// Minimum number of periods.
        required: usize,
        /// Periods remaining.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UtilsError::InvalidParameter("bad value".to_string());
        assert!(err.to_string().contains("bad value"));

        let err = UtilsError::InsufficientData { required: 2, actual: 1 };
        assert!(err.to_string().contains("got 1"));
    }
}
