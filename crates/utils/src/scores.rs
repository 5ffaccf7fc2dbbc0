//! ESG score table loading.

use frontier_primitives::EsgScores;
use polars::prelude::*;

use crate::UtilsError;

/// Read raw ESG scores from a two-column table.
///
/// Rows with a missing symbol or score are skipped. Later rows replace
/// earlier ones for the same symbol.
///
/// # Errors
/// Returns [`UtilsError::MissingColumn`] when either column is absent, or a
/// polars error if the score column cannot be cast to float.
pub fn esg_scores_from_frame(
    df: &DataFrame,
    symbol_column: &str,
    score_column: &str,
) -> Result<EsgScores, UtilsError> {
    let symbols = df
        .column(symbol_column)
        .map_err(|_| UtilsError::MissingColumn(symbol_column.to_string()))?
        .str()?;
    let scores = df
        .column(score_column)
        .map_err(|_| UtilsError::MissingColumn(score_column.to_string()))?
        .cast(&DataType::Float64)?;

    let mut out = EsgScores::new();
    for (symbol, score) in symbols.into_iter().zip(scores.f64()?) {
        if let (Some(symbol), Some(score)) = (symbol, score) {
            out.insert(symbol, score);
        }
    }
    Ok(out)
}
