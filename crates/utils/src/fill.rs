//! Gap filling for price columns.

use polars::prelude::*;

/// Fill missing values in price columns.
///
/// Casts each column to float, forward fills, then back fills so that
/// leading gaps take the first observed price. Rows are assumed to be in
/// chronological order.
///
/// # Arguments
/// * `df` - Input LazyFrame
/// * `columns` - Column names to fill
///
/// # Returns
/// LazyFrame with filled columns.
pub fn fill_gaps(df: LazyFrame, columns: &[String]) -> LazyFrame {
    let filled: Vec<Expr> = columns
        .iter()
        .map(|name| {
            col(name.as_str())
                .cast(DataType::Float64)
                .forward_fill(None)
                .backward_fill(None)
                .alias(name.as_str())
        })
        .collect();
    df.with_columns(filled)
}
