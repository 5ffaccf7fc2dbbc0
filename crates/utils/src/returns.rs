//! Price table to returns matrix conversion.

use frontier_primitives::{Date, ReturnsMatrix, Symbol};
use ndarray::Array2;
use polars::prelude::*;

use crate::{UtilsError, fill_gaps};

/// Default name of the period label column.
pub const DATE_COLUMN: &str = "date";

/// Options for [`returns_from_prices`].
#[derive(Debug, Clone)]
pub struct ReturnsOptions {
    /// Keep only the trailing number of return periods.
    pub lookback: Option<usize>,
    /// Name of the period label column, excluded from the price columns.
    pub date_column: String,
}

impl Default for ReturnsOptions {
    fn default() -> Self {
        Self { lookback: None, date_column: DATE_COLUMN.to_string() }
    }
}

impl ReturnsOptions {
    /// Keep only the trailing `periods` returns.
    #[must_use]
    pub const fn with_lookback(mut self, periods: usize) -> Self {
        self.lookback = Some(periods);
        self
    }

    /// Use a different date column name.
    #[must_use]
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }
}

const fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

/// Convert a wide price table into a clean returns matrix.
///
/// Every numeric column other than the date column is an instrument. Rows
/// are sorted by date when a date column is present. Prices are forward-
/// then back-filled, converted to simple returns `p_t / p_{t-1} - 1`, the
/// first row is dropped, and any row with a missing or non-finite return is
/// discarded.
///
/// # Errors
/// Returns [`UtilsError::NoPriceColumns`] when no numeric column exists and
/// [`UtilsError::InsufficientData`] when fewer than two return periods remain.
pub fn returns_from_prices(
    prices: &DataFrame,
    options: &ReturnsOptions,
) -> Result<ReturnsMatrix, UtilsError> {
    if options.lookback == Some(0) {
        return Err(UtilsError::InvalidParameter("lookback must be positive".to_string()));
    }

    let date_column = options.date_column.as_str();
    let instruments: Vec<String> = prices
        .get_columns()
        .iter()
        .filter(|c| c.name().as_str() != date_column && is_numeric(c.dtype()))
        .map(|c| c.name().to_string())
        .collect();
    if instruments.is_empty() {
        return Err(UtilsError::NoPriceColumns);
    }
    let has_dates = prices.column(date_column).is_ok();

    let mut lf = prices.clone().lazy();
    if has_dates {
        lf = lf.sort([date_column], SortMultipleOptions::default());
    }
    lf = fill_gaps(lf, &instruments);

    let mut selection: Vec<Expr> = Vec::with_capacity(instruments.len() + 1);
    if has_dates {
        selection.push(col(date_column));
    }
    selection.extend(instruments.iter().map(|name| {
        let price = col(name.as_str());
        (price.clone() / price.shift(lit(1)) - lit(1.0)).alias(name.as_str())
    }));

    let complete = instruments
        .iter()
        .map(|name| col(name.as_str()).is_not_null())
        .reduce(|acc, e| acc.and(e))
        .unwrap_or_else(|| lit(true));

    let df = lf.select(selection).slice(1, IdxSize::MAX).filter(complete).collect()?;

    let columns: Vec<Vec<f64>> = instruments
        .iter()
        .map(|name| -> Result<Vec<f64>, UtilsError> {
            let values = df.column(name)?.f64()?;
            Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        })
        .collect::<Result<_, _>>()?;

    // Zero prices produce infinite returns; treat those rows as incomplete too.
    let keep: Vec<usize> =
        (0..df.height()).filter(|&i| columns.iter().all(|c| c[i].is_finite())).collect();
    if keep.len() < 2 {
        return Err(UtilsError::InsufficientData { required: 2, actual: keep.len() });
    }

    let values = Array2::from_shape_fn((keep.len(), columns.len()), |(i, j)| columns[j][keep[i]]);
    let symbols: Vec<Symbol> = instruments.into_iter().map(Symbol::from).collect();
    let mut matrix = ReturnsMatrix::new(symbols, values);

    if has_dates {
        if let Some(dates) = extract_dates(&df, date_column)? {
            matrix = matrix.with_dates(keep.iter().map(|&i| dates[i]).collect());
        }
    }

    Ok(match options.lookback {
        Some(periods) => matrix.tail(periods),
        None => matrix,
    })
}

/// Period labels of a date or `YYYY-MM-DD` string column, if every row has one.
fn extract_dates(df: &DataFrame, name: &str) -> Result<Option<Vec<Date>>, UtilsError> {
    let column = df.column(name)?;
    let dates: Option<Vec<Date>> = match column.dtype() {
        DataType::Date => column.date()?.as_date_iter().collect(),
        DataType::String => column
            .str()?
            .into_iter()
            .map(|s| s.and_then(|s| Date::parse_from_str(s, "%Y-%m-%d").ok()))
            .collect(),
        _ => None,
    };
    Ok(dates)
}
