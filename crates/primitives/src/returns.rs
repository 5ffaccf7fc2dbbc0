//! Periodic returns matrix.

use ndarray::{Array2, ArrayView1, s};

use crate::{Date, Symbol};

/// Periodic fractional returns, one row per period (chronological) and one
/// column per instrument.
///
/// The matrix is expected to be rectangular and gap-free; callers that
/// assemble it from raw prices are responsible for filling or dropping
/// missing observations before construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnsMatrix {
    symbols: Vec<Symbol>,
    values: Array2<f64>,
    dates: Option<Vec<Date>>,
}

impl ReturnsMatrix {
    /// Create a returns matrix from instrument symbols and a `(periods x instruments)` array.
    #[must_use]
    pub fn new(symbols: Vec<Symbol>, values: Array2<f64>) -> Self {
        debug_assert_eq!(symbols.len(), values.ncols());
        Self { symbols, values, dates: None }
    }

    /// Attach one date label per period.
    #[must_use]
    pub fn with_dates(mut self, dates: Vec<Date>) -> Self {
        debug_assert_eq!(dates.len(), self.values.nrows());
        self.dates = Some(dates);
        self
    }

    /// Instrument symbols in column order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Raw `(periods x instruments)` values.
    #[must_use]
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Period labels, if attached.
    #[must_use]
    pub fn dates(&self) -> Option<&[Date]> {
        self.dates.as_deref()
    }

    /// Number of periods (rows).
    #[must_use]
    pub fn n_periods(&self) -> usize {
        self.values.nrows()
    }

    /// Number of instruments (columns).
    #[must_use]
    pub fn n_instruments(&self) -> usize {
        self.values.ncols()
    }

    /// Check if the matrix holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column index of an instrument.
    #[must_use]
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s.as_str() == symbol)
    }

    /// Return series of a single instrument.
    #[must_use]
    pub fn column(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        self.index_of(symbol).map(|j| self.values.column(j))
    }

    /// Whether every observation is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|x| x.is_finite())
    }

    /// Keep only the trailing `periods` rows.
    #[must_use]
    pub fn tail(&self, periods: usize) -> Self {
        let n = self.n_periods();
        let start = n.saturating_sub(periods);
        Self {
            symbols: self.symbols.clone(),
            values: self.values.slice(s![start.., ..]).to_owned(),
            dates: self.dates.as_ref().map(|d| d[start..].to_vec()),
        }
    }
}
