//! Per-instrument risk contribution definitions.

use ndarray::Array1;
use serde::{Serialize, Serializer};

use crate::Symbol;

/// Share of portfolio variance attributable to each instrument, in percent.
///
/// Absolute values sum to 100 whenever portfolio variance is positive, and
/// every entry is 0 when it is not. Serializes as a `symbol -> percent` map.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskContributions {
    symbols: Vec<Symbol>,
    percentages: Array1<f64>,
}

impl RiskContributions {
    /// Create risk contributions.
    #[must_use]
    pub fn new(symbols: Vec<Symbol>, percentages: Array1<f64>) -> Self {
        debug_assert_eq!(symbols.len(), percentages.len());
        Self { symbols, percentages }
    }

    /// Instrument symbols.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Percentages in symbol order.
    #[must_use]
    pub const fn percentages(&self) -> &Array1<f64> {
        &self.percentages
    }

    /// Contribution of a specific instrument.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.symbols.iter().position(|s| s.as_str() == symbol).map(|i| self.percentages[i])
    }

    /// Sum of absolute contributions.
    #[must_use]
    pub fn total_abs(&self) -> f64 {
        self.percentages.iter().map(|p| p.abs()).sum()
    }

    /// Iterate over `(symbol, percent)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, f64)> {
        self.symbols.iter().zip(self.percentages.iter().copied())
    }
}

impl Serialize for RiskContributions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn lookup_and_total() {
        let rc = RiskContributions::new(vec!["A".into(), "B".into()], array![70.0, -30.0]);
        assert_eq!(rc.get("B"), Some(-30.0));
        assert_eq!(rc.total_abs(), 100.0);
    }
}
