//! Portfolio weight definitions.

use ndarray::Array1;
use serde::{Serialize, Serializer};

use crate::Symbol;

/// Portfolio weights, one per instrument, in returns-matrix column order.
///
/// Serializes as a `symbol -> weight` map.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    symbols: Vec<Symbol>,
    weights: Array1<f64>,
}

impl Allocation {
    /// Create an allocation from symbols and weights.
    #[must_use]
    pub fn new(symbols: Vec<Symbol>, weights: Array1<f64>) -> Self {
        debug_assert_eq!(symbols.len(), weights.len());
        Self { symbols, weights }
    }

    /// Equal weights (1/N) across the given symbols.
    #[must_use]
    pub fn equal(symbols: Vec<Symbol>) -> Self {
        let n = symbols.len();
        let w = if n == 0 { 0.0 } else { 1.0 / n as f64 };
        Self { symbols, weights: Array1::from_elem(n, w) }
    }

    /// Instrument symbols.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Weight vector.
    #[must_use]
    pub const fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Weight of a specific instrument.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.symbols.iter().position(|s| s.as_str() == symbol).map(|i| self.weights[i])
    }

    /// Sum of weights (net exposure).
    #[must_use]
    pub fn net_exposure(&self) -> f64 {
        self.weights.sum()
    }

    /// Sum of absolute weights (gross exposure / leverage).
    #[must_use]
    pub fn gross_exposure(&self) -> f64 {
        self.weights.iter().map(|w| w.abs()).sum()
    }

    /// Number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over `(symbol, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, f64)> {
        self.symbols.iter().zip(self.weights.iter().copied())
    }
}

impl Serialize for Allocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
