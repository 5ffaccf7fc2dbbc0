//! ESG score definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Raw environmental/social/governance scores keyed by instrument.
///
/// Raw scores follow the provider convention where lower is better (a risk
/// score). Instruments without a score are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EsgScores {
    scores: BTreeMap<Symbol, f64>,
}

impl EsgScores {
    /// Create an empty score map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the raw score of an instrument.
    pub fn insert(&mut self, symbol: impl Into<Symbol>, raw: f64) {
        self.scores.insert(symbol.into(), raw);
    }

    /// Raw score of an instrument.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.scores.get(&Symbol::from(symbol)).copied()
    }

    /// Number of scored instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate over `(symbol, raw score)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, f64)> {
        self.scores.iter().map(|(s, v)| (s, *v))
    }

    /// Minimum and maximum raw score across all known instruments.
    #[must_use]
    pub fn range(&self) -> Option<(f64, f64)> {
        if self.scores.is_empty() {
            return None;
        }
        let min = self.scores.values().copied().fold(f64::INFINITY, f64::min);
        let max = self.scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// Min-max normalize a raw score and invert it so that 1.0 is best.
    ///
    /// When every known score is identical the midpoint 0.5 is returned.
    #[must_use]
    pub fn normalize(&self, raw: f64) -> f64 {
        match self.range() {
            Some((min, max)) if max > min => 1.0 - ((raw - min) / (max - min)).clamp(0.0, 1.0),
            _ => 0.5,
        }
    }

    /// Raw scores aligned to a list of symbols (`None` where unscored).
    #[must_use]
    pub fn aligned(&self, symbols: &[Symbol]) -> Vec<Option<f64>> {
        symbols.iter().map(|s| self.scores.get(s).copied()).collect()
    }
}

impl<S: Into<Symbol>> FromIterator<(S, f64)> for EsgScores {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self { scores: iter.into_iter().map(|(s, v)| (s.into(), v)).collect() }
    }
}
