//! ESG preference blended into a base objective.

use frontier_primitives::{EsgScores, Symbol};
use frontier_traits::Objective;

/// Normalized ESG quality of a portfolio.
///
/// Quality is the exposure-weighted average of the normalized scores
/// (1.0 best) over scored instruments, using `|w|` so that short legs
/// count as exposure. Unscored instruments are left out of both the
/// numerator and the denominator; a portfolio with no scored exposure has
/// quality 0.
#[derive(Debug, Clone)]
pub struct EsgTilt {
    normalized: Vec<Option<f64>>,
}

impl EsgTilt {
    /// Align and normalize `scores` to the instrument order of `symbols`.
    #[must_use]
    pub fn new(scores: &EsgScores, symbols: &[Symbol]) -> Self {
        let normalized =
            scores.aligned(symbols).into_iter().map(|raw| raw.map(|r| scores.normalize(r))).collect();
        Self { normalized }
    }

    /// Whether any instrument carries a score.
    #[must_use]
    pub fn covers_any(&self) -> bool {
        self.normalized.iter().any(Option::is_some)
    }

    fn sums(&self, w: &[f64]) -> (f64, f64) {
        self.normalized
            .iter()
            .zip(w)
            .filter_map(|(s, x)| s.map(|s| (s, x.abs())))
            .fold((0.0, 0.0), |(num, den), (s, a)| (num + s * a, den + a))
    }

    /// Portfolio ESG quality in `[0, 1]`.
    #[must_use]
    pub fn quality(&self, w: &[f64]) -> f64 {
        let (num, den) = self.sums(w);
        if den > 0.0 { num / den } else { 0.0 }
    }

    /// Gradient of [`quality`](Self::quality) with respect to `w`.
    #[must_use]
    pub fn gradient(&self, w: &[f64]) -> Vec<f64> {
        let (num, den) = self.sums(w);
        if den <= 0.0 {
            return vec![0.0; w.len()];
        }
        self.normalized
            .iter()
            .zip(w)
            .map(|(s, x)| match s {
                Some(s) if *x != 0.0 => x.signum() * (s * den - num) / (den * den),
                _ => 0.0,
            })
            .collect()
    }
}

/// `(1 - alpha) * base - alpha * scale * quality`.
pub struct EsgBlend<O> {
    base: O,
    tilt: EsgTilt,
    weight: f64,
    scale: f64,
}

impl<O: Objective> EsgBlend<O> {
    /// Blend `base` with ESG quality at weight `weight` and magnitude `scale`.
    #[must_use]
    pub const fn new(base: O, tilt: EsgTilt, weight: f64, scale: f64) -> Self {
        Self { base, tilt, weight, scale }
    }
}

impl<O: Objective> std::fmt::Debug for EsgBlend<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EsgBlend")
            .field("base", &self.base.name())
            .field("tilt", &self.tilt)
            .field("weight", &self.weight)
            .field("scale", &self.scale)
            .finish()
    }
}

impl<O: Objective> Objective for EsgBlend<O> {
    fn value(&self, w: &[f64]) -> f64 {
        (1.0 - self.weight) * self.base.value(w) - self.weight * self.scale * self.tilt.quality(w)
    }

    fn gradient(&self, w: &[f64]) -> Vec<f64> {
        let esg = self.tilt.gradient(w);
        self.base
            .gradient(w)
            .into_iter()
            .zip(esg)
            .map(|(g, e)| (1.0 - self.weight) * g - self.weight * self.scale * e)
            .collect()
    }

    fn name(&self) -> &str {
        self.base.name()
    }
}
