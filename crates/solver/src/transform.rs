//! Sine reparameterization of box bounds.

use std::f64::consts::FRAC_PI_2;

use frontier_traits::Bounds;

/// Maps unconstrained `x` onto the box `[lo, hi]` with
/// `w = lo + (hi - lo) (1 + sin x) / 2`.
///
/// Every real `x` lands inside the box, so the inner solver never has to
/// handle bounds. Variables with `lo == hi` are pinned.
#[derive(Debug, Clone)]
pub struct BoxTransform {
    lower: Vec<f64>,
    range: Vec<f64>,
}

impl BoxTransform {
    /// Build the transform for a set of bounds.
    #[must_use]
    pub fn new(bounds: &Bounds) -> Self {
        let range = bounds.lower().iter().zip(bounds.upper()).map(|(lo, hi)| hi - lo).collect();
        Self { lower: bounds.lower().to_vec(), range }
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Bounded point for unconstrained coordinates.
    #[must_use]
    pub fn to_bounded(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.lower.iter().zip(&self.range))
            .map(|(xi, (lo, r))| lo + r * 0.5 * (1.0 + xi.sin()))
            .collect()
    }

    /// Unconstrained coordinates for a bounded point.
    ///
    /// `w` is first pulled inside the box by `margin` (a fraction of each
    /// range) so that no coordinate starts where the derivative vanishes.
    #[must_use]
    pub fn to_unconstrained(&self, w: &[f64], margin: f64) -> Vec<f64> {
        w.iter()
            .zip(self.lower.iter().zip(&self.range))
            .map(|(wi, (lo, r))| {
                if *r <= 0.0 {
                    return -FRAC_PI_2;
                }
                let t = ((wi - lo) / r).clamp(margin, 1.0 - margin);
                (2.0 * t - 1.0).asin()
            })
            .collect()
    }

    /// Chain rule: pull a gradient with respect to `w` back to `x`.
    #[must_use]
    pub fn pull_back(&self, x: &[f64], grad_w: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(grad_w)
            .zip(&self.range)
            .map(|((xi, g), r)| g * r * 0.5 * xi.cos())
            .collect()
    }
}
