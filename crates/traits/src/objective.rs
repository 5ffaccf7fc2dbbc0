//! Objective trait definitions.

/// Default step for central finite differences.
pub const DEFAULT_DIFF_STEP: f64 = 1e-6;

/// A scalar function to be minimized.
///
/// Implementors must return finite values for every point inside the
/// problem's bounds; degenerate cases (zero volatility, no drawdown) are
/// mapped to a finite score by the implementation rather than NaN.
pub trait Objective: Send + Sync {
    /// Evaluate the objective at `x`.
    fn value(&self, x: &[f64]) -> f64;

    /// Gradient of the objective at `x`.
    ///
    /// Defaults to central finite differences with [`DEFAULT_DIFF_STEP`].
    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        central_difference(|p| self.value(p), x, DEFAULT_DIFF_STEP)
    }

    /// Short name used in diagnostics.
    fn name(&self) -> &str;
}

impl<T: Objective + ?Sized> Objective for &T {
    fn value(&self, x: &[f64]) -> f64 {
        (**self).value(x)
    }

    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        (**self).gradient(x)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Objective + ?Sized> Objective for Box<T> {
    fn value(&self, x: &[f64]) -> f64 {
        (**self).value(x)
    }

    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        (**self).gradient(x)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Central finite-difference gradient of `f` at `x`.
#[must_use]
pub fn central_difference<F: Fn(&[f64]) -> f64>(f: F, x: &[f64], step: f64) -> Vec<f64> {
    let mut probe = x.to_vec();
    let mut grad = vec![0.0; x.len()];

    for i in 0..x.len() {
        let original = probe[i];
        probe[i] = original + step;
        let f_plus = f(&probe);
        probe[i] = original - step;
        let f_minus = f(&probe);
        probe[i] = original;
        grad[i] = (f_plus - f_minus) / (2.0 * step);
    }

    grad
}
