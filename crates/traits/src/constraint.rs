//! Linear constraints and box bounds.

/// Direction of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `a · x = b`
    Equality,
    /// `a · x <= b`
    AtMost,
}

/// A linear constraint `a · x (= | <=) b`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    coefficients: Vec<f64>,
    rhs: f64,
    kind: ConstraintKind,
    label: String,
}

impl LinearConstraint {
    /// Equality constraint `a · x = b`.
    #[must_use]
    pub fn equality(coefficients: Vec<f64>, rhs: f64, label: impl Into<String>) -> Self {
        Self { coefficients, rhs, kind: ConstraintKind::Equality, label: label.into() }
    }

    /// Inequality constraint `a · x <= b`.
    #[must_use]
    pub fn at_most(coefficients: Vec<f64>, rhs: f64, label: impl Into<String>) -> Self {
        Self { coefficients, rhs, kind: ConstraintKind::AtMost, label: label.into() }
    }

    /// Inequality constraint `a · x >= b`, stored as `-a · x <= -b`.
    #[must_use]
    pub fn at_least(coefficients: Vec<f64>, rhs: f64, label: impl Into<String>) -> Self {
        let negated = coefficients.into_iter().map(|c| -c).collect();
        Self::at_most(negated, -rhs, label)
    }

    /// Coefficient vector.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Right-hand side.
    #[must_use]
    pub const fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Constraint direction.
    #[must_use]
    pub const fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Label used in diagnostics.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of variables the constraint spans.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.coefficients.len()
    }

    /// Residual `a · x - b`.
    #[must_use]
    pub fn residual(&self, x: &[f64]) -> f64 {
        self.coefficients.iter().zip(x).map(|(a, v)| a * v).sum::<f64>() - self.rhs
    }

    /// Amount by which `x` violates the constraint (0 when satisfied).
    #[must_use]
    pub fn violation(&self, x: &[f64]) -> f64 {
        let r = self.residual(x);
        match self.kind {
            ConstraintKind::Equality => r.abs(),
            ConstraintKind::AtMost => r.max(0.0),
        }
    }

    /// Whether `x` satisfies the constraint within `tol`.
    #[must_use]
    pub fn is_satisfied(&self, x: &[f64], tol: f64) -> bool {
        self.violation(x) <= tol
    }
}

/// Per-variable lower and upper bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Create bounds from explicit vectors.
    #[must_use]
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        debug_assert_eq!(lower.len(), upper.len());
        Self { lower, upper }
    }

    /// Same `[lo, hi]` interval for each of `n` variables.
    #[must_use]
    pub fn uniform(n: usize, lo: f64, hi: f64) -> Self {
        Self { lower: vec![lo; n], upper: vec![hi; n] }
    }

    /// Lower bounds.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bounds.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
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

    /// Whether every bound pair is finite with `lo <= hi`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.lower.len() == self.upper.len()
            && self
                .lower
                .iter()
                .zip(&self.upper)
                .all(|(lo, hi)| lo.is_finite() && hi.is_finite() && lo <= hi)
    }

    /// Clamp `x` into the box in place.
    pub fn clamp(&self, x: &mut [f64]) {
        for ((v, lo), hi) in x.iter_mut().zip(&self.lower).zip(&self.upper) {
            *v = v.clamp(*lo, *hi);
        }
    }

    /// Largest distance of `x` outside the box.
    #[must_use]
    pub fn violation(&self, x: &[f64]) -> f64 {
        x.iter()
            .zip(&self.lower)
            .zip(&self.upper)
            .map(|((v, lo), hi)| (lo - v).max(v - hi).max(0.0))
            .fold(0.0, f64::max)
    }
}
