//! PHR augmented Lagrangian over linear constraints.

use frontier_traits::{ConstraintKind, LinearConstraint, Objective};

/// Augmented Lagrangian of an objective and a set of linear constraints.
///
/// For an equality residual `h` the term is `lambda h + rho/2 h^2`; for an
/// inequality residual `r = c.x - d` it is
/// `(max(0, mu + rho r)^2 - mu^2) / (2 rho)`.
pub struct AugmentedLagrangian<'a> {
    objective: &'a dyn Objective,
    constraints: &'a [LinearConstraint],
    multipliers: Vec<f64>,
    penalty: f64,
}

impl std::fmt::Debug for AugmentedLagrangian<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AugmentedLagrangian")
            .field("objective", &self.objective.name())
            .field("constraints", &self.constraints.len())
            .field("multipliers", &self.multipliers)
            .field("penalty", &self.penalty)
            .finish()
    }
}

impl<'a> AugmentedLagrangian<'a> {
    /// Zero multipliers with the given starting penalty.
    #[must_use]
    pub fn new(
        objective: &'a dyn Objective,
        constraints: &'a [LinearConstraint],
        penalty: f64,
    ) -> Self {
        Self { objective, constraints, multipliers: vec![0.0; constraints.len()], penalty }
    }

    /// Current penalty weight.
    #[must_use]
    pub const fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Current multiplier estimates, one per constraint.
    #[must_use]
    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }

    /// The wrapped objective.
    #[must_use]
    pub fn objective(&self) -> &'a dyn Objective {
        self.objective
    }

    /// Multiply the penalty by `factor`, capped at `max`.
    pub fn grow_penalty(&mut self, factor: f64, max: f64) {
        self.penalty = (self.penalty * factor).min(max);
    }

    /// Largest constraint violation at `w`.
    #[must_use]
    pub fn violation(&self, w: &[f64]) -> f64 {
        self.constraints.iter().map(|c| c.violation(w)).fold(0.0, f64::max)
    }

    /// Lagrangian value at `w`.
    #[must_use]
    pub fn value(&self, w: &[f64]) -> f64 {
        let rho = self.penalty;
        let penalty: f64 = self
            .constraints
            .iter()
            .zip(&self.multipliers)
            .map(|(c, m)| {
                let r = c.residual(w);
                match c.kind() {
                    ConstraintKind::Equality => m * r + 0.5 * rho * r * r,
                    ConstraintKind::AtMost => {
                        let s = (m + rho * r).max(0.0);
                        (s * s - m * m) / (2.0 * rho)
                    }
                }
            })
            .sum();
        self.objective.value(w) + penalty
    }

    /// Lagrangian gradient at `w`.
    #[must_use]
    pub fn gradient(&self, w: &[f64]) -> Vec<f64> {
        let rho = self.penalty;
        let mut grad = self.objective.gradient(w);
        for (c, m) in self.constraints.iter().zip(&self.multipliers) {
            let r = c.residual(w);
            let scale = match c.kind() {
                ConstraintKind::Equality => m + rho * r,
                ConstraintKind::AtMost => (m + rho * r).max(0.0),
            };
            if scale != 0.0 {
                for (g, a) in grad.iter_mut().zip(c.coefficients()) {
                    *g += scale * a;
                }
            }
        }
        grad
    }

    /// First-order multiplier update at the subproblem solution `w`.
    pub fn update_multipliers(&mut self, w: &[f64]) {
        let rho = self.penalty;
        for (c, m) in self.constraints.iter().zip(self.multipliers.iter_mut()) {
            let r = c.residual(w);
            *m = match c.kind() {
                ConstraintKind::Equality => *m + rho * r,
                ConstraintKind::AtMost => (*m + rho * r).max(0.0),
            };
        }
    }
}
