//! Feasibility polish by alternating projections.

use frontier_traits::{ConstraintKind, LinearConstraint, Problem};
use ndarray::{Array1, Array2};

/// Joint orthogonal projection onto `{x : A x = b}`.
struct AffineProjector {
    a: Array2<f64>,
    b: Array1<f64>,
    gram: Array2<f64>,
}

impl AffineProjector {
    fn new(rows: &[&LinearConstraint], n: usize) -> Self {
        let m = rows.len();
        let a = Array2::from_shape_fn((m, n), |(i, j)| rows[i].coefficients()[j]);
        let b = rows.iter().map(|c| c.rhs()).collect();
        let gram = a.dot(&a.t());
        Self { a, b, gram }
    }

    fn project(&self, x: &mut [f64], rows: &[&LinearConstraint]) {
        if rows.is_empty() {
            return;
        }
        let current = Array1::from(x.to_vec());
        let residual = self.a.dot(&current) - &self.b;

        match solve_linear_system(&self.gram, &residual) {
            Some(y) => {
                let step = self.a.t().dot(&y);
                for (xi, s) in x.iter_mut().zip(step.iter()) {
                    *xi -= s;
                }
            }
            // Dependent rows: fall back to one hyperplane at a time.
            None => {
                for c in rows {
                    project_onto(c, x);
                }
            }
        }
    }
}

/// Project `x` onto the hyperplane (equality) or half-space (inequality) of `c`.
fn project_onto(c: &LinearConstraint, x: &mut [f64]) {
    let r = c.residual(x);
    let active = match c.kind() {
        ConstraintKind::Equality => r != 0.0,
        ConstraintKind::AtMost => r > 0.0,
    };
    let norm_sq: f64 = c.coefficients().iter().map(|a| a * a).sum();
    if !active || norm_sq == 0.0 {
        return;
    }
    let scale = r / norm_sq;
    for (xi, a) in x.iter_mut().zip(c.coefficients()) {
        *xi -= scale * a;
    }
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when `A` is singular or nearly so.
fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n == 0 || a.ncols() != n || b.len() != n {
        return None;
    }

    let mut aug = Array2::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = a[[i, j]];
        }
        aug[[i, n]] = b[i];
    }

    for col in 0..n {
        let pivot = (col..n).max_by(|&p, &q| aug[[p, col]].abs().total_cmp(&aug[[q, col]].abs()))?;
        if aug[[pivot, col]].abs() < 1e-14 {
            return None;
        }
        if pivot != col {
            for j in 0..=n {
                aug.swap([col, j], [pivot, j]);
            }
        }
        for row in (col + 1)..n {
            let factor = aug[[row, col]] / aug[[col, col]];
            for j in col..=n {
                aug[[row, j]] -= factor * aug[[col, j]];
            }
        }
    }

    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = aug[[i, n]];
        for j in (i + 1)..n {
            sum -= aug[[i, j]] * x[j];
        }
        x[i] = sum / aug[[i, i]];
    }
    Some(x)
}

/// Move `w` onto the feasible set of `problem`.
///
/// Cycles through the affine equality set, each inequality half-space and
/// the bound box until the largest violation is at most `tolerance` or
/// `max_sweeps` is exhausted. The result always satisfies the bounds.
#[must_use]
pub fn project_feasible(
    problem: &Problem,
    w: &[f64],
    tolerance: f64,
    max_sweeps: usize,
) -> Vec<f64> {
    let mut x = w.to_vec();
    problem.bounds().clamp(&mut x);

    let equalities: Vec<&LinearConstraint> =
        problem.constraints().iter().filter(|c| c.kind() == ConstraintKind::Equality).collect();
    let inequalities: Vec<&LinearConstraint> =
        problem.constraints().iter().filter(|c| c.kind() == ConstraintKind::AtMost).collect();
    let affine = AffineProjector::new(&equalities, problem.dimension());

    for _ in 0..max_sweeps {
        if problem.max_violation(&x) <= tolerance {
            break;
        }
        affine.project(&mut x, &equalities);
        for c in &inequalities {
            project_onto(c, &mut x);
        }
        problem.bounds().clamp(&mut x);
    }
    x
}
