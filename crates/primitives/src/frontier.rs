//! Efficient-frontier point definitions.

use serde::{Deserialize, Serialize};

/// One optimized portfolio on the risk/return boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    /// Annualized standard deviation.
    pub risk: f64,
    /// Annualized expected return.
    #[serde(rename = "return")]
    pub expected_return: f64,
}

impl FrontierPoint {
    /// Create a new frontier point.
    #[must_use]
    pub const fn new(risk: f64, expected_return: f64) -> Self {
        Self { risk, expected_return }
    }

    /// Whether both coordinates are finite and risk is strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.risk.is_finite() && self.expected_return.is_finite() && self.risk > 0.0
    }
}

/// Ordered sequence of frontier points, ascending by risk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontier {
    points: Vec<FrontierPoint>,
}

impl Frontier {
    /// Build a frontier from arbitrary points.
    ///
    /// Invalid points are discarded, the rest sorted ascending by risk, and
    /// any point whose risk lies within `tolerance` (relative) of the
    /// previously kept point is dropped.
    #[must_use]
    pub fn from_points(mut points: Vec<FrontierPoint>, tolerance: f64) -> Self {
        points.retain(FrontierPoint::is_valid);
        points.sort_by(|a, b| a.risk.total_cmp(&b.risk));

        let mut kept: Vec<FrontierPoint> = Vec::with_capacity(points.len());
        for point in points {
            match kept.last() {
                Some(prev) if (point.risk - prev.risk) / prev.risk <= tolerance => {}
                _ => kept.push(point),
            }
        }

        Self { points: kept }
    }

    /// Points, ascending by risk.
    #[must_use]
    pub fn points(&self) -> &[FrontierPoint] {
        &self.points
    }

    /// Consume into the underlying points.
    #[must_use]
    pub fn into_points(self) -> Vec<FrontierPoint> {
        self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Highest risk on the curve.
    #[must_use]
    pub fn max_risk(&self) -> Option<f64> {
        self.points.last().map(|p| p.risk)
    }

    /// Highest expected return on the curve.
    #[must_use]
    pub fn max_return(&self) -> Option<f64> {
        self.points.iter().map(|p| p.expected_return).reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_collapses_near_duplicates() {
        let frontier = Frontier::from_points(
            vec![
                FrontierPoint::new(0.20, 0.12),
                FrontierPoint::new(0.10, 0.05),
                FrontierPoint::new(0.10005, 0.0501),
                FrontierPoint::new(0.15, 0.09),
            ],
            0.001,
        );

        let risks: Vec<f64> = frontier.points().iter().map(|p| p.risk).collect();
        assert_eq!(risks, vec![0.10, 0.15, 0.20]);
    }

    #[test]
    fn drops_invalid_points() {
        let frontier = Frontier::from_points(
            vec![
                FrontierPoint::new(0.0, 0.05),
                FrontierPoint::new(f64::NAN, 0.05),
                FrontierPoint::new(0.12, f64::INFINITY),
                FrontierPoint::new(0.12, 0.07),
            ],
            0.001,
        );
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.max_risk(), Some(0.12));
    }

    #[test]
    fn serializes_return_field_name() {
        let json = serde_json::to_string(&FrontierPoint::new(0.1, 0.08)).unwrap();
        assert_eq!(json, r#"{"risk":0.1,"return":0.08}"#);
    }
}
