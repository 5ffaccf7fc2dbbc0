//! Objective and portfolio-mode selectors.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Error returned when parsing an objective or mode name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Unknown objective name.
    #[error("unknown objective: {0} (expected sharpe, sortino, calmar or min_variance)")]
    UnknownObjective(String),

    /// Unknown portfolio mode name.
    #[error("unknown portfolio mode: {0} (expected long_only or long_short)")]
    UnknownMode(String),
}

/// The scalar score an optimization maximizes (or, for `MinVariance`, minimizes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Annualized excess return over annualized volatility.
    #[default]
    Sharpe,
    /// Annualized excess return over annualized downside deviation.
    Sortino,
    /// Annualized return over the magnitude of the maximum drawdown.
    Calmar,
    /// Annualized portfolio variance.
    MinVariance,
}

impl ObjectiveKind {
    /// All objective kinds.
    pub const ALL: [Self; 4] = [Self::Sharpe, Self::Sortino, Self::Calmar, Self::MinVariance];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sharpe => "sharpe",
            Self::Sortino => "sortino",
            Self::Calmar => "calmar",
            Self::MinVariance => "min_variance",
        }
    }

    /// Whether the objective is a return/risk ratio to be maximized.
    #[must_use]
    pub const fn is_ratio(&self) -> bool {
        !matches!(self, Self::MinVariance)
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectiveKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sharpe" => Ok(Self::Sharpe),
            "sortino" => Ok(Self::Sortino),
            "calmar" => Ok(Self::Calmar),
            "min_variance" | "min-variance" | "minvariance" => Ok(Self::MinVariance),
            _ => Err(ParseError::UnknownObjective(s.to_string())),
        }
    }
}

/// Portfolio construction mode, determining bounds and the leverage constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioMode {
    /// Weights in [0, 1], fully invested.
    #[default]
    LongOnly,
    /// Weights in [-1, 1], fully invested, gross exposure capped.
    LongShort,
}

impl PortfolioMode {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LongOnly => "long_only",
            Self::LongShort => "long_short",
        }
    }

    /// Per-weight `(lower, upper)` bound.
    #[must_use]
    pub const fn weight_bounds(&self) -> (f64, f64) {
        match self {
            Self::LongOnly => (0.0, 1.0),
            Self::LongShort => (-1.0, 1.0),
        }
    }

    /// Whether short positions are permitted.
    #[must_use]
    pub const fn allows_short(&self) -> bool {
        matches!(self, Self::LongShort)
    }
}

impl fmt::Display for PortfolioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortfolioMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long_only" | "long-only" => Ok(Self::LongOnly),
            "long_short" | "long-short" => Ok(Self::LongShort),
            _ => Err(ParseError::UnknownMode(s.to_string())),
        }
    }
}
