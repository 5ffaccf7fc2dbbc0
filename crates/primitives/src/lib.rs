#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/frontier-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod symbol;
pub use symbol::Symbol;

mod objective;
pub use objective::{ObjectiveKind, ParseError, PortfolioMode};

mod returns;
pub use returns::ReturnsMatrix;

mod scores;
pub use scores::EsgScores;

mod weights;
pub use weights::Allocation;

mod frontier;
pub use frontier::{Frontier, FrontierPoint};

mod contributions;
pub use contributions::RiskContributions;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;

/// Assumed number of trading periods per year used for annualization.
pub const PERIODS_PER_YEAR: f64 = 252.0;
