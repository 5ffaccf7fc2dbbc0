#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/frontier-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{FrontierConfig, OptimizerConfig};

mod layout;
pub use layout::{LayoutObjective, WeightLayout};

mod objective;
pub use objective::{MaxReturnObjective, MinVarianceObjective, RatioObjective};

mod esg;
pub use esg::{EsgBlend, EsgTilt};

mod metrics;
pub use metrics::{OptimizationResult, PortfolioMetrics};

mod optimizer;
pub use optimizer::{PortfolioOptimizer, WEIGHT_TOLERANCE};

mod frontier;

mod error;
pub use error::OptimizerError;

/// Re-export commonly used types.
pub mod prelude {
    pub use frontier_primitives::{
        Allocation, EsgScores, Frontier, FrontierPoint, ObjectiveKind, PortfolioMode,
        ReturnsMatrix,
    };
    pub use frontier_traits::{ConstrainedSolver, Objective};

    pub use super::{
        FrontierConfig, OptimizationResult, OptimizerConfig, OptimizerError, PortfolioMetrics,
        PortfolioOptimizer,
    };
}
