//! # frontier
//!
//! Portfolio optimization over historical returns.
//!
//! This crate provides a unified interface to the frontier crates.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Core type definitions
//! - `traits`: Objective and solver abstractions
//! - `risk`: Portfolio statistics and risk decomposition
//! - `solver`: Constrained minimization
//! - `optimizer`: Portfolio optimization and efficient frontiers
//! - `utils`: Price table loading and return computation
//! - `cli`: The `optimize` command line tool
//!
//! ## Example
//!
//! ```rust,ignore
//! use frontier::optimizer::{OptimizerConfig, PortfolioOptimizer};
//!
//! let optimizer = PortfolioOptimizer::new(returns, OptimizerConfig::default())?;
//! let result = optimizer.optimize()?;
//! let frontier = optimizer.compute_efficient_frontier(50, None, None)?;
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/frontier-rs/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use frontier_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use frontier_traits as traits;
#[cfg(feature = "risk")]
#[doc(inline)]
pub use frontier_risk as risk;
#[cfg(feature = "solver")]
#[doc(inline)]
pub use frontier_solver as solver;
#[cfg(feature = "optimizer")]
#[doc(inline)]
pub use frontier_optimizer as optimizer;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use frontier_utils as utils;
