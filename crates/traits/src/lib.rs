#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/frontier-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod objective;
pub use objective::{DEFAULT_DIFF_STEP, Objective, central_difference};

mod constraint;
pub use constraint::{Bounds, ConstraintKind, LinearConstraint};

mod solver;
pub use solver::{ConstrainedSolver, Problem, SolveOutcome, SolverError};
