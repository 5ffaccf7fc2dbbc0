#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/frontier-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod settings;
pub use settings::SolverSettings;

mod transform;
pub use transform::BoxTransform;

mod lagrangian;
pub use lagrangian::AugmentedLagrangian;

mod inner;

mod projection;
pub use projection::project_feasible;

mod augmented;
pub use augmented::AugmentedLagrangianSolver;
