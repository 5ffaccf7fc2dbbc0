#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/frontier-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod fill;
pub use fill::fill_gaps;

mod returns;
pub use returns::{DATE_COLUMN, ReturnsOptions, returns_from_prices};

mod scores;
pub use scores::esg_scores_from_frame;

mod error;
pub use error::UtilsError;
