#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/frontier-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod stats;

mod ratios;
pub use ratios::{
    DEFAULT_RISK_FREE_RATE, annualized_return, calmar_ratio, sharpe_ratio, sortino_ratio,
    volatility,
};

mod drawdown;
pub use drawdown::{cumulative_returns, drawdown_series, max_drawdown};

mod tail;
pub use tail::{DEFAULT_CONFIDENCE, conditional_value_at_risk, quantile, value_at_risk};

mod rolling;
pub use rolling::{rolling_sharpe_ratio, rolling_volatility};

mod moments;
pub use moments::{
    annualized_covariance, annualized_mean_returns, correlation_matrix, portfolio_returns,
};

mod decomposition;
pub use decomposition::{risk_decomposition, risk_decomposition_map, risk_shares};

mod error;
pub use error::RiskError;
