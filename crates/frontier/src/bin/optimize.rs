//! Portfolio optimization CLI tool.
//!
//! Reads a wide CSV of prices (a `date` column plus one column per
//! instrument), optimizes the portfolio, and prints the weights, metrics,
//! risk contributions and efficient frontier as one JSON document.
//!
//! Usage: `cargo run --bin optimize --features cli -- --prices prices.csv`
//! Example: `optimize --prices prices.csv --objective sortino --mode long_short`

use std::path::{Path, PathBuf};

use clap::Parser;
use frontier::{
    optimizer::{OptimizationResult, OptimizerConfig, PortfolioOptimizer},
    primitives::{EsgScores, Frontier, ObjectiveKind, PortfolioMode, RiskContributions},
    utils::{ReturnsOptions, esg_scores_from_frame, returns_from_prices},
};
use polars::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "optimize", about = "Optimize a portfolio from historical prices")]
struct Args {
    /// CSV of prices with a date column and one column per instrument.
    #[arg(long)]
    prices: PathBuf,

    /// sharpe, sortino, calmar or min_variance.
    #[arg(long, default_value = "sharpe")]
    objective: ObjectiveKind,

    /// long_only or long_short.
    #[arg(long, default_value = "long_only")]
    mode: PortfolioMode,

    /// Annual risk-free rate.
    #[arg(long, default_value_t = 0.02)]
    risk_free_rate: f64,

    /// Gross exposure cap for long/short portfolios.
    #[arg(long, default_value_t = 1.5)]
    max_leverage: f64,

    /// Number of starting points.
    #[arg(long, default_value_t = 5)]
    restarts: usize,

    /// Seed for the starting points.
    #[arg(long)]
    seed: Option<u64>,

    /// Keep only the trailing number of return periods.
    #[arg(long)]
    lookback: Option<usize>,

    /// CSV with `symbol` and `score` columns of raw ESG scores.
    #[arg(long)]
    esg_scores: Option<PathBuf>,

    /// Weight of the ESG preference in [0, 1].
    #[arg(long, default_value_t = 0.0)]
    esg_weight: f64,

    /// Number of frontier points; 0 skips the frontier.
    #[arg(long, default_value_t = 50)]
    frontier_points: usize,
}

#[derive(Serialize)]
struct Report {
    #[serde(flatten)]
    result: OptimizationResult,
    risk_contributions: RiskContributions,
    #[serde(skip_serializing_if = "Option::is_none")]
    efficient_frontier: Option<Frontier>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let prices = read_csv(&args.prices)?;
    let mut options = ReturnsOptions::default();
    if let Some(periods) = args.lookback {
        options = options.with_lookback(periods);
    }
    let returns = returns_from_prices(&prices, &options)?;
    info!(
        instruments = returns.n_instruments(),
        periods = returns.n_periods(),
        "loaded returns"
    );

    let mut config = OptimizerConfig::default()
        .with_objective(args.objective)
        .with_mode(args.mode)
        .with_risk_free_rate(args.risk_free_rate)
        .with_restarts(args.restarts);
    config.max_leverage = args.max_leverage;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(path) = &args.esg_scores {
        config = config.with_esg(read_esg_scores(path)?, args.esg_weight);
    }

    let optimizer = PortfolioOptimizer::new(returns, config)?;
    let result = optimizer.optimize()?;
    let risk_contributions = optimizer.risk_contributions(&result.allocation)?;

    let efficient_frontier = if args.frontier_points == 0 {
        None
    } else {
        match optimizer.compute_efficient_frontier(
            args.frontier_points,
            Some(result.metrics.expected_return),
            Some(result.metrics.volatility),
        ) {
            Ok(frontier) => Some(frontier),
            Err(err) if err.is_recoverable() => {
                warn!(%err, "efficient frontier unavailable");
                None
            }
            Err(err) => return Err(err.into()),
        }
    };

    let report = Report { result, risk_contributions, efficient_frontier };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_csv(path: &Path) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

fn read_esg_scores(path: &Path) -> Result<EsgScores, Box<dyn std::error::Error>> {
    let table = read_csv(path)?;
    let scores = esg_scores_from_frame(&table, "symbol", "score")?;
    info!(scored = scores.len(), "loaded esg scores");
    Ok(scores)
}
