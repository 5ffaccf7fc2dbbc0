//! End-to-end properties of optimization and frontier construction on
//! synthetic Gaussian returns.
#![allow(missing_docs)]

use approx::assert_relative_eq;
use frontier_optimizer::{OptimizerError, WEIGHT_TOLERANCE, prelude::*};
use frontier_primitives::Symbol;
use ndarray::{Array1, Array2, ArrayView1};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use rstest::rstest;

/// Independent Gaussian daily returns with the given `(mean, std)` per instrument.
fn gaussian_returns(params: &[(f64, f64)], periods: usize, seed: u64) -> ReturnsMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let normals: Vec<Normal<f64>> =
        params.iter().map(|(m, s)| Normal::new(*m, *s).unwrap()).collect();
    let values =
        Array2::from_shape_fn((periods, params.len()), |(_, j)| normals[j].sample(&mut rng));
    let symbols = (0..params.len()).map(|j| Symbol::new(format!("S{j}"))).collect();
    ReturnsMatrix::new(symbols, values)
}

fn three_assets(seed: u64) -> ReturnsMatrix {
    gaussian_returns(&[(0.001, 0.02), (0.0008, 0.018), (0.0005, 0.01)], 252, seed)
}

fn five_assets(seed: u64) -> ReturnsMatrix {
    gaussian_returns(
        &[(0.0009, 0.021), (0.0004, 0.012), (-0.0002, 0.015), (0.0006, 0.009), (0.0001, 0.025)],
        252,
        seed,
    )
}

fn variance(cov: &Array2<f64>, w: ArrayView1<'_, f64>) -> f64 {
    w.dot(&cov.dot(&w))
}

#[rstest]
#[case(ObjectiveKind::Sharpe, 1)]
#[case(ObjectiveKind::Sortino, 2)]
#[case(ObjectiveKind::Calmar, 3)]
#[case(ObjectiveKind::MinVariance, 4)]
fn long_only_weights_are_bounded_and_fully_invested(
    #[case] objective: ObjectiveKind,
    #[case] seed: u64,
) {
    let config = OptimizerConfig::default().with_objective(objective).with_seed(seed);
    let result = PortfolioOptimizer::new(five_assets(seed), config).unwrap().optimize().unwrap();

    let w = result.allocation.weights();
    assert!((w.sum() - 1.0).abs() <= WEIGHT_TOLERANCE);
    assert!(w.iter().all(|x| (-WEIGHT_TOLERANCE..=1.0 + WEIGHT_TOLERANCE).contains(x)));
    assert!(result.metrics.leverage.is_none());
    assert!(result.metrics.ratio.is_finite());
}

#[rstest]
#[case(ObjectiveKind::Sharpe, 5)]
#[case(ObjectiveKind::Sortino, 6)]
#[case(ObjectiveKind::MinVariance, 7)]
fn long_short_weights_respect_leverage_cap(#[case] objective: ObjectiveKind, #[case] seed: u64) {
    let config = OptimizerConfig::default()
        .with_objective(objective)
        .with_mode(PortfolioMode::LongShort)
        .with_seed(seed);
    let result = PortfolioOptimizer::new(five_assets(seed), config).unwrap().optimize().unwrap();

    let w = result.allocation.weights();
    assert!((w.sum() - 1.0).abs() <= WEIGHT_TOLERANCE);
    assert!(w.iter().all(|x| x.abs() <= 1.0 + WEIGHT_TOLERANCE));
    let gross = result.metrics.leverage.unwrap();
    assert!(gross <= 1.5 + WEIGHT_TOLERANCE);
    assert_relative_eq!(gross, result.allocation.gross_exposure(), epsilon = 1e-12);
}

#[test]
fn three_asset_sharpe_is_reproducible() {
    let config = OptimizerConfig::default().with_seed(42);
    let first =
        PortfolioOptimizer::new(three_assets(2024), config.clone()).unwrap().optimize().unwrap();
    let second = PortfolioOptimizer::new(three_assets(2024), config).unwrap().optimize().unwrap();

    let w = first.allocation.weights();
    assert!((w.sum() - 1.0).abs() <= WEIGHT_TOLERANCE);
    assert!(w.iter().all(|x| *x >= -WEIGHT_TOLERANCE));
    assert!(first.metrics.ratio.is_finite());
    assert_eq!(first.metrics.ratio, first.metrics.sharpe_ratio);

    // Restarts run in parallel but are seeded up front, so reruns agree up to solver noise.
    for (a, b) in w.iter().zip(second.allocation.weights()) {
        assert!((a - b).abs() < 1e-4, "{a} vs {b}");
    }
}

#[test]
fn sharpe_optimum_beats_equal_weights() {
    let returns = three_assets(99);
    let config = OptimizerConfig::default().with_seed(1);
    let optimizer = PortfolioOptimizer::new(returns, config).unwrap();
    let result = optimizer.optimize().unwrap();

    let equal = Array1::from_elem(3, 1.0 / 3.0);
    let series = optimizer.returns().values().dot(&equal);
    let baseline = frontier_risk::sharpe_ratio(series.view(), 0.02).unwrap();
    assert!(result.metrics.sharpe_ratio >= baseline - 1e-6);
}

#[test]
fn two_asset_min_variance_long_short_beats_lattice() {
    let returns = gaussian_returns(&[(0.0006, 0.015), (0.0003, 0.011)], 252, 17);
    let config = OptimizerConfig::default()
        .with_objective(ObjectiveKind::MinVariance)
        .with_mode(PortfolioMode::LongShort)
        .with_seed(17);
    let optimizer = PortfolioOptimizer::new(returns, config).unwrap();
    let result = optimizer.optimize().unwrap();
    let cov = optimizer.covariance();
    let optimum = variance(cov, result.allocation.weights().view());

    let lattice_min = (0..=300)
        .map(|i| -1.0 + i as f64 * 0.01)
        .map(|w0| Array1::from(vec![w0, 1.0 - w0]))
        .filter(|w| {
            w.iter().all(|x| x.abs() <= 1.0) && w.iter().map(|x| x.abs()).sum::<f64>() <= 1.5
        })
        .map(|w| variance(cov, w.view()))
        .fold(f64::INFINITY, f64::min);

    assert!(lattice_min.is_finite());
    assert!(optimum <= lattice_min * (1.0 + 1e-6), "{optimum} vs lattice {lattice_min}");
}

#[test]
fn esg_preference_shifts_weight_toward_better_scores() {
    // Identical return profiles so the ESG term decides.
    let returns = gaussian_returns(&[(0.0005, 0.012), (0.0005, 0.012)], 252, 8);
    let scores: EsgScores = [("S0", 10.0), ("S1", 35.0)].into_iter().collect();

    let plain = OptimizerConfig::default().with_objective(ObjectiveKind::MinVariance).with_seed(8);
    let tilted = plain.clone().with_esg(scores, 0.8);

    let base = PortfolioOptimizer::new(returns.clone(), plain).unwrap().optimize().unwrap();
    let esg = PortfolioOptimizer::new(returns, tilted).unwrap().optimize().unwrap();

    assert!(esg.allocation.get("S0").unwrap() > base.allocation.get("S0").unwrap());
    assert!((esg.allocation.net_exposure() - 1.0).abs() <= WEIGHT_TOLERANCE);
}

#[test]
fn risk_contributions_sum_to_hundred() {
    let optimizer = PortfolioOptimizer::new(
        five_assets(11),
        OptimizerConfig::default().with_mode(PortfolioMode::LongShort).with_seed(11),
    )
    .unwrap();
    let result = optimizer.optimize().unwrap();
    let contributions = optimizer.risk_contributions(&result.allocation).unwrap();
    assert_relative_eq!(contributions.total_abs(), 100.0, epsilon = 1e-8);
    assert_eq!(contributions.symbols(), optimizer.returns().symbols());
}

#[rstest]
#[case(PortfolioMode::LongOnly)]
#[case(PortfolioMode::LongShort)]
fn frontier_points_are_strictly_ascending(#[case] mode: PortfolioMode) {
    let optimizer =
        PortfolioOptimizer::new(five_assets(21), OptimizerConfig::default().with_mode(mode))
            .unwrap();
    let frontier = optimizer.compute_efficient_frontier(30, None, None).unwrap();

    assert!(frontier.len() >= 2);
    for pair in frontier.points().windows(2) {
        assert!(pair[1].risk > pair[0].risk);
        assert!((pair[1].risk - pair[0].risk) / pair[0].risk > 0.001);
    }
    assert!(frontier.points().iter().all(FrontierPoint::is_valid));
}

#[test]
fn extended_frontier_reaches_the_optimized_portfolio() {
    let optimizer = PortfolioOptimizer::new(
        three_assets(5),
        OptimizerConfig::default().with_mode(PortfolioMode::LongShort).with_seed(5),
    )
    .unwrap();
    let result = optimizer.optimize().unwrap();
    let frontier = optimizer
        .compute_efficient_frontier(
            20,
            Some(result.metrics.expected_return),
            Some(result.metrics.volatility),
        )
        .unwrap();

    let top = frontier.max_return().unwrap();
    assert!(top >= result.metrics.expected_return - 1e-3, "{top}");
    for pair in frontier.points().windows(2) {
        assert!((pair[1].risk - pair[0].risk) / pair[0].risk > 0.001);
    }
}

#[test]
fn frontier_json_uses_risk_and_return_keys() {
    let optimizer =
        PortfolioOptimizer::new(three_assets(3), OptimizerConfig::default()).unwrap();
    let frontier = optimizer.compute_efficient_frontier(5, None, None).unwrap();
    let json = serde_json::to_value(&frontier).unwrap();
    let first = &json.as_array().unwrap()[0];
    assert!(first.get("risk").is_some() && first.get("return").is_some());
}

#[test]
fn unknown_objective_is_invalid_input() {
    let err: OptimizerError = "omega".parse::<ObjectiveKind>().unwrap_err().into();
    assert!(matches!(err, OptimizerError::InvalidInput(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn constant_returns_score_zero_for_ratio_objectives() {
    let values = Array2::from_elem((30, 2), 0.001);
    let returns = ReturnsMatrix::new(vec!["A".into(), "B".into()], values);
    let optimizer = PortfolioOptimizer::new(returns, OptimizerConfig::default()).unwrap();
    let objective = optimizer.objective();
    assert_eq!(objective.value(&[0.5, 0.5]), 0.0);
}
