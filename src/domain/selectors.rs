//! Distinguished portfolios: global minimum variance and maximum Sharpe.

use crate::domain::error::FrontierError;
use crate::domain::frontier::{portfolio_volatility, Frontier};
use crate::domain::linalg::{self, Matrix};
use crate::domain::returns::AssetStatistics;

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub weights: Vec<f64>,
    pub expected_return: f64,
    pub volatility: f64,
}

impl Portfolio {
    pub fn from_weights(weights: Vec<f64>, stats: &AssetStatistics) -> Self {
        Self {
            expected_return: linalg::dot(&weights, stats.mu()),
            volatility: portfolio_volatility(&weights, stats.cov()),
            weights,
        }
    }

    pub fn sharpe_ratio(&self, risk_free_rate: f64) -> f64 {
        sharpe_ratio(self.expected_return, self.volatility, risk_free_rate)
    }
}

/// (return - rf) / volatility, or 0 when volatility is not positive.
pub fn sharpe_ratio(expected_return: f64, volatility: f64, risk_free_rate: f64) -> f64 {
    if volatility > 0.0 {
        (expected_return - risk_free_rate) / volatility
    } else {
        0.0
    }
}

/// w = Σ⁻¹1 / (1ᵀΣ⁻¹1)
pub fn global_min_variance(
    inv_cov: &Matrix,
    stats: &AssetStatistics,
) -> Result<Portfolio, FrontierError> {
    let ones = vec![1.0; stats.asset_count()];
    let numer = linalg::mat_vec(inv_cov, &ones);
    let denom = linalg::dot(&ones, &numer);

    if !denom.is_finite() || denom <= 0.0 {
        return Err(FrontierError::SingularCovariance {
            reason: format!("1ᵀΣ⁻¹1 = {denom:e} is not positive"),
        });
    }

    let weights = numer.iter().map(|v| v / denom).collect();
    Ok(Portfolio::from_weights(weights, stats))
}

/// Highest-Sharpe sample on the curve. Ties keep the lowest return.
///
/// Accuracy is bounded by the sampling resolution; see [`tangency`] for the
/// exact solution.
pub fn max_sharpe(frontier: &Frontier, risk_free_rate: f64) -> Result<Portfolio, FrontierError> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in frontier.points.iter().enumerate() {
        let s = sharpe_ratio(p.target_return, p.volatility, risk_free_rate);
        let better = match best {
            Some((_, best_s)) => s > best_s,
            None => !s.is_nan(),
        };
        if better {
            best = Some((i, s));
        }
    }

    let (idx, _) = best.ok_or_else(|| FrontierError::DegenerateFrontier {
        reason: "frontier has no samples with a finite Sharpe ratio".into(),
    })?;
    let point = &frontier.points[idx];
    Ok(Portfolio {
        weights: point.weights.clone(),
        expected_return: point.target_return,
        volatility: point.volatility,
    })
}

/// Closed-form tangency portfolio: w = Σ⁻¹(μ - rf·1) / 1ᵀΣ⁻¹(μ - rf·1).
pub fn tangency(
    inv_cov: &Matrix,
    stats: &AssetStatistics,
    risk_free_rate: f64,
) -> Result<Portfolio, FrontierError> {
    let excess: Vec<f64> = stats.mu().iter().map(|m| m - risk_free_rate).collect();
    let numer = linalg::mat_vec(inv_cov, &excess);
    let denom: f64 = numer.iter().sum();

    let scale = numer.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if !denom.is_finite() || denom.abs() <= 1e-12 * scale.max(f64::MIN_POSITIVE) {
        return Err(FrontierError::DegenerateFrontier {
            reason: "tangency portfolio undefined: excess returns cancel out".into(),
        });
    }

    let weights = numer.iter().map(|v| v / denom).collect();
    Ok(Portfolio::from_weights(weights, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frontier::{solve_frontier, FrontierPoint};
    use approx::assert_abs_diff_eq;

    fn sample_stats() -> AssetStatistics {
        AssetStatistics::from_parts(
            vec!["A".into(), "B".into(), "C".into()],
            vec![0.08, 0.12, 0.05],
            vec![
                vec![0.04, 0.006, 0.002],
                vec![0.006, 0.09, 0.003],
                vec![0.002, 0.003, 0.01],
            ],
        )
        .unwrap()
    }

    fn frontier_from(points: &[(f64, f64)]) -> Frontier {
        Frontier {
            points: points
                .iter()
                .map(|&(target_return, volatility)| FrontierPoint {
                    target_return,
                    volatility,
                    weights: vec![0.5, 0.5],
                })
                .collect(),
            inv_cov: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            a: 2.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
        }
    }

    #[test]
    fn sharpe_zero_volatility_is_zero() {
        assert_eq!(sharpe_ratio(0.1, 0.0, 0.0), 0.0);
        assert_eq!(sharpe_ratio(-0.1, 0.0, 0.02), 0.0);
    }

    #[test]
    fn sharpe_basic() {
        assert_abs_diff_eq!(sharpe_ratio(0.12, 0.2, 0.02), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn gmv_weights_sum_to_one() {
        let stats = sample_stats();
        let frontier = solve_frontier(&stats, 60).unwrap();
        let gmv = global_min_variance(&frontier.inv_cov, &stats).unwrap();
        assert_abs_diff_eq!(gmv.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn gmv_return_is_b_over_a() {
        let stats = sample_stats();
        let frontier = solve_frontier(&stats, 60).unwrap();
        let gmv = global_min_variance(&frontier.inv_cov, &stats).unwrap();
        assert_abs_diff_eq!(gmv.expected_return, frontier.b / frontier.a, epsilon = 1e-12);
        assert_abs_diff_eq!(gmv.volatility, (1.0 / frontier.a).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn gmv_is_below_every_sample() {
        let stats = sample_stats();
        let frontier = solve_frontier(&stats, 60).unwrap();
        let gmv = global_min_variance(&frontier.inv_cov, &stats).unwrap();
        for p in &frontier.points {
            assert!(gmv.volatility <= p.volatility + 1e-12);
        }
    }

    #[test]
    fn max_sharpe_picks_best_sample() {
        let frontier = frontier_from(&[(0.05, 0.2), (0.08, 0.1), (0.12, 0.3)]);
        let best = max_sharpe(&frontier, 0.0).unwrap();
        assert_eq!(best.expected_return, 0.08);
        assert_eq!(best.volatility, 0.1);
    }

    #[test]
    fn max_sharpe_ties_keep_first() {
        let frontier = frontier_from(&[(0.05, 0.1), (0.10, 0.2), (0.01, 0.5)]);
        let best = max_sharpe(&frontier, 0.0).unwrap();
        assert_eq!(best.expected_return, 0.05);
    }

    #[test]
    fn max_sharpe_zero_volatility_is_non_competitive() {
        let frontier = frontier_from(&[(0.5, 0.0), (0.05, 0.1)]);
        let best = max_sharpe(&frontier, 0.0).unwrap();
        assert_eq!(best.expected_return, 0.05);
    }

    #[test]
    fn max_sharpe_zero_volatility_can_still_win_when_all_negative() {
        let frontier = frontier_from(&[(-0.05, 0.1), (0.0, 0.0), (-0.02, 0.1)]);
        let best = max_sharpe(&frontier, 0.01).unwrap();
        assert_eq!(best.volatility, 0.0);
        assert!(best.sharpe_ratio(0.01).is_finite());
    }

    #[test]
    fn max_sharpe_empty_frontier_fails() {
        let frontier = frontier_from(&[]);
        assert!(max_sharpe(&frontier, 0.0).is_err());
    }

    #[test]
    fn tangency_weights_sum_to_one() {
        let stats = sample_stats();
        let frontier = solve_frontier(&stats, 60).unwrap();
        let t = tangency(&frontier.inv_cov, &stats, 0.0).unwrap();
        assert_abs_diff_eq!(t.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn tangency_dominates_sampled_max_sharpe() {
        let stats = sample_stats();
        let frontier = solve_frontier(&stats, 60).unwrap();
        let sampled = max_sharpe(&frontier, 0.01).unwrap();
        let exact = tangency(&frontier.inv_cov, &stats, 0.01).unwrap();
        assert!(exact.sharpe_ratio(0.01) >= sampled.sharpe_ratio(0.01) - 1e-12);
    }

    #[test]
    fn tangency_undefined_when_excess_cancels() {
        let stats = AssetStatistics::from_parts(
            vec!["A".into(), "B".into()],
            vec![0.1, -0.1],
            vec![vec![0.04, 0.0], vec![0.0, 0.04]],
        )
        .unwrap();
        let inv = linalg::invert(stats.cov()).unwrap();
        assert!(matches!(
            tangency(&inv, &stats, 0.0),
            Err(FrontierError::DegenerateFrontier { .. })
        ));
    }
}
