//! Closed-form efficient frontier (two-fund theorem).
//!
//! With a = 1ᵀΣ⁻¹1, b = 1ᵀΣ⁻¹μ, c = μᵀΣ⁻¹μ and d = ac - b², the
//! minimum-variance portfolio for target return r is
//! w = Σ⁻¹(λ1·1 + λ2·μ) with λ1 = (c - b·r)/d and λ2 = (a·r - b)/d.

use crate::domain::error::FrontierError;
use crate::domain::linalg::{self, Matrix};
use crate::domain::returns::AssetStatistics;

pub const DEFAULT_FRONTIER_POINTS: usize = 60;

/// d is treated as zero below this fraction of |a·c|.
const DEGENERATE_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct FrontierPoint {
    pub target_return: f64,
    pub volatility: f64,
    pub weights: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frontier {
    pub points: Vec<FrontierPoint>,
    pub inv_cov: Matrix,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// `n` evenly spaced values over [start, end], endpoints included.
/// A single value sits at `start`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// sqrt(max(wᵀΣw, 0))
pub fn portfolio_volatility(weights: &[f64], cov: &[Vec<f64>]) -> f64 {
    linalg::quad_form(weights, cov, weights).max(0.0).sqrt()
}

pub fn solve_frontier(
    stats: &AssetStatistics,
    n_points: usize,
) -> Result<Frontier, FrontierError> {
    if n_points == 0 {
        return Err(FrontierError::InvalidParameter {
            name: "frontier_points".into(),
            reason: "must be at least 1".into(),
        });
    }
    if stats.asset_count() < 2 {
        return Err(FrontierError::DegenerateFrontier {
            reason: format!("need at least 2 assets, have {}", stats.asset_count()),
        });
    }

    let mu = stats.mu();
    let cov = stats.cov();
    let inv_cov = linalg::invert(cov)?;
    let ones = vec![1.0; mu.len()];

    let inv_ones = linalg::mat_vec(&inv_cov, &ones);
    let inv_mu = linalg::mat_vec(&inv_cov, mu);

    let a = linalg::dot(&ones, &inv_ones);
    let b = linalg::dot(&ones, &inv_mu);
    let c = linalg::dot(mu, &inv_mu);
    let d = a * c - b * b;

    if !d.is_finite() || d <= DEGENERATE_TOLERANCE * (a * c).abs() {
        return Err(FrontierError::DegenerateFrontier {
            reason: format!("discriminant d = {d:e} is not positive"),
        });
    }

    let min_mu = mu.iter().copied().fold(f64::INFINITY, f64::min);
    let max_mu = mu.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let points = linspace(min_mu, max_mu, n_points)
        .into_iter()
        .map(|target_return| {
            let lambda1 = (c - b * target_return) / d;
            let lambda2 = (a * target_return - b) / d;
            let weights: Vec<f64> = inv_ones
                .iter()
                .zip(&inv_mu)
                .map(|(o, m)| lambda1 * o + lambda2 * m)
                .collect();
            FrontierPoint {
                target_return,
                volatility: portfolio_volatility(&weights, cov),
                weights,
            }
        })
        .collect();

    Ok(Frontier {
        points,
        inv_cov,
        a,
        b,
        c,
        d,
    })
}
