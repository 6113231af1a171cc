//! End-to-end frontier analysis over an aligned price table.

use crate::domain::error::FrontierError;
use crate::domain::frontier::{solve_frontier, Frontier, DEFAULT_FRONTIER_POINTS};
use crate::domain::price_table::PriceTable;
use crate::domain::returns::{log_returns, AssetStatistics};
use crate::domain::selectors::{global_min_variance, max_sharpe, tangency, Portfolio};
use std::fmt;
use std::str::FromStr;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// How the maximum-Sharpe portfolio is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxSharpeMethod {
    /// Best of the sampled frontier points.
    #[default]
    Sampled,
    /// Exact closed-form tangency portfolio.
    Tangency,
}

impl FromStr for MaxSharpeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sampled" => Ok(Self::Sampled),
            "tangency" => Ok(Self::Tangency),
            other => Err(format!(
                "unknown max_sharpe_method '{}' (expected sampled or tangency)",
                other
            )),
        }
    }
}

impl fmt::Display for MaxSharpeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sampled => write!(f, "sampled"),
            Self::Tangency => write!(f, "tangency"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub trading_days: f64,
    pub frontier_points: usize,
    pub risk_free_rate: f64,
    pub max_sharpe_method: MaxSharpeMethod,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trading_days: TRADING_DAYS_PER_YEAR,
            frontier_points: DEFAULT_FRONTIER_POINTS,
            risk_free_rate: 0.0,
            max_sharpe_method: MaxSharpeMethod::Sampled,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrontierAnalysis {
    pub statistics: AssetStatistics,
    pub return_count: usize,
    pub frontier: Frontier,
    pub gmv: Portfolio,
    pub max_sharpe: Portfolio,
    pub risk_free_rate: f64,
}

impl FrontierAnalysis {
    pub fn tickers(&self) -> &[String] {
        self.statistics.tickers()
    }

    pub fn asset_volatilities(&self) -> Vec<f64> {
        self.statistics.volatilities()
    }
}

pub fn run_analysis(
    prices: &PriceTable,
    config: &AnalysisConfig,
) -> Result<FrontierAnalysis, FrontierError> {
    let returns = log_returns(prices)?;
    let statistics = AssetStatistics::estimate(&returns, config.trading_days)?;
    analyse_statistics(statistics, returns.len(), config)
}

/// Frontier, GMV and max-Sharpe for already-estimated statistics.
pub fn analyse_statistics(
    statistics: AssetStatistics,
    return_count: usize,
    config: &AnalysisConfig,
) -> Result<FrontierAnalysis, FrontierError> {
    let frontier = solve_frontier(&statistics, config.frontier_points)?;
    let gmv = global_min_variance(&frontier.inv_cov, &statistics)?;
    let max_sharpe = match config.max_sharpe_method {
        MaxSharpeMethod::Sampled => max_sharpe(&frontier, config.risk_free_rate)?,
        MaxSharpeMethod::Tangency => {
            tangency(&frontier.inv_cov, &statistics, config.risk_free_rate)?
        }
    };

    Ok(FrontierAnalysis {
        statistics,
        return_count,
        frontier,
        gmv,
        max_sharpe,
        risk_free_rate: config.risk_free_rate,
    })
}
