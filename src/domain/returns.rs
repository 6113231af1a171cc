//! Log returns and annualised statistics.
//!
//! r[t,i] = ln(P[t,i]) - ln(P[t-1,i])
//! mu[i] = mean(r[.,i]) * trading_days
//! cov[i][j] = sum((r[t,i] - mean_i)(r[t,j] - mean_j)) / (T - 1) * trading_days
//!
//! Covariance uses the sample (T - 1) denominator.

use crate::domain::error::FrontierError;
use crate::domain::linalg::Matrix;
use crate::domain::price_table::PriceTable;
use chrono::NaiveDate;

/// Fewest aligned price rows that yield a sample covariance (two returns).
pub const MIN_PRICE_ROWS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnRow {
    pub date: NaiveDate,
    pub returns: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub tickers: Vec<String>,
    pub rows: Vec<ReturnRow>,
}

impl ReturnSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn log_returns(prices: &PriceTable) -> Result<ReturnSeries, FrontierError> {
    if prices.row_count() < 2 {
        return Err(FrontierError::InsufficientData {
            rows: prices.row_count(),
            minimum: 2,
        });
    }

    let rows = prices
        .rows()
        .windows(2)
        .filter_map(|w| {
            let returns: Vec<f64> = w[1]
                .closes
                .iter()
                .zip(&w[0].closes)
                .map(|(curr, prev)| curr.ln() - prev.ln())
                .collect();
            returns.iter().all(|r| r.is_finite()).then(|| ReturnRow {
                date: w[1].date,
                returns,
            })
        })
        .collect();

    Ok(ReturnSeries {
        tickers: prices.tickers().to_vec(),
        rows,
    })
}

/// Annualised mean vector and covariance matrix. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetStatistics {
    tickers: Vec<String>,
    mu: Vec<f64>,
    cov: Matrix,
}

impl AssetStatistics {
    pub fn estimate(returns: &ReturnSeries, trading_days: f64) -> Result<Self, FrontierError> {
        if returns.len() < 2 {
            return Err(FrontierError::InsufficientData {
                rows: returns.len() + 1,
                minimum: MIN_PRICE_ROWS,
            });
        }

        let n = returns.tickers.len();
        let t = returns.len() as f64;

        let means: Vec<f64> = (0..n)
            .map(|i| returns.rows.iter().map(|r| r.returns[i]).sum::<f64>() / t)
            .collect();

        let mut cov = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i..n {
                let s: f64 = returns
                    .rows
                    .iter()
                    .map(|r| (r.returns[i] - means[i]) * (r.returns[j] - means[j]))
                    .sum();
                let value = s / (t - 1.0) * trading_days;
                cov[i][j] = value;
                cov[j][i] = value;
            }
        }

        Ok(Self {
            tickers: returns.tickers.clone(),
            mu: means.iter().map(|m| m * trading_days).collect(),
            cov,
        })
    }

    /// Build directly from known annualised figures.
    pub fn from_parts(
        tickers: Vec<String>,
        mu: Vec<f64>,
        cov: Matrix,
    ) -> Result<Self, FrontierError> {
        let n = mu.len();
        if tickers.len() != n || cov.len() != n || cov.iter().any(|row| row.len() != n) {
            return Err(FrontierError::InvalidParameter {
                name: "statistics".into(),
                reason: format!(
                    "dimension mismatch: {} tickers, {} means, {}x{} covariance",
                    tickers.len(),
                    n,
                    cov.len(),
                    cov.first().map_or(0, |r| r.len())
                ),
            });
        }
        Ok(Self { tickers, mu, cov })
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn mu(&self) -> &[f64] {
        &self.mu
    }

    pub fn cov(&self) -> &Matrix {
        &self.cov
    }

    pub fn asset_count(&self) -> usize {
        self.mu.len()
    }

    /// sqrt of each diagonal entry.
    pub fn volatilities(&self) -> Vec<f64> {
        (0..self.asset_count())
            .map(|i| self.cov[i][i].max(0.0).sqrt())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_table::PriceRow;
    use approx::assert_abs_diff_eq;

    fn table(closes: &[[f64; 2]]) -> PriceTable {
        let rows = closes
            .iter()
            .enumerate()
            .map(|(i, c)| PriceRow {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                closes: c.to_vec(),
            })
            .collect();
        PriceTable::new(vec!["A".into(), "B".into()], rows).unwrap()
    }

    #[test]
    fn log_returns_drop_first_row() {
        let prices = table(&[[100.0, 50.0], [110.0, 50.0], [121.0, 25.0]]);
        let returns = log_returns(&prices).unwrap();

        assert_eq!(returns.len(), 2);
        assert_eq!(
            returns.rows[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_abs_diff_eq!(returns.rows[0].returns[0], (1.1_f64).ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(returns.rows[0].returns[1], 0.0);
        assert_abs_diff_eq!(returns.rows[1].returns[1], (0.5_f64).ln(), epsilon = 1e-12);
    }

    #[test]
    fn log_returns_single_row_is_insufficient() {
        let prices = table(&[[100.0, 50.0]]);
        assert!(matches!(
            log_returns(&prices),
            Err(FrontierError::InsufficientData { rows: 1, minimum: 2 })
        ));
    }

    #[test]
    fn estimate_annualises_mean() {
        let prices = table(&[[100.0, 100.0], [101.0, 99.0], [102.0, 100.0], [103.0, 101.0]]);
        let returns = log_returns(&prices).unwrap();
        let stats = AssetStatistics::estimate(&returns, 252.0).unwrap();

        let expected_a = (103.0_f64 / 100.0).ln() / 3.0 * 252.0;
        let expected_b = (101.0_f64 / 100.0).ln() / 3.0 * 252.0;
        assert_abs_diff_eq!(stats.mu()[0], expected_a, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.mu()[1], expected_b, epsilon = 1e-12);
    }

    #[test]
    fn estimate_uses_sample_covariance() {
        let returns = ReturnSeries {
            tickers: vec!["A".into(), "B".into()],
            rows: vec![
                ReturnRow { date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), returns: vec![0.01, 0.02] },
                ReturnRow { date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), returns: vec![0.03, -0.02] },
                ReturnRow { date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(), returns: vec![0.02, 0.03] },
            ],
        };
        let stats = AssetStatistics::estimate(&returns, 1.0).unwrap();

        // A: mean 0.02, deviations -0.01, 0.01, 0 → var = 0.0002 / 2
        assert_abs_diff_eq!(stats.cov()[0][0], 0.0001, epsilon = 1e-15);
        // B: mean 0.01, deviations 0.01, -0.03, 0.02 → var = 0.0014 / 2
        assert_abs_diff_eq!(stats.cov()[1][1], 0.0007, epsilon = 1e-15);
        // cross: (-0.01)(0.01) + (0.01)(-0.03) + 0 = -0.0004 → / 2
        assert_abs_diff_eq!(stats.cov()[0][1], -0.0002, epsilon = 1e-15);
        assert_eq!(stats.cov()[0][1], stats.cov()[1][0]);
    }

    #[test]
    fn estimate_scales_covariance_by_trading_days() {
        let prices = table(&[[100.0, 100.0], [101.0, 99.0], [99.0, 100.0], [103.0, 102.0]]);
        let returns = log_returns(&prices).unwrap();
        let daily = AssetStatistics::estimate(&returns, 1.0).unwrap();
        let annual = AssetStatistics::estimate(&returns, 252.0).unwrap();

        assert_abs_diff_eq!(annual.cov()[0][1], daily.cov()[0][1] * 252.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            annual.volatilities()[0],
            daily.volatilities()[0] * 252.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn estimate_needs_two_returns() {
        let prices = table(&[[100.0, 50.0], [101.0, 51.0]]);
        let returns = log_returns(&prices).unwrap();
        assert!(matches!(
            AssetStatistics::estimate(&returns, 252.0),
            Err(FrontierError::InsufficientData { rows: 2, minimum: MIN_PRICE_ROWS })
        ));
    }

    #[test]
    fn from_parts_rejects_mismatched_dimensions() {
        let result = AssetStatistics::from_parts(
            vec!["A".into(), "B".into()],
            vec![0.1, 0.2],
            vec![vec![0.04, 0.0]],
        );
        assert!(matches!(result, Err(FrontierError::InvalidParameter { .. })));
    }
}
