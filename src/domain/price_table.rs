//! Aligned close-price table, one column per ticker.

use crate::domain::error::FrontierError;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub closes: Vec<f64>,
}

/// Date-indexed closes with no gaps.
///
/// Every row carries one finite, positive close per ticker and rows are in
/// strictly increasing date order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    tickers: Vec<String>,
    rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new(tickers: Vec<String>, rows: Vec<PriceRow>) -> Result<Self, FrontierError> {
        if tickers.is_empty() {
            return Err(FrontierError::DataLoad {
                reason: "no tickers in price table".into(),
            });
        }

        let mut seen = HashSet::new();
        for ticker in &tickers {
            if !seen.insert(ticker.as_str()) {
                return Err(FrontierError::DataLoad {
                    reason: format!("duplicate ticker {}", ticker),
                });
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.closes.len() != tickers.len() {
                return Err(FrontierError::DataLoad {
                    reason: format!(
                        "row {} has {} closes, expected {}",
                        row.date,
                        row.closes.len(),
                        tickers.len()
                    ),
                });
            }
            if let Some((ticker, close)) = tickers
                .iter()
                .zip(&row.closes)
                .find(|(_, c)| !c.is_finite() || **c <= 0.0)
            {
                return Err(FrontierError::DataLoad {
                    reason: format!("invalid close {} for {} on {}", close, ticker, row.date),
                });
            }
            if i > 0 && rows[i - 1].date >= row.date {
                return Err(FrontierError::DataLoad {
                    reason: format!("dates not strictly increasing at {}", row.date),
                });
            }
        }

        Ok(Self { tickers, rows })
    }

    /// Inner-join per-ticker series on date. Dates missing for any ticker are dropped.
    pub fn align(series: Vec<(String, Vec<(NaiveDate, f64)>)>) -> Result<Self, FrontierError> {
        let n = series.len();
        let mut by_date: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();

        for (col, (_, points)) in series.iter().enumerate() {
            for &(date, close) in points {
                by_date.entry(date).or_insert_with(|| vec![None; n])[col] = Some(close);
            }
        }

        let rows = by_date
            .into_iter()
            .filter_map(|(date, closes)| {
                closes
                    .into_iter()
                    .collect::<Option<Vec<f64>>>()
                    .map(|closes| PriceRow { date, closes })
            })
            .collect();

        let tickers = series.into_iter().map(|(ticker, _)| ticker).collect();
        Self::new(tickers, rows)
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn asset_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}
