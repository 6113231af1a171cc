#![allow(dead_code)]

use chrono::NaiveDate;
use frontier::domain::error::FrontierError;
use frontier::domain::price_table::{PriceRow, PriceTable};
use frontier::domain::returns::AssetStatistics;
use frontier::ports::price_port::PricePort;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

pub struct MockPricePort {
    pub table: Option<PriceTable>,
    pub error: Option<String>,
    pub requested: RefCell<Vec<Vec<String>>>,
}

impl MockPricePort {
    pub fn with_table(table: PriceTable) -> Self {
        Self {
            table: Some(table),
            error: None,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            table: None,
            error: Some(reason.to_string()),
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl PricePort for MockPricePort {
    fn load_close_prices(&self, tickers: &[String]) -> Result<PriceTable, FrontierError> {
        self.requested.borrow_mut().push(tickers.to_vec());
        if let Some(reason) = &self.error {
            return Err(FrontierError::DataLoad {
                reason: reason.clone(),
            });
        }
        Ok(self.table.clone().expect("mock configured without table"))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn tickers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// The reference three-asset problem: mu = [8%, 12%, 5%], diagonal-dominant cov.
pub fn reference_statistics() -> AssetStatistics {
    AssetStatistics::from_parts(
        tickers(&["005930.KS", "AAPL", "NVDA"]),
        vec![0.08, 0.12, 0.05],
        vec![
            vec![0.04, 0.006, 0.002],
            vec![0.006, 0.09, 0.003],
            vec![0.002, 0.003, 0.01],
        ],
    )
    .unwrap()
}

/// Deterministic, non-collinear daily closes for `names`.
pub fn generate_prices(names: &[&str], days: usize) -> PriceTable {
    let start = date(2023, 1, 2);
    let mut closes: Vec<f64> = (0..names.len()).map(|i| 100.0 + 50.0 * i as f64).collect();
    let mut rows = Vec::with_capacity(days);

    for t in 0..days {
        if t > 0 {
            for (i, close) in closes.iter_mut().enumerate() {
                let k = (i + 1) as f64;
                let shock = 0.012 * (t as f64 * 0.7 * k + k).sin()
                    + 0.008 * (t as f64 * 0.31 * (k + 1.0)).cos();
                *close *= (0.0004 * k + shock).exp();
            }
        }
        rows.push(PriceRow {
            date: start + chrono::Duration::days(t as i64),
            closes: closes.clone(),
        });
    }

    PriceTable::new(tickers(names), rows).unwrap()
}

/// Writes `table` in the three-row multi-index layout with Close and Volume columns.
pub fn write_multi_index_csv(dir: &Path, table: &PriceTable) -> PathBuf {
    let names = table.tickers();
    let mut out = String::new();

    out.push_str("Price");
    for _ in names {
        out.push_str(",Close");
    }
    for _ in names {
        out.push_str(",Volume");
    }
    out.push_str("\nTicker");
    for name in names.iter().chain(names) {
        out.push(',');
        out.push_str(name);
    }
    out.push_str("\nDate");
    for _ in 0..names.len() * 2 {
        out.push(',');
    }
    out.push('\n');

    for row in table.rows() {
        out.push_str(&row.date.format("%Y-%m-%d").to_string());
        for close in &row.closes {
            out.push_str(&format!(",{}", close));
        }
        for _ in names {
            out.push_str(",1000");
        }
        out.push('\n');
    }

    let path = dir.join("temp.csv");
    fs::write(&path, out).unwrap();
    path
}
