//! CSV close-price adapter.
//!
//! Two layouts are understood:
//!
//! * the three-row multi-index header written by market-data downloaders
//!   (`Price,Close,...,High,...` / `Ticker,AAPL,...` / `Date,,...`), from
//!   which only the `Close` columns are read;
//! * a flat wide table, `Date,<ticker>,<ticker>,...`, of closes.
//!
//! Cells that are empty or not numeric count as missing, as do non-positive
//! closes. Any date missing a close for a selected ticker is dropped.

use crate::domain::error::FrontierError;
use crate::domain::price_table::PriceTable;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    path: PathBuf,
}

/// Ticker name and its column index in the file.
struct CloseColumn {
    ticker: String,
    index: usize,
}

impl CsvPriceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_records(&self) -> Result<Vec<StringRecord>, FrontierError> {
        let content = fs::read_to_string(&self.path).map_err(|e| FrontierError::DataLoad {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        rdr.records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| FrontierError::DataLoad {
                reason: format!("CSV parse error: {}", e),
            })
    }
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("").trim()
}

/// Returns the close columns and the number of header rows.
fn parse_header(records: &[StringRecord]) -> Result<(Vec<CloseColumn>, usize), FrontierError> {
    let first = records.first().ok_or_else(|| FrontierError::DataLoad {
        reason: "empty price file".into(),
    })?;

    if cell(first, 0).eq_ignore_ascii_case("price") {
        let tickers = records.get(1).ok_or_else(|| FrontierError::DataLoad {
            reason: "missing ticker header row".into(),
        })?;
        if !cell(tickers, 0).eq_ignore_ascii_case("ticker") {
            return Err(FrontierError::DataLoad {
                reason: format!("expected 'Ticker' header row, found '{}'", cell(tickers, 0)),
            });
        }
        let date_row = records.get(2).ok_or_else(|| FrontierError::DataLoad {
            reason: "missing date header row".into(),
        })?;
        if !cell(date_row, 0).eq_ignore_ascii_case("date") {
            return Err(FrontierError::DataLoad {
                reason: format!("expected 'Date' header row, found '{}'", cell(date_row, 0)),
            });
        }

        let columns: Vec<CloseColumn> = (1..first.len())
            .filter(|&i| cell(first, i).eq_ignore_ascii_case("close"))
            .map(|index| CloseColumn {
                ticker: cell(tickers, index).to_string(),
                index,
            })
            .collect();
        if columns.is_empty() {
            return Err(FrontierError::DataLoad {
                reason: "no Close columns in header".into(),
            });
        }
        Ok((columns, 3))
    } else if cell(first, 0).eq_ignore_ascii_case("date") {
        let columns: Vec<CloseColumn> = (1..first.len())
            .map(|index| CloseColumn {
                ticker: cell(first, index).to_string(),
                index,
            })
            .collect();
        if columns.is_empty() {
            return Err(FrontierError::DataLoad {
                reason: "no ticker columns in header".into(),
            });
        }
        Ok((columns, 1))
    } else {
        Err(FrontierError::DataLoad {
            reason: format!("unrecognised header starting with '{}'", cell(first, 0)),
        })
    }
}

fn select_columns(
    columns: Vec<CloseColumn>,
    tickers: &[String],
) -> Result<Vec<CloseColumn>, FrontierError> {
    if let Some(blank) = columns.iter().find(|c| c.ticker.is_empty()) {
        return Err(FrontierError::DataLoad {
            reason: format!("column {} has no ticker name", blank.index + 1),
        });
    }

    if tickers.is_empty() {
        return Ok(columns);
    }

    tickers
        .iter()
        .map(|wanted| {
            columns
                .iter()
                .find(|c| c.ticker.eq_ignore_ascii_case(wanted))
                .map(|c| CloseColumn {
                    ticker: c.ticker.clone(),
                    index: c.index,
                })
                .ok_or_else(|| FrontierError::DataLoad {
                    reason: format!("ticker {} not found in price file", wanted),
                })
        })
        .collect()
}

fn parse_date(value: &str) -> Result<NaiveDate, FrontierError> {
    // Timestamps such as "2024-01-02 00:00:00+00:00" keep only the date part.
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| FrontierError::DataLoad {
        reason: format!("invalid date '{}': {}", value, e),
    })
}

fn parse_close(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

impl PricePort for CsvPriceAdapter {
    fn load_close_prices(&self, tickers: &[String]) -> Result<PriceTable, FrontierError> {
        let records = self.read_records()?;
        let (columns, header_rows) = parse_header(&records)?;
        let columns = select_columns(columns, tickers)?;

        let mut series: Vec<(String, Vec<(NaiveDate, f64)>)> = columns
            .iter()
            .map(|c| (c.ticker.clone(), Vec::new()))
            .collect();
        let mut seen_dates = HashSet::new();

        for record in &records[header_rows..] {
            let date_str = cell(record, 0);
            if date_str.is_empty() {
                continue;
            }
            let date = parse_date(date_str)?;
            if !seen_dates.insert(date) {
                return Err(FrontierError::DataLoad {
                    reason: format!("duplicate date {}", date),
                });
            }

            for (column, (_, points)) in columns.iter().zip(series.iter_mut()) {
                if let Some(close) = parse_close(cell(record, column.index)) {
                    points.push((date, close));
                }
            }
        }

        PriceTable::align(series)
    }
}
