//! Plain-text summary of an analysis.

use crate::domain::analysis::FrontierAnalysis;
use crate::domain::error::FrontierError;
use crate::domain::selectors::Portfolio;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

fn push_percentages(out: &mut String, heading: &str, tickers: &[String], values: &[f64]) {
    out.push_str(heading);
    out.push('\n');
    for (ticker, value) in tickers.iter().zip(values) {
        out.push_str(&format!("  {}: {:.2}%\n", ticker, value * 100.0));
    }
}

fn push_portfolio(out: &mut String, heading: &str, tickers: &[String], portfolio: &Portfolio) {
    push_percentages(out, heading, tickers, &portfolio.weights);
    out.push_str(&format!(
        "  Return: {:.2}%  Volatility: {:.2}%\n",
        portfolio.expected_return * 100.0,
        portfolio.volatility * 100.0
    ));
}

pub fn format_report(analysis: &FrontierAnalysis) -> String {
    let tickers = analysis.tickers();
    let mut out = String::new();

    push_percentages(
        &mut out,
        "Annualised mean returns:",
        tickers,
        analysis.statistics.mu(),
    );
    push_percentages(
        &mut out,
        "Annualised volatilities:",
        tickers,
        &analysis.asset_volatilities(),
    );
    push_portfolio(
        &mut out,
        "Global minimum variance portfolio:",
        tickers,
        &analysis.gmv,
    );
    push_portfolio(
        &mut out,
        "Maximum Sharpe portfolio:",
        tickers,
        &analysis.max_sharpe,
    );

    out
}

/// Writes [`format_report`] output to a file.
#[derive(Debug, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, analysis: &FrontierAnalysis, output_path: &Path) -> Result<(), FrontierError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, format_report(analysis))?;
        Ok(())
    }
}
