//! CLI definition and dispatch.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart::SvgChartAdapter;
use crate::adapters::text_report::{format_report, TextReportAdapter};
use crate::domain::analysis::{
    analyse_statistics, AnalysisConfig, FrontierAnalysis, MaxSharpeMethod,
};
use crate::domain::config_validation::{
    validate_analysis_config, validate_data_config, validate_output_config,
};
use crate::domain::error::FrontierError;
use crate::domain::returns::{log_returns, AssetStatistics};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_PATH: &str = "temp.csv";
pub const DEFAULT_CHART_PATH: &str = "efficient_frontier.svg";

#[derive(Parser, Debug, Default)]
#[command(
    name = "frontier",
    about = "Mean-variance efficient frontier, GMV and max-Sharpe portfolios from closing prices"
)]
pub struct Cli {
    /// INI file with [data], [analysis] and [output] sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Price CSV (default: temp.csv)
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// Chart SVG path (default: efficient_frontier.svg)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also write the text report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Comma-separated tickers to analyse (default: every ticker in the file)
    #[arg(long, value_delimiter = ',')]
    pub tickers: Vec<String>,
    /// Number of frontier samples
    #[arg(long)]
    pub points: Option<usize>,
    #[arg(long)]
    pub risk_free_rate: Option<f64>,
    /// Use the closed-form tangency portfolio instead of the sampled search
    #[arg(long)]
    pub tangency: bool,
    /// Validate configuration and print the resolved settings without running
    #[arg(long)]
    pub dry_run: bool,
}

/// Fully resolved inputs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub data_path: PathBuf,
    pub chart_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub tickers: Vec<String>,
    pub analysis: AnalysisConfig,
}

pub fn run(cli: Cli) -> ExitCode {
    let adapter = match &cli.config {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            }
        }
        None => FileConfigAdapter::empty(),
    };

    let settings = match resolve_settings(&cli, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if cli.dry_run {
        print_settings(&settings);
        eprintln!("\nDry run complete: configuration is valid");
        return ExitCode::SUCCESS;
    }

    let price_port = CsvPriceAdapter::new(settings.data_path.clone());
    run_analysis_pipeline(&price_port, &settings)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_analysis_config(adapter: &dyn ConfigPort) -> Result<AnalysisConfig, FrontierError> {
    validate_analysis_config(adapter)?;
    let defaults = AnalysisConfig::default();

    let max_sharpe_method = match adapter.get_string("analysis", "max_sharpe_method") {
        Some(s) => s
            .parse::<MaxSharpeMethod>()
            .map_err(|reason| FrontierError::ConfigInvalid {
                section: "analysis".into(),
                key: "max_sharpe_method".into(),
                reason,
            })?,
        None => defaults.max_sharpe_method,
    };

    Ok(AnalysisConfig {
        trading_days: adapter.get_double("analysis", "trading_days", defaults.trading_days),
        frontier_points: adapter.get_int(
            "analysis",
            "frontier_points",
            defaults.frontier_points as i64,
        ) as usize,
        risk_free_rate: adapter.get_double("analysis", "risk_free_rate", defaults.risk_free_rate),
        max_sharpe_method,
    })
}

/// Merges flags over the INI file over built-in defaults.
pub fn resolve_settings(cli: &Cli, adapter: &dyn ConfigPort) -> Result<RunSettings, FrontierError> {
    validate_data_config(adapter)?;
    validate_output_config(adapter)?;
    let mut analysis = build_analysis_config(adapter)?;

    if let Some(points) = cli.points {
        if points == 0 {
            return Err(FrontierError::InvalidParameter {
                name: "points".into(),
                reason: "must be at least 1".into(),
            });
        }
        analysis.frontier_points = points;
    }
    if let Some(rf) = cli.risk_free_rate {
        if !rf.is_finite() || rf <= -1.0 || rf >= 1.0 {
            return Err(FrontierError::InvalidParameter {
                name: "risk-free-rate".into(),
                reason: "must be between -1 and 1".into(),
            });
        }
        analysis.risk_free_rate = rf;
    }
    if cli.tangency {
        analysis.max_sharpe_method = MaxSharpeMethod::Tangency;
    }

    let data_path = cli
        .data
        .clone()
        .or_else(|| adapter.get_string("data", "path").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    let chart_path = cli
        .output
        .clone()
        .or_else(|| adapter.get_string("output", "chart_path").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHART_PATH));
    let report_path = cli.report.clone().or_else(|| {
        adapter
            .get_string("output", "report_path")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    });

    let tickers = resolve_tickers(&cli.tickers, adapter);

    Ok(RunSettings {
        data_path,
        chart_path,
        report_path,
        tickers,
        analysis,
    })
}

pub fn resolve_tickers(overrides: &[String], config: &dyn ConfigPort) -> Vec<String> {
    let from_flags: Vec<String> = overrides
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !from_flags.is_empty() {
        return from_flags;
    }
    config.get_list("data", "tickers").unwrap_or_default()
}

fn print_settings(settings: &RunSettings) {
    eprintln!("Settings:");
    eprintln!("  data:              {}", settings.data_path.display());
    eprintln!("  chart:             {}", settings.chart_path.display());
    if let Some(report) = &settings.report_path {
        eprintln!("  report:            {}", report.display());
    }
    if settings.tickers.is_empty() {
        eprintln!("  tickers:           (all in file)");
    } else {
        eprintln!("  tickers:           {}", settings.tickers.join(", "));
    }
    eprintln!("  trading days:      {}", settings.analysis.trading_days);
    eprintln!("  frontier points:   {}", settings.analysis.frontier_points);
    eprintln!("  risk-free rate:    {}", settings.analysis.risk_free_rate);
    eprintln!("  max Sharpe method: {}", settings.analysis.max_sharpe_method);
}

/// Loads prices, analyses them and writes every artifact.
///
/// Nothing is written unless the whole analysis succeeds.
pub fn execute(
    price_port: &dyn PricePort,
    settings: &RunSettings,
) -> Result<FrontierAnalysis, FrontierError> {
    // Stage 1: Load aligned closes
    let prices = price_port.load_close_prices(&settings.tickers)?;
    match (prices.first_date(), prices.last_date()) {
        (Some(first), Some(last)) => eprintln!(
            "Loaded {} rows for {} tickers, {} to {}",
            prices.row_count(),
            prices.asset_count(),
            first,
            last
        ),
        _ => eprintln!("Loaded 0 rows for {} tickers", prices.asset_count()),
    }

    // Stage 2: Returns and annualised statistics
    let returns = log_returns(&prices)?;
    let statistics = AssetStatistics::estimate(&returns, settings.analysis.trading_days)?;
    eprintln!(
        "Estimating statistics: {} assets, {} returns",
        statistics.asset_count(),
        returns.len()
    );

    // Stage 3: Frontier and portfolios
    eprintln!(
        "Solving frontier: {} points, risk-free rate {}, {} max Sharpe",
        settings.analysis.frontier_points,
        settings.analysis.risk_free_rate,
        settings.analysis.max_sharpe_method
    );
    let analysis = analyse_statistics(statistics, returns.len(), &settings.analysis)?;

    // Stage 4: Write artifacts
    SvgChartAdapter::new().write(&analysis, &settings.chart_path)?;

    if let Some(report_path) = &settings.report_path {
        if let Err(err) = TextReportAdapter::new().write(&analysis, report_path) {
            // Chart and report are written together or not at all.
            if let Err(cleanup) = fs::remove_file(&settings.chart_path) {
                eprintln!(
                    "warning: could not remove {}: {cleanup}",
                    settings.chart_path.display()
                );
            }
            return Err(err);
        }
        eprintln!("Report written to: {}", report_path.display());
    }
    eprintln!("Chart written to: {}", settings.chart_path.display());

    Ok(analysis)
}

pub fn run_analysis_pipeline(price_port: &dyn PricePort, settings: &RunSettings) -> ExitCode {
    eprintln!("Loading prices from {}", settings.data_path.display());
    match execute(price_port, settings) {
        Ok(analysis) => {
            print!("{}", format_report(&analysis));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
