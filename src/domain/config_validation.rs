//! Configuration validation.
//!
//! Validates all config fields before the analysis runs.

use crate::domain::analysis::MaxSharpeMethod;
use crate::domain::error::FrontierError;
use crate::ports::config_port::ConfigPort;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    validate_trading_days(config)?;
    validate_frontier_points(config)?;
    validate_risk_free_rate(config)?;
    validate_max_sharpe_method(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    validate_non_blank(config, "data", "path")?;
    validate_tickers(config)?;
    Ok(())
}

pub fn validate_output_config(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    validate_non_blank(config, "output", "chart_path")?;
    Ok(())
}

fn validate_trading_days(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    let value = config.get_double("analysis", "trading_days", 252.0);
    if !value.is_finite() || value < 1.0 {
        return Err(FrontierError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "trading_days".to_string(),
            reason: "trading_days must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_frontier_points(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    let value = config.get_int("analysis", "frontier_points", 60);
    if value < 1 {
        return Err(FrontierError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "frontier_points".to_string(),
            reason: "frontier_points must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    let value = config.get_double("analysis", "risk_free_rate", 0.0);
    if !value.is_finite() || value <= -1.0 || value >= 1.0 {
        return Err(FrontierError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be between -1 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_max_sharpe_method(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    if let Some(method) = config.get_string("analysis", "max_sharpe_method") {
        method
            .parse::<MaxSharpeMethod>()
            .map_err(|reason| FrontierError::ConfigInvalid {
                section: "analysis".to_string(),
                key: "max_sharpe_method".to_string(),
                reason,
            })?;
    }
    Ok(())
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    if let Some(tickers) = config.get_list("data", "tickers") {
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = tickers.iter().find(|t| !seen.insert(t.to_uppercase())) {
            return Err(FrontierError::ConfigInvalid {
                section: "data".to_string(),
                key: "tickers".to_string(),
                reason: format!("duplicate ticker {}", dup),
            });
        }
    }
    Ok(())
}

/// A present key must not be blank; an absent key falls back to its default.
fn validate_non_blank(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), FrontierError> {
    match config.get_string(section, key) {
        Some(s) if s.trim().is_empty() => Err(FrontierError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must not be empty", key),
        }),
        _ => Ok(()),
    }
}
