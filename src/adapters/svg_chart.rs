//! SVG chart of the efficient frontier, the assets and the selected portfolios.

use crate::domain::analysis::FrontierAnalysis;
use crate::domain::error::FrontierError;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 5;

const FRONTIER_COLOUR: &str = "#1f77b4";
const ASSET_COLOUR: &str = "#d62728";
const GMV_COLOUR: &str = "#ff7f0e";
const MAX_SHARPE_COLOUR: &str = "#2ca02c";

/// Maps data coordinates onto the plot area.
struct Scale {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Scale {
    fn fit(xs: &[f64], ys: &[f64]) -> Self {
        let (x_min, x_max) = padded_range(xs);
        let (y_min, y_max) = padded_range(ys);
        Self { x_min, x_max, y_min, y_max }
    }

    fn x(&self, v: f64) -> f64 {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (v - self.x_min) / (self.x_max - self.x_min) * plot_width
    }

    fn y(&self, v: f64) -> f64 {
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        HEIGHT - MARGIN_BOTTOM - (v - self.y_min) / (self.y_max - self.y_min) * plot_height
    }
}

fn padded_range(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let range = hi - lo;
    let pad = if range > 0.0 { range * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - pad, hi + pad)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// "A", "A and B", "A, B, and C"
pub fn chart_title(tickers: &[String]) -> String {
    let list = match tickers {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    };
    format!("Efficient frontier for {}", list)
}

fn marker(
    svg: &mut Vec<String>,
    (x, y): (f64, f64),
    radius: f64,
    colour: &str,
    label: &str,
    (dx, dy): (f64, f64),
) {
    svg.push(format!(
        r#"  <circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
        x, y, radius, colour
    ));
    svg.push(format!(
        r#"  <text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
        x + dx,
        y + dy,
        escape(label)
    ));
}

pub fn render_frontier_svg(analysis: &FrontierAnalysis) -> String {
    let frontier = &analysis.frontier.points;
    let tickers = analysis.tickers();
    let asset_returns = analysis.statistics.mu();
    let asset_vols = analysis.asset_volatilities();
    let gmv = &analysis.gmv;
    let ms = &analysis.max_sharpe;

    let xs: Vec<f64> = frontier
        .iter()
        .map(|p| p.volatility)
        .chain(asset_vols.iter().copied())
        .chain([gmv.volatility, ms.volatility])
        .collect();
    let ys: Vec<f64> = frontier
        .iter()
        .map(|p| p.target_return)
        .chain(asset_returns.iter().copied())
        .chain([gmv.expected_return, ms.expected_return])
        .collect();
    let scale = Scale::fit(&xs, &ys);

    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let mut svg: Vec<String> = Vec::new();
    svg.push(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push(r#"  <rect width="100%" height="100%" fill="white"/>"#.to_string());
    svg.push(format!(
        r#"  <text x="{:.1}" y="{:.1}" font-size="16" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        top / 2.0 + 6.0,
        escape(&chart_title(tickers))
    ));

    // Grid and tick labels
    for i in 0..=TICKS {
        let frac = i as f64 / TICKS as f64;
        let xv = scale.x_min + frac * (scale.x_max - scale.x_min);
        let yv = scale.y_min + frac * (scale.y_max - scale.y_min);
        let x = scale.x(xv);
        let y = scale.y(yv);
        svg.push(format!(
            r##"  <line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#cccccc" stroke-width="0.5" stroke-dasharray="4 3"/>"##
        ));
        svg.push(format!(
            r##"  <line x1="{left:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#cccccc" stroke-width="0.5" stroke-dasharray="4 3"/>"##
        ));
        svg.push(format!(
            r#"  <text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{:.3}</text>"#,
            x,
            bottom + 18.0,
            xv
        ));
        svg.push(format!(
            r#"  <text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{:.3}</text>"#,
            left - 8.0,
            y + 4.0,
            yv
        ));
    }

    // Axes
    svg.push(format!(
        r#"  <line x1="{left:.1}" y1="{bottom:.1}" x2="{right:.1}" y2="{bottom:.1}" stroke="black"/>"#
    ));
    svg.push(format!(
        r#"  <line x1="{left:.1}" y1="{top:.1}" x2="{left:.1}" y2="{bottom:.1}" stroke="black"/>"#
    ));
    svg.push(format!(
        r#"  <text x="{:.1}" y="{:.1}" font-size="13" text-anchor="middle">Annualised volatility</text>"#,
        (left + right) / 2.0,
        HEIGHT - 15.0
    ));
    let mid = (top + bottom) / 2.0;
    svg.push(format!(
        r#"  <text x="20" y="{mid:.1}" font-size="13" text-anchor="middle" transform="rotate(-90 20 {mid:.1})">Annualised return</text>"#
    ));

    let points: Vec<String> = frontier
        .iter()
        .map(|p| format!("{:.1},{:.1}", scale.x(p.volatility), scale.y(p.target_return)))
        .collect();
    svg.push(format!(
        r#"  <polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
        FRONTIER_COLOUR,
        points.join(" ")
    ));

    for ((ticker, &ret), &vol) in tickers.iter().zip(asset_returns).zip(&asset_vols) {
        marker(
            &mut svg,
            (scale.x(vol), scale.y(ret)),
            5.0,
            ASSET_COLOUR,
            ticker,
            (8.0, 12.0),
        );
    }
    marker(
        &mut svg,
        (scale.x(gmv.volatility), scale.y(gmv.expected_return)),
        6.0,
        GMV_COLOUR,
        "GMV",
        (10.0, 15.0),
    );
    marker(
        &mut svg,
        (scale.x(ms.volatility), scale.y(ms.expected_return)),
        6.0,
        MAX_SHARPE_COLOUR,
        "Max Sharpe",
        (10.0, -10.0),
    );

    // Legend
    let legend = [
        (FRONTIER_COLOUR, "Efficient frontier"),
        (ASSET_COLOUR, "Assets"),
        (GMV_COLOUR, "Global min variance"),
        (MAX_SHARPE_COLOUR, "Max Sharpe"),
    ];
    let lx = left + 15.0;
    let ly = top + 10.0;
    svg.push(format!(
        r##"  <rect x="{lx:.1}" y="{ly:.1}" width="170" height="{:.1}" fill="white" stroke="#999999" stroke-width="0.5"/>"##,
        legend.len() as f64 * 20.0 + 10.0
    ));
    for (i, (colour, label)) in legend.iter().enumerate() {
        let y = ly + 18.0 + i as f64 * 20.0;
        svg.push(format!(
            r#"  <circle cx="{:.1}" cy="{:.1}" r="5" fill="{}"/>"#,
            lx + 14.0,
            y - 4.0,
            colour
        ));
        svg.push(format!(
            r#"  <text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
            lx + 26.0,
            y,
            label
        ));
    }

    svg.push("</svg>".to_string());
    let mut out = svg.join("\n");
    out.push('\n');
    out
}

/// Writes the frontier chart as a standalone SVG file.
#[derive(Debug, Default)]
pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for SvgChartAdapter {
    fn write(&self, analysis: &FrontierAnalysis, output_path: &Path) -> Result<(), FrontierError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, render_frontier_svg(analysis))?;
        Ok(())
    }
}
