//! Performance summary tables across strategies.

use std::fmt;

use serde::{Deserialize, Serialize};

use cadiz_traits::{Result, ReturnSeries};

use crate::metrics::{MetricsConfig, PerformanceMetrics};

/// One strategy's line in a performance summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Strategy name.
    pub name: String,

    /// The full metrics profile.
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
}

/// A comparable performance table across strategies.
///
/// Strategies with fewer than the configured minimum of non-missing
/// observations are excluded entirely: eleven months of history is not a
/// track record, and a row of accidental statistics reads as one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    rows: Vec<SummaryRow>,
    /// Strategies dropped for insufficient history.
    pub excluded: Vec<String>,
}

impl PerformanceSummary {
    /// Builds the summary from a set of return series.
    pub fn from_returns(series: &[&ReturnSeries], config: &MetricsConfig) -> Self {
        let mut rows = Vec::new();
        let mut excluded = Vec::new();
        for s in series {
            let clean = s.dropna();
            if clean.len() < config.min_observations {
                excluded.push(s.name().to_string());
                continue;
            }
            rows.push(SummaryRow {
                name: s.name().to_string(),
                metrics: PerformanceMetrics::calculate(s, config),
            });
        }
        Self { rows, excluded }
    }

    /// The included rows, in input order.
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    /// Looks up a row by strategy name.
    pub fn row(&self, name: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    /// Renders a fixed-width ASCII table.
    #[must_use]
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{:<20} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>6}\n",
            "Strategy", "AnnRet", "AnnVol", "Sharpe", "Sortino", "MaxDD", "WinRate", "Obs"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');
        for row in &self.rows {
            let m = &row.metrics;
            output.push_str(&format!(
                "{:<20} {:>7.2}% {:>7.2}% {:>8.2} {:>8.2} {:>7.2}% {:>7.1}% {:>6}\n",
                row.name,
                m.annualized_return * 100.0,
                m.annualized_volatility * 100.0,
                m.sharpe_ratio,
                m.sortino_ratio,
                m.max_drawdown * 100.0,
                m.win_rate * 100.0,
                m.n_obs,
            ));
        }
        for name in &self.excluded {
            output.push_str(&format!("{name:<20} excluded: fewer than required observations\n"));
        }
        output
    }

    /// Serializes the table as CSV, one row per strategy.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "strategy",
                "annualized_return",
                "annualized_volatility",
                "sharpe_ratio",
                "sortino_ratio",
                "max_drawdown",
                "win_rate",
                "n_obs",
            ])
            .map_err(|e| cadiz_traits::CadizError::Other(e.to_string()))?;
        for row in &self.rows {
            let m = &row.metrics;
            writer
                .write_record([
                    row.name.clone(),
                    m.annualized_return.to_string(),
                    m.annualized_volatility.to_string(),
                    m.sharpe_ratio.to_string(),
                    m.sortino_ratio.to_string(),
                    m.max_drawdown.to_string(),
                    m.win_rate.to_string(),
                    m.n_obs.to_string(),
                ])
                .map_err(|e| cadiz_traits::CadizError::Other(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| cadiz_traits::CadizError::Other(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| cadiz_traits::CadizError::Other(e.to_string()))
    }
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii_table())
    }
}
