//! Performance metrics for periodic return streams.
//!
//! All metrics operate on monthly returns and annualize with a factor of
//! 12. Undefined quantities are `NaN`, never zero: an empty series has no
//! annualized return, and a flat series has no Sharpe ratio.

use serde::{Deserialize, Serialize};

use cadiz_traits::ReturnSeries;

/// Configuration for metrics calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Return periods per year (default: 12, monthly).
    pub periods_per_year: f64,
    /// Annualized risk-free rate used by Sharpe and Sortino
    /// (default: 0.02).
    pub risk_free_rate: f64,
    /// Minimum observations for a strategy to appear in a summary
    /// (default: 12, one year of monthly data).
    pub min_observations: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 12.0,
            risk_free_rate: 0.02,
            min_observations: 12,
        }
    }
}

/// The standard performance profile of one return stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Geometric annualized return.
    pub annualized_return: f64,
    /// Annualized standard deviation of returns.
    pub annualized_volatility: f64,
    /// Excess return per unit of volatility.
    pub sharpe_ratio: f64,
    /// Excess return per unit of downside volatility.
    pub sortino_ratio: f64,
    /// Worst peak-to-trough drawdown of the cumulative curve, `<= 0`.
    pub max_drawdown: f64,
    /// Fraction of strictly positive periods.
    pub win_rate: f64,
    /// Number of non-missing observations.
    pub n_obs: usize,
}

impl PerformanceMetrics {
    /// Computes the full metrics profile for a return series.
    ///
    /// Missing observations are dropped first; every metric then applies
    /// its own minimum-data rule.
    #[must_use]
    pub fn calculate(series: &ReturnSeries, config: &MetricsConfig) -> Self {
        let clean = series.dropna();
        let values = clean.values();
        Self {
            annualized_return: annualized_return(values, config.periods_per_year),
            annualized_volatility: annualized_volatility(values, config.periods_per_year),
            sharpe_ratio: sharpe_ratio(values, config),
            sortino_ratio: sortino_ratio(values, config),
            max_drawdown: max_drawdown(values),
            win_rate: win_rate(values),
            n_obs: values.len(),
        }
    }
}

/// Geometric annualized return: `(1 + mean)^periods - 1`.
#[must_use]
pub fn annualized_return(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.is_empty() {
        return f64::NAN;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    (1.0 + mean).powf(periods_per_year) - 1.0
}

/// Annualized sample volatility: `std * sqrt(periods)`.
#[must_use]
pub fn annualized_volatility(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return f64::NAN;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
        / (returns.len() - 1) as f64;
    var.sqrt() * periods_per_year.sqrt()
}

/// Sharpe ratio against the configured risk-free rate.
#[must_use]
pub fn sharpe_ratio(returns: &[f64], config: &MetricsConfig) -> f64 {
    let ann_ret = annualized_return(returns, config.periods_per_year);
    let ann_vol = annualized_volatility(returns, config.periods_per_year);
    if !ann_vol.is_finite() || ann_vol <= 0.0 {
        return f64::NAN;
    }
    (ann_ret - config.risk_free_rate) / ann_vol
}

/// Sortino ratio: excess return over annualized downside deviation.
///
/// Requires at least two negative periods; otherwise the downside
/// deviation is not estimable and the ratio is `NaN`.
#[must_use]
pub fn sortino_ratio(returns: &[f64], config: &MetricsConfig) -> f64 {
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if downside.len() < 2 {
        return f64::NAN;
    }
    let mean = downside.iter().sum::<f64>() / downside.len() as f64;
    let var = downside.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
        / (downside.len() - 1) as f64;
    let downside_vol = var.sqrt() * config.periods_per_year.sqrt();
    if downside_vol <= 0.0 {
        return f64::NAN;
    }
    let ann_ret = annualized_return(returns, config.periods_per_year);
    (ann_ret - config.risk_free_rate) / downside_vol
}

/// Worst peak-to-trough drawdown of the compounded return curve.
///
/// Zero for a series that never declines; `NaN` when empty.
#[must_use]
pub fn max_drawdown(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return f64::NAN;
    }
    let mut cumulative = 1.0;
    let mut peak = 1.0;
    let mut worst = 0.0_f64;
    for r in returns {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = cumulative / peak - 1.0;
        if drawdown < worst {
            worst = drawdown;
        }
    }
    worst
}

/// Fraction of strictly positive periods; `NaN` when empty.
#[must_use]
pub fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return f64::NAN;
    }
    returns.iter().filter(|r| **r > 0.0).count() as f64 / returns.len() as f64
}
