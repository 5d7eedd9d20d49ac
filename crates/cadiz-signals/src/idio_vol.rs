//! Idiosyncratic volatility signal from a rolling market model.

use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use cadiz_data::UniverseData;
use cadiz_traits::{stats, CadizError, Result};

use crate::registry::SignalCategory;
use crate::signal::{FactorSignal, SignalOutput};
use crate::volatility::TRADING_DAYS_PER_YEAR;

/// Configuration for the idiosyncratic volatility signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdioVolatilityConfig {
    /// Rolling regression window in trading days (default: 63).
    pub window: usize,

    /// Minimum fraction of the window that must have both an asset and a
    /// market return for the regression to run (default: 0.8).
    pub min_valid_fraction: f64,

    /// Whether to negate the score so low idiosyncratic risk ranks high
    /// (default: true).
    pub invert: bool,
}

impl Default for IdioVolatilityConfig {
    fn default() -> Self {
        Self {
            window: 63,
            min_valid_fraction: 0.8,
            invert: true,
        }
    }
}

/// Firm-specific volatility: residual risk after removing market exposure.
///
/// For each asset and each day, daily returns over the trailing window are
/// regressed on market returns by ordinary least squares. The score is the
/// annualized sample standard deviation of the residuals. Windows with too
/// few valid (asset, market) pairs are missing. Columns are independent,
/// so the regression runs in parallel across assets.
#[derive(Debug, Clone, Default)]
pub struct IdioVolatility {
    config: IdioVolatilityConfig,
}

impl IdioVolatility {
    /// Create a new idiosyncratic volatility signal with the given
    /// configuration.
    #[must_use]
    pub const fn new(config: IdioVolatilityConfig) -> Self {
        Self { config }
    }

    /// The regression window length in trading days.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.config.window
    }

    fn min_valid_count(&self) -> usize {
        let from_fraction =
            (self.config.min_valid_fraction * self.config.window as f64).ceil() as usize;
        // An OLS line through fewer than three points has no residual risk.
        from_fraction.max(3)
    }
}

/// Residual standard deviation of an OLS fit of `asset` on `market`.
///
/// Returns `None` when the market leg is degenerate.
fn residual_std(market: &[f64], asset: &[f64]) -> Option<f64> {
    let n = market.len();
    if n < 3 {
        return None;
    }
    let mean_x = market.iter().sum::<f64>() / n as f64;
    let mean_y = asset.iter().sum::<f64>() / n as f64;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (x, y) in market.iter().zip(asset.iter()) {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
    }
    if var_x <= stats::MIN_STD_THRESHOLD {
        return None;
    }
    let beta = cov / var_x;
    let alpha = mean_y - beta * mean_x;

    let mut ss = 0.0;
    let mut sum = 0.0;
    let residuals: Vec<f64> = market
        .iter()
        .zip(asset.iter())
        .map(|(x, y)| y - (alpha + beta * x))
        .collect();
    for r in &residuals {
        sum += r;
    }
    let mean_r = sum / n as f64;
    for r in &residuals {
        ss += (r - mean_r).powi(2);
    }
    Some((ss / (n - 1) as f64).sqrt())
}

impl FactorSignal for IdioVolatility {
    fn name(&self) -> &str {
        "idio_volatility"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Volatility
    }

    fn compute(&self, universe: &UniverseData) -> Result<SignalOutput> {
        if universe.market_returns.is_empty() {
            return Err(CadizError::InsufficientData(
                "idio_volatility requires market returns".to_string(),
            ));
        }
        let returns = universe.daily_prices.pct_change(1);
        let market: Vec<f64> = returns
            .dates()
            .iter()
            .map(|d| universe.market_returns.get(*d).unwrap_or(f64::NAN))
            .collect();

        let window = self.config.window;
        let min_valid = self.min_valid_count();
        let n = returns.num_dates();
        let annualize = TRADING_DAYS_PER_YEAR.sqrt();

        let mut out = Array2::from_elem((n, returns.num_assets()), f64::NAN);
        out.axis_iter_mut(Axis(1))
            .into_par_iter()
            .enumerate()
            .for_each(|(j, mut col)| {
                let asset_returns = returns.column(j);
                for t in 0..n {
                    if t + 1 < window {
                        continue;
                    }
                    let start = t + 1 - window;
                    let mut xs = Vec::with_capacity(window);
                    let mut ys = Vec::with_capacity(window);
                    for r in start..=t {
                        let x = market[r];
                        let y = asset_returns[r];
                        if x.is_finite() && y.is_finite() {
                            xs.push(x);
                            ys.push(y);
                        }
                    }
                    if xs.len() < min_valid {
                        continue;
                    }
                    if let Some(sigma) = residual_std(&xs, &ys) {
                        col[t] = sigma * annualize;
                    }
                }
            });

        let daily_panel = returns.with_values(out)?;
        let monthly = daily_panel.resample_month_end();
        let signed = if self.config.invert {
            monthly.map(|v| -v)
        } else {
            monthly
        };
        Ok(SignalOutput::clean(stats::normalize(&signed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cadiz_traits::{Panel, ReturnSeries};
    use chrono::{Duration, NaiveDate};
    use ndarray::Array2;
    use std::collections::HashMap;

    fn daily_dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n).map(|i| start + Duration::days(i as i64)).collect()
    }

    #[test]
    fn test_residual_std_perfect_fit() {
        // Asset is exactly 1.5x the market: residuals vanish
        let market = [0.01, -0.02, 0.015, 0.005, -0.01];
        let asset: Vec<f64> = market.iter().map(|x| 1.5 * x + 0.001).collect();
        let sigma = residual_std(&market, &asset).unwrap();
        assert_relative_eq!(sigma, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_residual_std_degenerate_market() {
        let market = [0.01, 0.01, 0.01, 0.01];
        let asset = [0.02, -0.01, 0.03, 0.0];
        assert!(residual_std(&market, &asset).is_none());
    }

    #[test]
    fn test_compute_requires_market_returns() {
        let panel = Panel::filled(daily_dates(3), vec!["AAA".to_string()], 100.0).unwrap();
        let u = UniverseData {
            daily_prices: panel.clone(),
            monthly_prices: panel.clone(),
            earnings: panel,
            income_statements: HashMap::new(),
            balance_sheets: HashMap::new(),
            market_returns: ReturnSeries::empty("market"),
        };
        let result = IdioVolatility::default().compute(&u);
        assert!(matches!(result, Err(CadizError::InsufficientData(_))));
    }

    #[test]
    fn test_tracker_scores_above_noisy_when_inverted() {
        let n = 130;
        let dates = daily_dates(n);

        // Market path and returns
        let mut market_prices = vec![100.0];
        for t in 1..n {
            let swing = if t % 2 == 0 { 1.004 } else { 0.997 };
            market_prices.push(market_prices[t - 1] * swing);
        }
        let market_returns: Vec<f64> = (1..n)
            .map(|t| market_prices[t] / market_prices[t - 1] - 1.0)
            .collect();
        let market = ReturnSeries::new("market", dates[1..].to_vec(), market_returns).unwrap();

        // TRACK follows the market exactly, NOISY adds its own swings
        let assets = vec!["TRACK".to_string(), "NOISY".to_string(), "MID".to_string()];
        let mut values = Array2::from_elem((n, 3), f64::NAN);
        for t in 0..n {
            values[(t, 0)] = market_prices[t];
            let own: f64 = if t % 3 == 0 { 1.02 } else { 0.99 };
            values[(t, 1)] = market_prices[t] * own.powi((t % 7) as i32 + 1);
            values[(t, 2)] = market_prices[t] * if t % 2 == 0 { 1.005 } else { 0.998 };
        }
        let daily = Panel::new(dates, assets, values).unwrap();
        let u = UniverseData {
            monthly_prices: daily.resample_month_end(),
            earnings: daily.resample_month_end(),
            daily_prices: daily,
            income_statements: HashMap::new(),
            balance_sheets: HashMap::new(),
            market_returns: market,
        };

        let output = IdioVolatility::default().compute(&u).unwrap();
        let scores = &output.scores;
        let last = scores.num_dates() - 1;
        let track = scores.values()[(last, 0)];
        let noisy = scores.values()[(last, 1)];
        assert!(track > noisy);
    }
}
