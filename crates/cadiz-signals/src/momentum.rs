//! Price momentum signal: 12-month return skipping the most recent month.

use serde::{Deserialize, Serialize};

use cadiz_data::UniverseData;
use cadiz_traits::{stats, Result};

use crate::registry::SignalCategory;
use crate::signal::{FactorSignal, SignalOutput};

/// Configuration for the momentum signal.
///
/// Lookback and skip are expressed in months on the monthly price panel.
/// The classical parameterization skips the most recent month to avoid
/// short-term reversal effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Number of months over which the return is measured (default: 12).
    pub lookback_months: usize,

    /// Number of recent months to skip (default: 1).
    pub skip_months: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            lookback_months: 12,
            skip_months: 1,
        }
    }
}

/// Cross-sectional price momentum.
///
/// The raw score at month `t` is the cumulative return from
/// `t - skip - lookback` to `t - skip`:
/// `price[t - skip] / price[t - skip - lookback] - 1`. Assets without the
/// full history are missing at that date.
#[derive(Debug, Clone, Default)]
pub struct Momentum {
    config: MomentumConfig,
}

impl Momentum {
    /// Create a new momentum signal with the given configuration.
    #[must_use]
    pub const fn new(config: MomentumConfig) -> Self {
        Self { config }
    }

    /// Total months of history needed for a score.
    #[must_use]
    pub const fn required_history(&self) -> usize {
        self.config.lookback_months + self.config.skip_months
    }
}

impl FactorSignal for Momentum {
    fn name(&self) -> &str {
        "momentum"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Momentum
    }

    fn compute(&self, universe: &UniverseData) -> Result<SignalOutput> {
        let raw = universe
            .monthly_prices
            .pct_change(self.config.lookback_months)
            .shift(self.config.skip_months);
        Ok(SignalOutput::clean(stats::normalize(&raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cadiz_traits::{Panel, ReturnSeries};
    use chrono::NaiveDate;
    use ndarray::Array2;
    use std::collections::HashMap;

    fn month_end(i: usize) -> NaiveDate {
        // 14 consecutive month ends starting 2023-01-31
        let (mut y, mut m) = (2023, 1 + i as u32);
        while m > 12 {
            y += 1;
            m -= 12;
        }
        cadiz_traits::panel::month_end(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
    }

    fn universe(monthly: Panel) -> UniverseData {
        let daily = monthly.clone();
        let earnings = monthly.clone();
        UniverseData {
            daily_prices: daily,
            monthly_prices: monthly,
            earnings,
            income_statements: HashMap::new(),
            balance_sheets: HashMap::new(),
            market_returns: ReturnSeries::empty("market"),
        }
    }

    #[test]
    fn test_momentum_skips_recent_month() {
        let dates: Vec<NaiveDate> = (0..14).map(month_end).collect();
        let assets = vec!["UP".to_string(), "DOWN".to_string(), "FLAT".to_string()];
        let mut values = Array2::from_elem((14, 3), f64::NAN);
        for t in 0..14 {
            values[(t, 0)] = 100.0 * 1.02_f64.powi(t as i32);
            values[(t, 1)] = 100.0 * 0.98_f64.powi(t as i32);
            values[(t, 2)] = 100.0;
        }
        let monthly = Panel::new(dates, assets, values).unwrap();
        let u = universe(monthly);

        let output = Momentum::default().compute(&u).unwrap();
        let scores = &output.scores;

        // First lookback + skip months have no score
        for t in 0..13 {
            assert!(scores.row(t).iter().all(|v| v.is_nan()), "row {t}");
        }
        // Winner ranks above loser at the last month
        let last = scores.num_dates() - 1;
        let up = scores.values()[(last, 0)];
        let down = scores.values()[(last, 1)];
        let flat = scores.values()[(last, 2)];
        assert!(up > flat && flat > down);

        // Normalized cross-section has zero mean
        let mean = (up + down + flat) / 3.0;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_momentum_missing_history_stays_missing() {
        let dates: Vec<NaiveDate> = (0..14).map(month_end).collect();
        let assets = vec!["FULL".to_string(), "LATE".to_string(), "ALSO".to_string()];
        let mut values = Array2::from_elem((14, 3), f64::NAN);
        for t in 0..14 {
            values[(t, 0)] = 100.0 + t as f64;
            values[(t, 2)] = 200.0 - t as f64;
            if t >= 5 {
                values[(t, 1)] = 50.0 + t as f64;
            }
        }
        let monthly = Panel::new(dates, assets, values).unwrap();
        let u = universe(monthly);

        let output = Momentum::default().compute(&u).unwrap();
        let last = output.scores.num_dates() - 1;
        // The late starter lacks 13 months of history: missing, not zero
        assert!(output.scores.values()[(last, 1)].is_nan());
        assert!(output.scores.values()[(last, 0)].is_finite());
    }
}
