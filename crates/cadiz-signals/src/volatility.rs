//! Total volatility signal from daily returns.

use serde::{Deserialize, Serialize};

use cadiz_data::UniverseData;
use cadiz_traits::{stats, Result};

use crate::registry::SignalCategory;
use crate::signal::{FactorSignal, SignalOutput};

/// Trading days per year, used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Configuration for the total volatility signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalVolatilityConfig {
    /// Rolling window in trading days (default: 63, one quarter).
    pub window: usize,

    /// Whether to negate the score so low-volatility assets rank high
    /// (default: true, the low-volatility anomaly convention).
    pub invert: bool,
}

impl Default for TotalVolatilityConfig {
    fn default() -> Self {
        Self {
            window: 63,
            invert: true,
        }
    }
}

/// Annualized rolling volatility of daily returns, resampled monthly.
///
/// The raw measure is the sample standard deviation of daily returns over
/// the trailing window, scaled by `sqrt(252)`. With `invert` set the sign
/// is flipped before normalization so that a long-top-quantile portfolio
/// holds the least volatile names.
#[derive(Debug, Clone, Default)]
pub struct TotalVolatility {
    config: TotalVolatilityConfig,
}

impl TotalVolatility {
    /// Create a new total volatility signal with the given configuration.
    #[must_use]
    pub const fn new(config: TotalVolatilityConfig) -> Self {
        Self { config }
    }

    /// The rolling window length in trading days.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.config.window
    }
}

impl FactorSignal for TotalVolatility {
    fn name(&self) -> &str {
        "total_volatility"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Volatility
    }

    fn compute(&self, universe: &UniverseData) -> Result<SignalOutput> {
        let daily_returns = universe.daily_prices.pct_change(1);
        let vol = daily_returns
            .rolling_std(self.config.window, self.config.window)
            .map(|v| v * TRADING_DAYS_PER_YEAR.sqrt());
        let monthly = vol.resample_month_end();
        let signed = if self.config.invert {
            monthly.map(|v| -v)
        } else {
            monthly
        };
        Ok(SignalOutput::clean(stats::normalize(&signed)))
    }
}
