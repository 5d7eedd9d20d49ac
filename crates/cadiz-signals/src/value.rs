//! Earnings yield (earnings-to-price) value signal.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use cadiz_data::UniverseData;
use cadiz_traits::{align, stats, Panel, Result};

use crate::registry::SignalCategory;
use crate::signal::{FactorSignal, SignalOutput};

/// Configuration for the earnings yield signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsYieldConfig {
    /// Months between a fiscal quarter end and when its numbers are
    /// treated as known (default: 3, a conservative filing delay).
    pub lag_months: usize,

    /// Minimum quarterly observations inside the trailing four for a TTM
    /// figure (default: 2).
    pub min_quarters: usize,
}

impl Default for EarningsYieldConfig {
    fn default() -> Self {
        Self {
            lag_months: 3,
            min_quarters: 2,
        }
    }
}

/// Trailing-twelve-month earnings relative to price.
///
/// Quarterly earnings are summed over the trailing four reports, requiring
/// at least `min_quarters` valid ones, projected point-in-time onto the
/// monthly calendar with the filing lag, and divided by month-end price.
/// Loss-makers (non-positive ratios) are missing rather than ranked: a
/// negative P/E is not a cheapness measure.
#[derive(Debug, Clone, Default)]
pub struct EarningsYield {
    config: EarningsYieldConfig,
}

impl EarningsYield {
    /// Create a new earnings yield signal with the given configuration.
    #[must_use]
    pub const fn new(config: EarningsYieldConfig) -> Self {
        Self { config }
    }

    /// Rolling sum of the trailing four quarterly reports per column.
    fn trailing_twelve_months(&self, quarterly: &Panel) -> Result<Panel> {
        let n = quarterly.num_dates();
        let k = quarterly.num_assets();
        let mut out = Array2::from_elem((n, k), f64::NAN);
        for j in 0..k {
            for t in 0..n {
                let start = t.saturating_sub(3);
                let finite: Vec<f64> = (start..=t)
                    .map(|r| quarterly.values()[(r, j)])
                    .filter(|v| v.is_finite())
                    .collect();
                if finite.len() >= self.config.min_quarters {
                    out[(t, j)] = finite.iter().sum();
                }
            }
        }
        quarterly.with_values(out)
    }
}

impl FactorSignal for EarningsYield {
    fn name(&self) -> &str {
        "earnings_yield"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Value
    }

    fn requires_fundamentals(&self) -> bool {
        true
    }

    fn compute(&self, universe: &UniverseData) -> Result<SignalOutput> {
        let prices = &universe.monthly_prices;
        let earnings = universe.earnings.select_assets(prices.assets())?;

        let ttm = self.trailing_twelve_months(&earnings)?;
        let known = align::align_to(prices.dates(), &ttm, self.config.lag_months)?;

        let mut ratio = Array2::from_elem(
            (prices.num_dates(), prices.num_assets()),
            f64::NAN,
        );
        for t in 0..prices.num_dates() {
            for j in 0..prices.num_assets() {
                let e = known.values()[(t, j)];
                let p = prices.values()[(t, j)];
                if e.is_finite() && p.is_finite() && p > 0.0 {
                    let ep = e / p;
                    // Non-positive earnings yield carries no value signal
                    if ep.is_finite() && ep > 0.0 {
                        ratio[(t, j)] = ep;
                    }
                }
            }
        }
        let raw = prices.with_values(ratio)?;
        Ok(SignalOutput::clean(stats::normalize(&raw)))
    }
}
