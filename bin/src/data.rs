//! Synthetic data providers for the Cadiz CLI.
//!
//! The CLI demonstrates the pipeline on deterministic synthetic data: a
//! seeded random walk per symbol, quarterly fundamentals derived from the
//! same seed, and an equal-weighted market series. The same seed always
//! produces the same universe.

use chrono::{Datelike, Days, NaiveDate};
use ndarray::Array2;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use cadiz_data::{BenchmarkProvider, FundamentalStatement, MarketDataProvider, UniverseData};
use cadiz_traits::panel::month_end;
use cadiz_traits::{CadizError, Date, Panel, Result, ReturnSeries, Symbol};

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| CadizError::InvalidDate(format!("invalid date '{date_str}': {e}")))
}

/// Deterministic synthetic market data keyed on a seed.
#[derive(Debug)]
pub(crate) struct SyntheticProvider {
    seed: u64,
}

impl SyntheticProvider {
    pub(crate) const fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn symbol_rng(&self, symbol: &str) -> StdRng {
        // Stable per-symbol stream regardless of universe order
        let mut hash = self.seed;
        for b in symbol.bytes() {
            hash = hash.wrapping_mul(31).wrapping_add(u64::from(b));
        }
        StdRng::seed_from_u64(hash)
    }

    /// A geometric random walk over `dates` with symbol-specific drift.
    fn price_path(&self, symbol: &str, dates: &[NaiveDate]) -> Vec<f64> {
        let mut rng = self.symbol_rng(symbol);
        let drift: f64 = rng.gen_range(-0.0002..0.0008);
        let vol: f64 = rng.gen_range(0.005..0.025);
        let mut price = rng.gen_range(20.0..400.0);
        let mut path = Vec::with_capacity(dates.len());
        for _ in dates {
            let shock: f64 = rng.gen_range(-1.0..1.0);
            price *= 1.0 + drift + vol * shock;
            path.push(price);
        }
        path
    }
}

fn daily_calendar(start: Date, end: Date) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut date = start;
    while date <= end {
        dates.push(date);
        date = match date.checked_add_days(Days::new(1)) {
            Some(d) => d,
            None => break,
        };
    }
    dates
}

fn quarter_ends(start: Date, end: Date) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut year = start.year();
    while year <= end.year() {
        for month in [3, 6, 9, 12] {
            if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
                let qe = month_end(first);
                if qe >= start && qe <= end {
                    dates.push(qe);
                }
            }
        }
        year += 1;
    }
    dates
}

impl MarketDataProvider for SyntheticProvider {
    fn universe(&self, symbols: &[Symbol], start: Date, end: Date) -> Result<UniverseData> {
        if symbols.is_empty() {
            return Err(CadizError::InvalidData(
                "universe must contain at least one symbol".to_string(),
            ));
        }

        let daily_dates = daily_calendar(start, end);
        if daily_dates.len() < 2 {
            return Err(CadizError::InvalidDate(format!(
                "window {start} to {end} is too short"
            )));
        }

        let mut daily_values = Array2::zeros((daily_dates.len(), symbols.len()));
        for (j, symbol) in symbols.iter().enumerate() {
            for (t, price) in self.price_path(symbol, &daily_dates).into_iter().enumerate() {
                daily_values[(t, j)] = price;
            }
        }
        let daily_prices = Panel::new(daily_dates, symbols.to_vec(), daily_values)?;
        let monthly_prices = daily_prices.resample_month_end();

        // Equal-weighted daily market return
        let market_panel = daily_prices.pct_change(1);
        let market_dates: Vec<NaiveDate> = market_panel.dates()[1..].to_vec();
        let market_values: Vec<f64> = (1..market_panel.num_dates())
            .map(|t| {
                let row = market_panel.row(t);
                let finite: Vec<f64> =
                    row.iter().copied().filter(|v| v.is_finite()).collect();
                if finite.is_empty() {
                    f64::NAN
                } else {
                    finite.iter().sum::<f64>() / finite.len() as f64
                }
            })
            .collect();
        let market_returns = ReturnSeries::new("market", market_dates, market_values)?;

        let quarters = quarter_ends(start, end);
        let mut earnings_values = Array2::zeros((quarters.len(), symbols.len()));
        let mut income_statements = HashMap::new();
        let mut balance_sheets = HashMap::new();
        for (j, symbol) in symbols.iter().enumerate() {
            let mut rng = self.symbol_rng(symbol);
            let eps_base: f64 = rng.gen_range(0.5..8.0);
            let revenue_base: f64 = rng.gen_range(500.0..5000.0);
            let margin: f64 = rng.gen_range(0.2..0.6);
            let assets: f64 = revenue_base * rng.gen_range(1.0..3.0);

            let mut quarter_strings = Vec::with_capacity(quarters.len());
            let mut revenues = Vec::with_capacity(quarters.len());
            let mut costs = Vec::with_capacity(quarters.len());
            let mut total_assets = Vec::with_capacity(quarters.len());
            for (t, quarter) in quarters.iter().enumerate() {
                let growth = 1.0 + 0.01 * t as f64;
                earnings_values[(t, j)] = eps_base * growth * rng.gen_range(0.8..1.2);
                quarter_strings.push(quarter.format("%Y-%m-%d").to_string());
                let revenue = revenue_base * growth;
                revenues.push(revenue);
                costs.push(revenue * (1.0 - margin));
                total_assets.push(assets * growth);
            }

            let income = df! {
                "date" => &quarter_strings,
                "revenue" => &revenues,
                "costOfRevenue" => &costs,
            }?;
            let balance = df! {
                "date" => &quarter_strings,
                "totalAssets" => &total_assets,
            }?;
            income_statements.insert(symbol.clone(), FundamentalStatement::new(symbol, income)?);
            balance_sheets.insert(symbol.clone(), FundamentalStatement::new(symbol, balance)?);
        }
        let earnings = Panel::new(quarters, symbols.to_vec(), earnings_values)?;

        Ok(UniverseData {
            daily_prices,
            monthly_prices,
            earnings,
            income_statements,
            balance_sheets,
            market_returns,
        })
    }
}

impl BenchmarkProvider for SyntheticProvider {
    fn benchmark_returns(&self, symbol: &str, start: Date, end: Date) -> Result<ReturnSeries> {
        let daily = daily_calendar(start, end);
        let path = self.price_path(symbol, &daily);
        let prices = Panel::new(
            daily,
            vec![symbol.to_string()],
            Array2::from_shape_vec((path.len(), 1), path)
                .map_err(|e| CadizError::ShapeMismatch(e.to_string()))?,
        )?;
        let monthly = prices.resample_month_end().pct_change(1);
        let dates: Vec<NaiveDate> = monthly.dates()[1..].to_vec();
        let values: Vec<f64> = (1..monthly.num_dates())
            .map(|t| monthly.values()[(t, 0)])
            .collect();
        ReturnSeries::new(symbol, dates, values)
    }
}
