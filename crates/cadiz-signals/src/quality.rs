//! Gross profitability quality signal.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use cadiz_data::{LineItem, UniverseData};
use cadiz_traits::{align, stats, Panel, Result};

use crate::registry::SignalCategory;
use crate::signal::{FactorSignal, SignalOutput};

/// Configuration for the gross profitability signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrossProfitabilityConfig {
    /// Months between a fiscal quarter end and when its numbers are
    /// treated as known (default: 3).
    pub lag_months: usize,
}

impl Default for GrossProfitabilityConfig {
    fn default() -> Self {
        Self { lag_months: 3 }
    }
}

/// Gross profits over total assets, the Novy-Marx profitability measure.
///
/// Per asset, gross profit comes from the income statement (directly, or
/// revenue minus cost of revenue) and the denominator from the balance
/// sheet, matched by reporting date. A symbol whose statements are absent
/// or whose line items cannot be resolved contributes an all-missing
/// column and a diagnostic note; the rest of the universe is unaffected.
#[derive(Debug, Clone, Default)]
pub struct GrossProfitability {
    config: GrossProfitabilityConfig,
}

impl GrossProfitability {
    /// Create a new gross profitability signal with the given
    /// configuration.
    #[must_use]
    pub const fn new(config: GrossProfitabilityConfig) -> Self {
        Self { config }
    }

    /// Quarterly gross-profit-to-assets observations for one symbol.
    fn asset_ratios(
        universe: &UniverseData,
        symbol: &str,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        let income = universe
            .income_statements
            .get(symbol)
            .ok_or_else(|| cadiz_traits::CadizError::SymbolNotFound(format!(
                "{symbol}: no income statement"
            )))?;
        let balance = universe
            .balance_sheets
            .get(symbol)
            .ok_or_else(|| cadiz_traits::CadizError::SymbolNotFound(format!(
                "{symbol}: no balance sheet"
            )))?;

        let gross_profit = income.gross_profit()?;
        let total_assets = balance.line_item(LineItem::TotalAssets)?;

        Ok(gross_profit
            .into_iter()
            .filter_map(|(date, gp)| {
                let ta = total_assets
                    .iter()
                    .find(|(d, _)| *d == date)
                    .map(|(_, v)| *v)?;
                if gp.is_finite() && ta.is_finite() && ta > 0.0 {
                    Some((date, gp / ta))
                } else {
                    None
                }
            })
            .collect())
    }
}

impl FactorSignal for GrossProfitability {
    fn name(&self) -> &str {
        "gross_profitability"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Quality
    }

    fn requires_fundamentals(&self) -> bool {
        true
    }

    fn compute(&self, universe: &UniverseData) -> Result<SignalOutput> {
        let prices = &universe.monthly_prices;
        let mut notes = Vec::new();

        let mut per_asset: Vec<Vec<(NaiveDate, f64)>> =
            Vec::with_capacity(prices.num_assets());
        let mut quarter_dates: BTreeSet<NaiveDate> = BTreeSet::new();
        for symbol in prices.assets() {
            match Self::asset_ratios(universe, symbol) {
                Ok(ratios) => {
                    quarter_dates.extend(ratios.iter().map(|(d, _)| *d));
                    per_asset.push(ratios);
                }
                Err(err) => {
                    notes.push(format!("gross_profitability: skipping {symbol}: {err}"));
                    per_asset.push(Vec::new());
                }
            }
        }

        let dates: Vec<NaiveDate> = quarter_dates.into_iter().collect();
        let mut values = Array2::from_elem((dates.len(), prices.num_assets()), f64::NAN);
        for (j, ratios) in per_asset.iter().enumerate() {
            for (date, ratio) in ratios {
                if let Ok(r) = dates.binary_search(date) {
                    values[(r, j)] = *ratio;
                }
            }
        }
        let quarterly = Panel::new(dates, prices.assets().to_vec(), values)?;
        let known = align::align_to(prices.dates(), &quarterly, self.config.lag_months)?;

        Ok(SignalOutput {
            scores: stats::normalize(&known),
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadiz_data::FundamentalStatement;
    use cadiz_traits::ReturnSeries;
    use polars::prelude::*;
    use std::collections::HashMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn income(symbol: &str, gp: f64) -> FundamentalStatement {
        let df = df! {
            "date" => &["2023-12-31"],
            "grossProfit" => &[gp],
        }
        .unwrap();
        FundamentalStatement::new(symbol, df).unwrap()
    }

    fn balance(symbol: &str, ta: f64) -> FundamentalStatement {
        let df = df! {
            "date" => &["2023-12-31"],
            "totalAssets" => &[ta],
        }
        .unwrap();
        FundamentalStatement::new(symbol, df).unwrap()
    }

    fn universe_with(
        income_statements: HashMap<String, FundamentalStatement>,
        balance_sheets: HashMap<String, FundamentalStatement>,
    ) -> UniverseData {
        let months = vec![
            d(2024, 1, 31),
            d(2024, 2, 29),
            d(2024, 3, 31),
            d(2024, 4, 30),
        ];
        let assets = vec!["AAA".to_string(), "BBB".to_string(), "CCC".to_string()];
        let monthly = Panel::filled(months, assets, 10.0).unwrap();
        UniverseData {
            daily_prices: monthly.clone(),
            earnings: monthly.clone(),
            monthly_prices: monthly,
            income_statements,
            balance_sheets,
            market_returns: ReturnSeries::empty("market"),
        }
    }

    #[test]
    fn test_profitable_ranks_above_lean() {
        let income_statements = HashMap::from([
            ("AAA".to_string(), income("AAA", 80.0)),
            ("BBB".to_string(), income("BBB", 10.0)),
            ("CCC".to_string(), income("CCC", 40.0)),
        ]);
        let balance_sheets = HashMap::from([
            ("AAA".to_string(), balance("AAA", 100.0)),
            ("BBB".to_string(), balance("BBB", 100.0)),
            ("CCC".to_string(), balance("CCC", 100.0)),
        ]);
        let u = universe_with(income_statements, balance_sheets);

        let output = GrossProfitability::default().compute(&u).unwrap();
        let scores = &output.scores;
        let last = scores.num_dates() - 1;
        assert!(scores.values()[(last, 0)] > scores.values()[(last, 2)]);
        assert!(scores.values()[(last, 2)] > scores.values()[(last, 1)]);
        assert!(output.notes.is_empty());
    }

    #[test]
    fn test_unresolvable_symbol_is_isolated() {
        // BBB's income statement lacks any usable line item
        let odd = df! {
            "date" => &["2023-12-31"],
            "somethingElse" => &[1.0],
        }
        .unwrap();
        let income_statements = HashMap::from([
            ("AAA".to_string(), income("AAA", 80.0)),
            (
                "BBB".to_string(),
                FundamentalStatement::new("BBB", odd).unwrap(),
            ),
            ("CCC".to_string(), income("CCC", 40.0)),
        ]);
        let balance_sheets = HashMap::from([
            ("AAA".to_string(), balance("AAA", 100.0)),
            ("BBB".to_string(), balance("BBB", 100.0)),
            ("CCC".to_string(), balance("CCC", 100.0)),
        ]);
        let u = universe_with(income_statements, balance_sheets);

        let output = GrossProfitability::default().compute(&u).unwrap();
        let scores = &output.scores;
        let last = scores.num_dates() - 1;

        // BBB degrades to missing with a note; AAA and CCC still score
        assert!(scores.values()[(last, 1)].is_nan());
        assert!(scores.values()[(last, 0)].is_finite());
        assert_eq!(output.notes.len(), 1);
        assert!(output.notes[0].contains("BBB"));
    }

    #[test]
    fn test_missing_statements_noted() {
        let income_statements = HashMap::from([
            ("AAA".to_string(), income("AAA", 80.0)),
            ("CCC".to_string(), income("CCC", 40.0)),
        ]);
        let balance_sheets = HashMap::from([
            ("AAA".to_string(), balance("AAA", 100.0)),
            ("CCC".to_string(), balance("CCC", 100.0)),
        ]);
        let u = universe_with(income_statements, balance_sheets);

        let output = GrossProfitability::default().compute(&u).unwrap();
        assert_eq!(output.notes.len(), 1);
        assert!(output.notes[0].contains("BBB"));
    }
}
