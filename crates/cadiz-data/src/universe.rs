//! Assembled input data for a backtest run.

use std::collections::HashMap;

use cadiz_traits::{Panel, Result, ReturnSeries, Symbol};

use crate::statement::FundamentalStatement;

/// Everything the pipeline needs about a universe of securities.
///
/// Price panels share the asset axis; the earnings panel sits on its own
/// quarterly calendar and is aligned point-in-time by the value factor.
/// Statements are optional per symbol. A symbol without statements simply
/// cannot receive fundamental scores.
#[derive(Debug, Clone)]
pub struct UniverseData {
    /// Daily close prices, trading-day calendar.
    pub daily_prices: Panel,
    /// Month-end close prices.
    pub monthly_prices: Panel,
    /// Quarterly net income, rows labelled by report date.
    pub earnings: Panel,
    /// Quarterly income statements by symbol.
    pub income_statements: HashMap<Symbol, FundamentalStatement>,
    /// Quarterly balance sheets by symbol.
    pub balance_sheets: HashMap<Symbol, FundamentalStatement>,
    /// Daily market (benchmark) returns used by the market model.
    pub market_returns: ReturnSeries,
}

impl UniverseData {
    /// The asset universe, taken from the monthly price panel.
    pub fn assets(&self) -> &[Symbol] {
        self.monthly_prices.assets()
    }

    /// Drops assets that lack either price or earnings history.
    ///
    /// A factor model needs both sides for a symbol to be rankable at all;
    /// partially covered symbols are removed up front rather than carried
    /// as permanent NaN columns. Returns the retained universe and the
    /// symbols that were dropped, for diagnostics.
    pub fn retain_complete(self) -> Result<(Self, Vec<Symbol>)> {
        let keep: Vec<Symbol> = self
            .monthly_prices
            .assets()
            .iter()
            .filter(|a| {
                self.daily_prices.asset_index(a).is_some()
                    && self.earnings.asset_index(a).is_some()
            })
            .cloned()
            .collect();
        let dropped: Vec<Symbol> = self
            .monthly_prices
            .assets()
            .iter()
            .filter(|a| !keep.contains(a))
            .cloned()
            .collect();

        let daily_prices = self.daily_prices.select_assets(&keep)?;
        let monthly_prices = self.monthly_prices.select_assets(&keep)?;
        let earnings = self.earnings.select_assets(&keep)?;
        let income_statements = self
            .income_statements
            .into_iter()
            .filter(|(symbol, _)| keep.contains(symbol))
            .collect();
        let balance_sheets = self
            .balance_sheets
            .into_iter()
            .filter(|(symbol, _)| keep.contains(symbol))
            .collect();

        Ok((
            Self {
                daily_prices,
                monthly_prices,
                earnings,
                income_statements,
                balance_sheets,
                market_returns: self.market_returns,
            },
            dropped,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn panel(assets: &[&str]) -> Panel {
        Panel::filled(
            vec![d(2024, 1, 31), d(2024, 2, 29)],
            assets.iter().map(|s| s.to_string()).collect(),
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_retain_complete_drops_partial_coverage() {
        let universe = UniverseData {
            daily_prices: panel(&["AAA", "BBB", "CCC"]),
            monthly_prices: panel(&["AAA", "BBB", "CCC"]),
            earnings: panel(&["AAA", "CCC"]),
            income_statements: HashMap::new(),
            balance_sheets: HashMap::new(),
            market_returns: ReturnSeries::empty("market"),
        };

        let (retained, dropped) = universe.retain_complete().unwrap();
        assert_eq!(
            retained.assets(),
            &["AAA".to_string(), "CCC".to_string()]
        );
        assert_eq!(dropped, vec!["BBB".to_string()]);
    }
}
