//! Batch factor computation over a universe.

use std::collections::BTreeMap;

use cadiz_data::UniverseData;
use cadiz_traits::Panel;

use crate::idio_vol::IdioVolatility;
use crate::momentum::Momentum;
use crate::quality::GrossProfitability;
use crate::signal::FactorSignal;
use crate::value::EarningsYield;
use crate::volatility::TotalVolatility;

/// Named factor score panels plus the diagnostics accumulated while
/// producing them.
#[derive(Debug, Clone)]
pub struct FactorSet {
    /// Normalized monthly score panels, keyed by factor name in
    /// deterministic order.
    pub factors: BTreeMap<String, Panel>,
    /// Diagnostic notes, including factors skipped entirely.
    pub notes: Vec<String>,
}

/// The default factor lineup with standard configurations.
#[must_use]
pub fn default_signals() -> Vec<Box<dyn FactorSignal>> {
    vec![
        Box::new(Momentum::default()),
        Box::new(TotalVolatility::default()),
        Box::new(IdioVolatility::default()),
        Box::new(EarningsYield::default()),
        Box::new(GrossProfitability::default()),
    ]
}

/// Computes every signal in `signals` over `universe`.
///
/// A factor that fails outright (for example the market model without
/// market returns) is skipped with a note; the remaining factors are
/// unaffected. Per-asset degradations inside a factor arrive as notes from
/// the factor itself.
pub fn compute_factors(
    signals: &[Box<dyn FactorSignal>],
    universe: &UniverseData,
) -> FactorSet {
    let mut factors = BTreeMap::new();
    let mut notes = Vec::new();
    for signal in signals {
        match signal.compute(universe) {
            Ok(output) => {
                notes.extend(output.notes);
                factors.insert(signal.name().to_string(), output.scores);
            }
            Err(err) => {
                notes.push(format!("{}: skipped: {err}", signal.name()));
            }
        }
    }
    FactorSet { factors, notes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadiz_traits::ReturnSeries;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    #[test]
    fn test_failed_factor_is_isolated() {
        let months: Vec<NaiveDate> = (1..=12)
            .map(|m| {
                cadiz_traits::panel::month_end(NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
            })
            .collect();
        let monthly =
            Panel::filled(months, vec!["AAA".to_string(), "BBB".to_string()], 100.0).unwrap();
        // No market returns: the market model cannot run
        let universe = UniverseData {
            daily_prices: monthly.clone(),
            earnings: monthly.clone(),
            monthly_prices: monthly,
            income_statements: HashMap::new(),
            balance_sheets: HashMap::new(),
            market_returns: ReturnSeries::empty("market"),
        };

        let set = compute_factors(&default_signals(), &universe);
        assert!(!set.factors.contains_key("idio_volatility"));
        assert!(set.factors.contains_key("momentum"));
        assert!(set
            .notes
            .iter()
            .any(|n| n.starts_with("idio_volatility: skipped")));
    }
}
