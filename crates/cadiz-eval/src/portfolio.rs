//! Quantile portfolio construction from factor scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cadiz_traits::{align, stats, CadizError, Panel, Result, ReturnSeries, WeightVector};

/// Configuration for quantile portfolio construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantileConfig {
    /// Fraction of the ranked cross-section held long (default: 0.2).
    pub long_pct: f64,

    /// Fraction held short (default: 0.0, long-only).
    pub short_pct: f64,

    /// Minimum number of scored assets for a rebalance to happen
    /// (default: 20). Thinner cross-sections produce a missing return.
    pub min_breadth: usize,
}

impl Default for QuantileConfig {
    fn default() -> Self {
        Self {
            long_pct: 0.2,
            short_pct: 0.0,
            min_breadth: 20,
        }
    }
}

impl QuantileConfig {
    /// Validates the quantile fractions.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::Config`] for fractions outside their valid
    /// ranges; misconfiguration is fatal rather than silently clamped.
    pub fn validate(&self) -> Result<()> {
        if !(self.long_pct > 0.0 && self.long_pct <= 1.0) {
            return Err(CadizError::Config(format!(
                "long_pct must be in (0, 1], got {}",
                self.long_pct
            )));
        }
        if !(0.0..1.0).contains(&self.short_pct) {
            return Err(CadizError::Config(format!(
                "short_pct must be in [0, 1), got {}",
                self.short_pct
            )));
        }
        Ok(())
    }
}

/// The simulated return stream and holdings of one quantile strategy.
#[derive(Debug, Clone)]
pub struct PortfolioBacktest {
    /// Periodic strategy returns, labelled at the rebalance date. One
    /// entry per calendar date except the last, which has no forward
    /// return. Missing where the cross-section was too thin.
    pub returns: ReturnSeries,
    /// Holdings per rebalance date. Dates whose cross-section was too
    /// thin are omitted entirely.
    pub weights: Vec<WeightVector>,
}

/// Builds a quantile portfolio from scores and simulates its returns.
///
/// Scores and prices are first restricted to their common dates and
/// assets. At each date the top `long_pct` of finite scores (threshold
/// ties included) are held at equal weight; with a non-zero `short_pct`
/// the bottom of the ranking is shorted the same way. The period return
/// from `t` to `t+1` is the weight-weighted sum of simple forward
/// returns.
///
/// Holdings at `t` read nothing after `t`, so the backtest is free of
/// look-ahead by construction. An asset selected at `t` but missing a
/// price at `t+1` contributes zero return and its weight is not
/// redistributed; the portfolio simply holds dead weight for the period,
/// which is the conservative reading of a delisting.
pub fn construct(
    prices: &Panel,
    scores: &Panel,
    config: &QuantileConfig,
) -> Result<PortfolioBacktest> {
    config.validate()?;
    let (scores, prices) = align::intersect(scores, prices)?;
    let forward = forward_returns(&prices);

    let n = scores.num_dates();
    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut weights = Vec::new();

    // The last date has no forward return and is not a rebalance
    for t in 0..n.saturating_sub(1) {
        let row: Vec<f64> = scores.row(t).to_vec();
        let breadth = row.iter().filter(|v| v.is_finite()).count();
        dates.push(scores.dates()[t]);
        if breadth < config.min_breadth {
            values.push(f64::NAN);
            continue;
        }

        let mut book: BTreeMap<String, f64> = BTreeMap::new();
        let long_threshold = stats::quantile(&row, 1.0 - config.long_pct);
        let longs: Vec<usize> = (0..row.len())
            .filter(|&j| row[j].is_finite() && row[j] >= long_threshold)
            .collect();
        for &j in &longs {
            book.insert(scores.assets()[j].clone(), 1.0 / longs.len() as f64);
        }

        if config.short_pct > 0.0 {
            let short_threshold = stats::quantile(&row, config.short_pct);
            let shorts: Vec<usize> = (0..row.len())
                .filter(|&j| row[j].is_finite() && row[j] <= short_threshold)
                .collect();
            for &j in &shorts {
                book.insert(scores.assets()[j].clone(), -1.0 / shorts.len() as f64);
            }
        }

        let mut period_return = 0.0;
        for (symbol, weight) in &book {
            if let Some(j) = scores.asset_index(symbol) {
                let fwd = forward.values()[(t, j)];
                if fwd.is_finite() {
                    period_return += weight * fwd;
                }
            }
        }
        values.push(period_return);
        weights.push(WeightVector::new(scores.dates()[t], book));
    }

    Ok(PortfolioBacktest {
        returns: ReturnSeries::new("portfolio", dates, values)?,
        weights,
    })
}

/// Simple return from each date to the next, labelled at the start date.
fn forward_returns(prices: &Panel) -> Panel {
    // pct_change labels the return at the end date; pull it back one row
    let changes = prices.pct_change(1);
    let n = changes.num_dates();
    let mut out = ndarray::Array2::from_elem(changes.values().raw_dim(), f64::NAN);
    for t in 0..n.saturating_sub(1) {
        for j in 0..changes.num_assets() {
            out[(t, j)] = changes.values()[(t + 1, j)];
        }
    }
    // Axes unchanged; reconstruction cannot fail
    changes.with_values(out).unwrap_or(changes)
}

/// Runs the quantile construction for each named factor panel.
///
/// Factor panels whose construction fails outright are skipped with a
/// note so one broken factor cannot take down the run.
pub fn factor_portfolios(
    prices: &Panel,
    factors: &BTreeMap<String, Panel>,
    config: &QuantileConfig,
) -> Result<(BTreeMap<String, PortfolioBacktest>, Vec<String>)> {
    config.validate()?;
    let mut portfolios = BTreeMap::new();
    let mut notes = Vec::new();
    for (name, scores) in factors {
        match construct(prices, scores, config) {
            Ok(mut backtest) => {
                backtest.returns = backtest.returns.renamed(name.clone());
                portfolios.insert(name.clone(), backtest);
            }
            Err(err) => notes.push(format!("{name}: portfolio skipped: {err}")),
        }
    }
    Ok((portfolios, notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use ndarray::{Array2, array};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn months(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| {
                let (y, m) = (2023 + (i / 12) as i32, (i % 12) as u32 + 1);
                cadiz_traits::panel::month_end(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
            })
            .collect()
    }

    fn small_config() -> QuantileConfig {
        QuantileConfig {
            long_pct: 0.5,
            short_pct: 0.0,
            min_breadth: 2,
        }
    }

    #[test]
    fn test_config_validation() {
        let bad = QuantileConfig {
            long_pct: 0.0,
            ..QuantileConfig::default()
        };
        assert!(matches!(bad.validate(), Err(CadizError::Config(_))));

        let bad = QuantileConfig {
            short_pct: 1.0,
            ..QuantileConfig::default()
        };
        assert!(matches!(bad.validate(), Err(CadizError::Config(_))));
    }

    #[test]
    fn test_weights_sum_to_one() {
        let dates = months(3);
        let assets: Vec<String> = (0..4).map(|i| format!("A{i}")).collect();
        let prices = Panel::filled(dates.clone(), assets.clone(), 100.0).unwrap();
        let scores = Panel::new(
            dates,
            assets,
            array![
                [1.0, 2.0, 3.0, 4.0],
                [4.0, 3.0, 2.0, 1.0],
                [1.0, 3.0, 2.0, 4.0]
            ],
        )
        .unwrap();

        let backtest = construct(&prices, &scores, &small_config()).unwrap();
        for wv in &backtest.weights {
            assert_relative_eq!(wv.total(), 1.0, epsilon = 1e-12);
            assert!(wv.weights().values().all(|w| *w > 0.0));
        }
    }

    #[test]
    fn test_two_asset_doubling_returns_one() {
        // Two assets, the selected one doubles: portfolio earns exactly 1.0
        let dates = months(2);
        let assets = vec!["WIN".to_string(), "LOSE".to_string()];
        let prices = Panel::new(
            dates.clone(),
            assets.clone(),
            array![[100.0, 100.0], [200.0, 100.0]],
        )
        .unwrap();
        let scores = Panel::new(dates, assets, array![[2.0, 1.0], [2.0, 1.0]]).unwrap();

        let config = QuantileConfig {
            long_pct: 0.5,
            short_pct: 0.0,
            min_breadth: 2,
        };
        let backtest = construct(&prices, &scores, &config).unwrap();
        assert_eq!(backtest.returns.len(), 1);
        assert_relative_eq!(backtest.returns.values()[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_threshold_ties_are_included() {
        let dates = months(2);
        let assets: Vec<String> = (0..4).map(|i| format!("A{i}")).collect();
        let prices = Panel::filled(dates.clone(), assets.clone(), 100.0).unwrap();
        // Three assets tie at the top score
        let scores = Panel::new(
            dates,
            assets,
            array![[5.0, 5.0, 5.0, 1.0], [5.0, 5.0, 5.0, 1.0]],
        )
        .unwrap();

        let config = QuantileConfig {
            long_pct: 0.25,
            short_pct: 0.0,
            min_breadth: 2,
        };
        let backtest = construct(&prices, &scores, &config).unwrap();
        let wv = &backtest.weights[0];
        assert_eq!(wv.len(), 3);
        assert_relative_eq!(wv.total(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_thin_cross_section_is_missing() {
        let dates = months(3);
        let assets: Vec<String> = (0..4).map(|i| format!("A{i}")).collect();
        let prices = Panel::filled(dates.clone(), assets.clone(), 100.0).unwrap();
        // Middle date has only one finite score
        let scores = Panel::new(
            dates,
            assets,
            array![
                [1.0, 2.0, 3.0, 4.0],
                [1.0, f64::NAN, f64::NAN, f64::NAN],
                [1.0, 2.0, 3.0, 4.0]
            ],
        )
        .unwrap();

        let backtest = construct(&prices, &scores, &small_config()).unwrap();
        assert!(backtest.returns.values()[1].is_nan());
        // No holdings recorded for the thin date
        assert_eq!(backtest.weights.len(), 1);
        assert_eq!(backtest.weights[0].date(), backtest.returns.dates()[0]);
    }

    #[test]
    fn test_missing_forward_price_contributes_zero() {
        let dates = months(2);
        let assets = vec!["GONE".to_string(), "OK".to_string()];
        // GONE has no price next month
        let prices = Panel::new(
            dates.clone(),
            assets.clone(),
            array![[100.0, 100.0], [f64::NAN, 110.0]],
        )
        .unwrap();
        let scores = Panel::new(dates, assets, array![[2.0, 1.0], [2.0, 1.0]]).unwrap();

        let config = QuantileConfig {
            long_pct: 1.0,
            short_pct: 0.0,
            min_breadth: 2,
        };
        let backtest = construct(&prices, &scores, &config).unwrap();
        // Half the book earns 10%, the delisted half earns nothing
        assert_relative_eq!(backtest.returns.values()[0], 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_no_look_ahead_in_weights() {
        let dates = months(4);
        let assets: Vec<String> = (0..4).map(|i| format!("A{i}")).collect();
        let prices = Panel::filled(dates.clone(), assets.clone(), 100.0).unwrap();
        let base = array![
            [1.0, 2.0, 3.0, 4.0],
            [4.0, 3.0, 2.0, 1.0],
            [1.0, 3.0, 2.0, 4.0],
            [2.0, 1.0, 4.0, 3.0]
        ];
        let scores = Panel::new(dates.clone(), assets.clone(), base.clone()).unwrap();
        let backtest = construct(&prices, &scores, &small_config()).unwrap();

        // Mutate the final row; earlier holdings must not move
        let mut mutated = base;
        mutated[(3, 0)] = 100.0;
        mutated[(3, 1)] = -100.0;
        let scores2 = Panel::new(dates, assets, mutated).unwrap();
        let backtest2 = construct(&prices, &scores2, &small_config()).unwrap();

        assert_eq!(backtest.weights[0], backtest2.weights[0]);
        assert_eq!(backtest.weights[1], backtest2.weights[1]);
        assert_eq!(backtest.weights[2], backtest2.weights[2]);
    }

    #[test]
    fn test_long_short_books() {
        let dates = months(2);
        let assets: Vec<String> = (0..4).map(|i| format!("A{i}")).collect();
        let prices = Panel::new(
            dates.clone(),
            assets.clone(),
            Array2::from_shape_vec(
                (2, 4),
                vec![100.0, 100.0, 100.0, 100.0, 110.0, 105.0, 95.0, 90.0],
            )
            .unwrap(),
        )
        .unwrap();
        let scores = Panel::new(
            dates,
            assets,
            array![[4.0, 3.0, 2.0, 1.0], [4.0, 3.0, 2.0, 1.0]],
        )
        .unwrap();

        let config = QuantileConfig {
            long_pct: 0.25,
            short_pct: 0.25,
            min_breadth: 2,
        };
        let backtest = construct(&prices, &scores, &config).unwrap();
        let wv = &backtest.weights[0];
        assert_relative_eq!(wv.weight("A0"), 1.0);
        assert_relative_eq!(wv.weight("A3"), -1.0);
        // Long leg +10%, short leg -(-10%) = +10%
        assert_relative_eq!(backtest.returns.values()[0], 0.20, epsilon = 1e-12);
    }
}
