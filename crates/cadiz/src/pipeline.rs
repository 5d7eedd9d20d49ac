//! End-to-end factor backtest pipeline.
//!
//! [`run`] wires the layers together: fetch a universe through the data
//! providers, compute the factor lineup, construct quantile portfolios per
//! factor and for the combined score, and evaluate everything against a
//! benchmark.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use cadiz_combine::{parse_method, FactorPanel};
use cadiz_data::{BenchmarkProvider, MarketDataProvider};
use cadiz_eval::{
    align_benchmark, construct, correlation_matrix, factor_portfolios, CorrelationMatrix,
    MetricsConfig, PerformanceSummary, PortfolioBacktest, QuantileConfig,
};
use cadiz_signals::{compute_factors, default_signals, FactorSet};
use cadiz_traits::{CadizError, Date, Result, ReturnSeries, Symbol};

/// Name under which the combined strategy appears in results.
pub const COMPOSITE_NAME: &str = "combined";

/// Full configuration of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Symbols to backtest over.
    pub universe: Vec<Symbol>,
    /// First date of the backtest window.
    pub start: Date,
    /// Last date of the backtest window.
    pub end: Date,
    /// Quantile portfolio construction settings.
    pub quantile: QuantileConfig,
    /// Performance metrics settings.
    pub metrics: MetricsConfig,
    /// Factor combination method: `equal_weight`, `rank_sum`, or `custom`.
    pub combine_method: String,
    /// Factor weights, required when `combine_method` is `custom`.
    pub combine_weights: Option<HashMap<String, f64>>,
    /// Benchmark symbol for relative comparison.
    pub benchmark_symbol: String,
}

impl RunConfig {
    /// A run over `universe` between `start` and `end` with default
    /// construction, metrics, and equal-weight combination settings.
    #[must_use]
    pub fn new(universe: Vec<Symbol>, start: Date, end: Date) -> Self {
        Self {
            universe,
            start,
            end,
            quantile: QuantileConfig::default(),
            metrics: MetricsConfig::default(),
            combine_method: "equal_weight".to_string(),
            combine_weights: None,
            benchmark_symbol: "SPY".to_string(),
        }
    }
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct RunResults {
    /// One backtest per factor, keyed by factor name.
    pub factor_portfolios: BTreeMap<String, PortfolioBacktest>,
    /// The backtest of the combined factor score.
    pub combined: PortfolioBacktest,
    /// Benchmark returns restricted to the backtest calendar.
    pub benchmark: ReturnSeries,
    /// Performance table over factors, the combined strategy, and the
    /// benchmark.
    pub summary: PerformanceSummary,
    /// Pairwise return correlations over the same strategies.
    pub correlations: CorrelationMatrix,
    /// Symbols dropped for incomplete data coverage.
    pub dropped_symbols: Vec<Symbol>,
    /// Diagnostic notes accumulated across the run.
    pub notes: Vec<String>,
}

/// Runs the full pipeline.
///
/// Configuration problems (an unknown combine method, invalid quantile
/// fractions) fail before any data is fetched. Data degradations do not:
/// a factor that cannot compute or a symbol with incomplete history is
/// dropped with a note and the run proceeds with what remains.
///
/// # Errors
///
/// Returns [`CadizError::Config`] for misconfiguration,
/// [`CadizError::InsufficientData`] when no factor survives, and passes
/// through provider errors.
pub fn run(
    config: &RunConfig,
    market: &dyn MarketDataProvider,
    benchmark: &dyn BenchmarkProvider,
) -> Result<RunResults> {
    config.quantile.validate()?;
    let combiner = parse_method(&config.combine_method, config.combine_weights.clone())?;

    let universe = market.universe(&config.universe, config.start, config.end)?;
    let (universe, dropped_symbols) = universe.retain_complete()?;

    let mut notes: Vec<String> = dropped_symbols
        .iter()
        .map(|s| format!("{s}: dropped: incomplete price or earnings history"))
        .collect();

    let FactorSet {
        factors,
        notes: factor_notes,
    } = compute_factors(&default_signals(), &universe);
    notes.extend(factor_notes);
    if factors.is_empty() {
        return Err(CadizError::InsufficientData(
            "no factor could be computed for the universe".to_string(),
        ));
    }

    let (portfolios, portfolio_notes) =
        factor_portfolios(&universe.monthly_prices, &factors, &config.quantile)?;
    notes.extend(portfolio_notes);

    let panels: Vec<FactorPanel> = factors
        .iter()
        .map(|(name, scores)| FactorPanel::new(name.clone(), scores.clone()))
        .collect();
    let composite = combiner.combine(&panels)?;
    let mut combined = construct(&universe.monthly_prices, &composite, &config.quantile)?;
    combined.returns = combined.returns.renamed(COMPOSITE_NAME);

    let benchmark_full =
        benchmark.benchmark_returns(&config.benchmark_symbol, config.start, config.end)?;
    let benchmark = align_benchmark(&combined.returns, &benchmark_full);

    let mut series: Vec<&ReturnSeries> =
        portfolios.values().map(|p| &p.returns).collect();
    series.push(&combined.returns);
    series.push(&benchmark);
    let summary = PerformanceSummary::from_returns(&series, &config.metrics);
    let correlations = correlation_matrix(&series)?;

    Ok(RunResults {
        factor_portfolios: portfolios,
        combined,
        benchmark,
        summary,
        correlations,
        dropped_symbols,
        notes,
    })
}
