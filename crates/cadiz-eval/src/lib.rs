//! Portfolio construction and performance evaluation for Cadiz.
//!
//! The evaluation layer turns factor score panels into simulated
//! portfolios and return streams into comparable statistics:
//!
//! - [`portfolio`]: quantile portfolio construction and backtesting
//! - [`metrics`]: annualized return, volatility, Sharpe, Sortino,
//!   drawdown and win rate
//! - [`summary`]: tabular performance summaries across strategies
//! - [`analysis`]: return correlations and benchmark alignment
//!
//! # Examples
//!
//! ```rust,no_run
//! use cadiz_eval::{construct, MetricsConfig, PerformanceMetrics, QuantileConfig};
//! # fn panels() -> (cadiz_traits::Panel, cadiz_traits::Panel) { unimplemented!() }
//!
//! let (prices, scores) = panels();
//! let backtest = construct(&prices, &scores, &QuantileConfig::default()).unwrap();
//! let metrics = PerformanceMetrics::calculate(&backtest.returns, &MetricsConfig::default());
//! println!("Sharpe: {:.2}", metrics.sharpe_ratio);
//! ```

pub mod analysis;
pub mod metrics;
pub mod portfolio;
pub mod summary;

// Re-export main types
pub use analysis::{align_benchmark, correlation_matrix, CorrelationMatrix};
pub use metrics::{MetricsConfig, PerformanceMetrics};
pub use portfolio::{construct, factor_portfolios, PortfolioBacktest, QuantileConfig};
pub use summary::{PerformanceSummary, SummaryRow};
