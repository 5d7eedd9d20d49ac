#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # cadiz
//!
//! Cross-sectional equity factor backtesting.
//!
//! cadiz computes factor scores over a universe of securities, builds
//! quantile portfolios from them, combines factors into composite
//! strategies, and evaluates everything against a benchmark. It is an
//! umbrella crate that re-exports the cadiz sub-crates and provides the
//! end-to-end [`pipeline`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use cadiz::pipeline::{run, RunConfig};
//! use cadiz::Date;
//!
//! # fn providers() -> (impl cadiz::data::MarketDataProvider, impl cadiz::data::BenchmarkProvider) { unimplemented!() }
//! # fn main() -> cadiz::Result<()> {
//! let (market, benchmark) = providers();
//! let config = RunConfig::new(
//!     vec!["AAPL".into(), "MSFT".into(), "XOM".into()],
//!     Date::from_ymd_opt(2018, 1, 1).unwrap(),
//!     Date::from_ymd_opt(2024, 1, 1).unwrap(),
//! );
//!
//! let results = run(&config, &market, &benchmark)?;
//! println!("{}", results.summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`]: the panel data model, error types, and statistics
//! - [`data`]: universe data, fundamental statements, provider traits
//! - [`signals`]: factor signal implementations and the signal registry
//! - [`combine`]: factor combination strategies
//! - [`eval`]: portfolio construction and performance evaluation
//! - [`pipeline`]: the end-to-end run entry point
//!
//! ## Architecture
//!
//! The pipeline flows one way:
//!
//! 1. **Providers** assemble price and fundamental data for a universe
//! 2. **Signals** turn raw data into normalized monthly score panels
//! 3. **Combiners** blend score panels into a composite
//! 4. **Portfolios** hold the top quantile of each panel, point in time
//! 5. **Evaluation** reduces return streams to comparable statistics

/// Version of the cadiz crate as specified in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod pipeline;

/// Core data model: panels, return series, errors, statistics.
pub mod traits {
    pub use cadiz_traits::*;
}

/// Universe data, fundamental statements, and provider traits.
pub mod data {
    pub use cadiz_data::*;
}

/// Factor signal implementations and the signal registry.
pub mod signals {
    pub use cadiz_signals::*;
}

/// Factor combination strategies.
pub mod combine {
    pub use cadiz_combine::*;
}

/// Portfolio construction and performance evaluation.
pub mod eval {
    pub use cadiz_eval::*;
}

// Re-export the working vocabulary at the top level
pub use cadiz_combine::Combiner;
pub use cadiz_signals::FactorSignal;
pub use cadiz_traits::{CadizError, Date, Panel, Result, ReturnSeries, Symbol};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use cadiz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::pipeline::{run, RunConfig, RunResults};
    pub use cadiz_combine::Combiner;
    pub use cadiz_data::{BenchmarkProvider, MarketDataProvider, UniverseData};
    pub use cadiz_eval::{MetricsConfig, PerformanceMetrics, QuantileConfig};
    pub use cadiz_signals::{compute_factors, default_signals, FactorSignal};
    pub use cadiz_traits::{CadizError, Date, Panel, Result, ReturnSeries, Symbol};
}
