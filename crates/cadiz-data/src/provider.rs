//! Data provider traits.
//!
//! The pipeline never fetches anything itself; callers hand it
//! implementations of these traits. Production code wires in a vendor
//! client, tests and the CLI wire in deterministic synthetic data.

use cadiz_traits::{Date, Result, ReturnSeries, Symbol};

use crate::universe::UniverseData;

/// Source of price and fundamental data for a universe of securities.
pub trait MarketDataProvider: Send + Sync {
    /// Assembles universe data for `symbols` between `start` and `end`.
    ///
    /// Implementations should isolate per-symbol failures: a symbol whose
    /// data cannot be retrieved is omitted from the result rather than
    /// failing the whole request.
    fn universe(&self, symbols: &[Symbol], start: Date, end: Date) -> Result<UniverseData>;
}

/// Source of benchmark return series.
pub trait BenchmarkProvider: Send + Sync {
    /// Periodic (monthly) returns for the benchmark `symbol`.
    fn benchmark_returns(&self, symbol: &str, start: Date, end: Date) -> Result<ReturnSeries>;
}
