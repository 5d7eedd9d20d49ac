//! Common types used throughout the Cadiz framework.

use std::collections::BTreeMap;

use chrono::NaiveDate;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier.
///
/// Symbols identify securities across the Cadiz framework. Typically these
/// are ticker symbols like "AAPL" or "MSFT".
pub type Symbol = String;

/// Portfolio holdings at a single rebalance date.
///
/// Weights are stored in a `BTreeMap` so iteration order is deterministic.
/// Long positions carry positive weights, shorts negative; a long-only
/// portfolio sums to 1 by construction.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WeightVector {
    date: NaiveDate,
    weights: BTreeMap<Symbol, f64>,
}

impl WeightVector {
    /// Creates a weight vector for a rebalance date.
    pub const fn new(date: NaiveDate, weights: BTreeMap<Symbol, f64>) -> Self {
        Self { date, weights }
    }

    /// The rebalance date these holdings apply to.
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The holdings, keyed by symbol.
    pub const fn weights(&self) -> &BTreeMap<Symbol, f64> {
        &self.weights
    }

    /// The weight for `symbol`, zero if not held.
    pub fn weight(&self, symbol: &str) -> f64 {
        self.weights.get(symbol).copied().unwrap_or(0.0)
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the portfolio holds nothing.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights; 1.0 for a fully invested long-only book.
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }
}
