//! Signal registry for discovering and categorizing available factors.

use serde::{Deserialize, Serialize};

/// Factor category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalCategory {
    /// Price momentum signals
    Momentum,
    /// Risk and volatility signals
    Volatility,
    /// Valuation signals
    Value,
    /// Profitability and quality signals
    Quality,
}

impl SignalCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Momentum => "Price momentum and trend-following signals",
            Self::Volatility => "Total and idiosyncratic risk measures",
            Self::Value => "Valuation metrics comparing fundamentals to price",
            Self::Quality => "Profitability and operational efficiency metrics",
        }
    }
}

/// Metadata about a factor signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalInfo {
    /// Unique identifier for the signal
    pub name: &'static str,

    /// Category classification
    pub category: SignalCategory,

    /// Human-readable description
    pub description: &'static str,

    /// Whether the signal requires fundamental data
    pub requires_fundamentals: bool,
}

/// Get information about all available signals.
#[must_use]
pub fn available_signals() -> Vec<SignalInfo> {
    vec![
        SignalInfo {
            name: "momentum",
            category: SignalCategory::Momentum,
            description: "12-month return skipping the most recent month",
            requires_fundamentals: false,
        },
        SignalInfo {
            name: "total_volatility",
            category: SignalCategory::Volatility,
            description: "Annualized 63-day volatility of daily returns, inverted",
            requires_fundamentals: false,
        },
        SignalInfo {
            name: "idio_volatility",
            category: SignalCategory::Volatility,
            description: "Annualized residual volatility from a rolling market model, inverted",
            requires_fundamentals: false,
        },
        SignalInfo {
            name: "earnings_yield",
            category: SignalCategory::Value,
            description: "Trailing-twelve-month earnings relative to price",
            requires_fundamentals: true,
        },
        SignalInfo {
            name: "gross_profitability",
            category: SignalCategory::Quality,
            description: "Gross profit relative to total assets",
            requires_fundamentals: true,
        },
    ]
}

/// Get all signals in a specific category.
#[must_use]
pub fn signals_by_category(category: &SignalCategory) -> Vec<SignalInfo> {
    available_signals()
        .into_iter()
        .filter(|info| &info.category == category)
        .collect()
}

/// Get information about a specific signal by name.
#[must_use]
pub fn get_signal_info(name: &str) -> Option<SignalInfo> {
    available_signals()
        .into_iter()
        .find(|info| info.name == name)
}
