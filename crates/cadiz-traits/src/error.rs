//! Error types for the Cadiz framework.
//!
//! This module defines the error types used throughout the Cadiz ecosystem.
//! Per-cell data problems (a short history, a missing price) are not errors;
//! they surface as NaN cells in the affected panel. Errors are reserved for
//! conditions that invalidate an operation as a whole, with configuration
//! mistakes treated as fatal.

use thiserror::Error;

/// The main error type for Cadiz operations.
///
/// This enum encompasses all error cases that can occur when computing
/// factor signals, constructing portfolios, and evaluating performance.
#[derive(Debug, Error)]
pub enum CadizError {
    /// Error during factor signal computation.
    #[error("Signal computation failed: {0}")]
    SignalComputation(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from the data.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error when a fundamental line item cannot be resolved for a symbol.
    #[error("Unresolvable line item '{item}' for {symbol}")]
    LineItemNotFound {
        /// Security identifier whose statement lacks the line item.
        symbol: String,
        /// Canonical name of the line item that could not be matched.
        item: String,
    },

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Error when data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Error when a symbol is not found in the universe.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Error when a date is out of range or invalid.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error in user-supplied configuration. Always fatal.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when two panels or series cannot be conformed.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for CadizError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for CadizError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Cadiz operations.
///
/// This is a convenience type that uses [`CadizError`] as the error type.
pub type Result<T> = std::result::Result<T, CadizError>;
