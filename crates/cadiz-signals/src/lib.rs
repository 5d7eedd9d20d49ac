//! Factor signal implementations for the Cadiz backtesting pipeline.
//!
//! This crate provides the cross-sectional factor library:
//! - Momentum: 12-month price momentum skipping the most recent month
//! - Volatility: total and idiosyncratic volatility, sign-inverted
//! - Value: trailing-twelve-month earnings yield
//! - Quality: gross profitability
//!
//! Each signal produces a monthly, cross-sectionally normalized score
//! panel (mean=0, std=1 per date) with `NaN` wherever the inputs were
//! insufficient.
//!
//! # Example
//!
//! ```ignore
//! use cadiz_signals::momentum::Momentum;
//! use cadiz_signals::registry::available_signals;
//! use cadiz_signals::FactorSignal;
//!
//! let signal = Momentum::default();
//! let output = signal.compute(&universe)?;
//!
//! // Discover available signals
//! let signals = available_signals();
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod idio_vol;
pub mod library;
pub mod momentum;
pub mod quality;
pub mod registry;
pub mod signal;
pub mod value;
pub mod volatility;

// Re-export key types
pub use library::{compute_factors, default_signals, FactorSet};
pub use registry::{SignalCategory, SignalInfo};
pub use signal::{FactorSignal, SignalOutput};
