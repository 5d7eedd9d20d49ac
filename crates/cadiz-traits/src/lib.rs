#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cadiz/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the Cadiz factor backtesting framework.
//!
//! This crate provides the foundational data structures shared by every
//! other Cadiz crate: the date-by-asset [`Panel`], the [`ReturnSeries`]
//! produced by portfolio simulation, point-in-time alignment, and the
//! cross-sectional statistics used by factor signals.

/// The version of the cadiz-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod align;
pub mod error;
pub mod panel;
pub mod series;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{CadizError, Result};
pub use panel::Panel;
pub use series::ReturnSeries;
pub use types::{Date, Symbol, WeightVector};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
