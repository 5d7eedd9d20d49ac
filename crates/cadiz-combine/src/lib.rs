//! Factor combination strategies for Cadiz composite portfolios.
//!
//! This crate provides methods for combining multiple factor score panels
//! into a single composite panel: equal weighting, rank summation, and
//! caller-supplied custom weights. Combiners operate on whole panels so a
//! composite can be fed straight into the portfolio constructor.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cadiz_combine::{Combiner, EqualWeightCombiner, FactorPanel};
//! # fn scores() -> cadiz_traits::Panel { unimplemented!() }
//!
//! let combiner = EqualWeightCombiner;
//! let factors = vec![
//!     FactorPanel::new("momentum", scores()),
//!     FactorPanel::new("earnings_yield", scores()),
//! ];
//!
//! let composite = combiner.combine(&factors).unwrap();
//! ```

mod combiner;
mod custom;
mod equal_weight;
mod method;
mod rank_sum;

// Re-export main types
pub use combiner::{validate_conformable, Combiner, FactorPanel};
pub use custom::{CustomWeightCombiner, CustomWeightConfig};
pub use equal_weight::EqualWeightCombiner;
pub use method::parse_method;
pub use rank_sum::RankSumCombiner;
