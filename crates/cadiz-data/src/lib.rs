//! Market and fundamental data boundary for Cadiz.
//!
//! This crate owns everything that touches raw vendor data: the
//! [`UniverseData`] container the pipeline consumes, fundamental statement
//! tables with fuzzy line-item resolution, and the provider traits that
//! keep retrieval outside the framework.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cadiz_data::{FundamentalStatement, LineItem, UniverseData};
//!
//! let statement = FundamentalStatement::new("AAPL", df)?;
//! let revenue = statement.line_item(LineItem::Revenue)?;
//! ```

#![warn(missing_docs)]

pub mod line_items;
pub mod provider;
pub mod statement;
pub mod universe;

pub use line_items::LineItem;
pub use provider::{BenchmarkProvider, MarketDataProvider};
pub use statement::FundamentalStatement;
pub use universe::UniverseData;
