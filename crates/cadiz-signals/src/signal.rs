//! The factor signal abstraction.

use cadiz_data::UniverseData;
use cadiz_traits::{Panel, Result};

use crate::registry::SignalCategory;

/// Scores plus diagnostics from one factor computation.
///
/// Notes record non-fatal degradations, an asset skipped for missing line
/// items, a window dropped for sparse coverage. They never carry values,
/// only provenance for the run report.
#[derive(Debug, Clone)]
pub struct SignalOutput {
    /// Cross-sectionally normalized monthly scores, NaN where unknown.
    pub scores: Panel,
    /// Human-readable diagnostic notes accumulated during computation.
    pub notes: Vec<String>,
}

impl SignalOutput {
    /// Wraps a score panel with no diagnostics.
    pub const fn clean(scores: Panel) -> Self {
        Self {
            scores,
            notes: Vec::new(),
        }
    }
}

/// A cross-sectional factor signal.
///
/// Implementations read from [`UniverseData`] strictly point-in-time: the
/// score at month `t` may only depend on information observable at or
/// before `t`. Insufficient history yields missing cells, never zeros, so
/// a short-history asset is excluded from ranking rather than parked at
/// the cross-sectional mean.
pub trait FactorSignal: Send + Sync {
    /// Unique identifier, e.g. `"momentum"`.
    fn name(&self) -> &str;

    /// Category classification for discovery.
    fn category(&self) -> SignalCategory;

    /// Whether the signal reads fundamental statements.
    fn requires_fundamentals(&self) -> bool {
        false
    }

    /// Computes the normalized monthly score panel for the universe.
    fn compute(&self, universe: &UniverseData) -> Result<SignalOutput>;
}
