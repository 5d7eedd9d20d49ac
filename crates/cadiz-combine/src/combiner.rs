//! Core trait definition for factor combiners.

use cadiz_traits::{CadizError, Panel, Result};

/// A named factor score panel for combination.
///
/// Each factor contributes a monthly panel of cross-sectional z-scores.
/// The combiner takes several of these and produces one composite panel on
/// the same axes.
#[derive(Debug, Clone)]
pub struct FactorPanel {
    /// Factor name (for weight lookup and diagnostics)
    pub name: String,

    /// Normalized monthly scores for the universe
    pub scores: Panel,
}

impl FactorPanel {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, scores: Panel) -> Self {
        Self {
            name: name.into(),
            scores,
        }
    }
}

/// Checks that every factor panel shares the axes of the first.
///
/// # Errors
///
/// Returns [`CadizError::InvalidData`] for an empty input and
/// [`CadizError::ShapeMismatch`] when axes disagree.
pub fn validate_conformable(factors: &[FactorPanel]) -> Result<()> {
    let Some(first) = factors.first() else {
        return Err(CadizError::InvalidData(
            "cannot combine zero factors".to_string(),
        ));
    };
    for factor in &factors[1..] {
        if factor.scores.dates() != first.scores.dates()
            || factor.scores.assets() != first.scores.assets()
        {
            return Err(CadizError::ShapeMismatch(format!(
                "factor '{}' is not on the same axes as '{}'",
                factor.name, first.name
            )));
        }
    }
    Ok(())
}

/// Combines multiple factor score panels into a composite.
///
/// Implementors define different weighting strategies. All implementations
/// must be thread-safe (Send + Sync). A missing input cell propagates to a
/// missing composite cell; combiners never invent a score for an asset the
/// inputs could not rank.
pub trait Combiner: Send + Sync {
    /// Combine factor panels into a composite score panel.
    ///
    /// # Errors
    ///
    /// Returns an error when no factors are provided or their axes
    /// disagree.
    fn combine(&self, factors: &[FactorPanel]) -> Result<Panel>;

    /// Name of this combination strategy.
    fn name(&self) -> &str;
}
