//! Custom-weighted factor combination strategy.

use std::collections::HashMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use cadiz_traits::{Panel, Result};

use crate::combiner::{validate_conformable, Combiner, FactorPanel};

/// Configuration for the custom-weight combiner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomWeightConfig {
    /// Weight per factor name. A factor absent from the map gets zero
    /// weight and drops out of the composite.
    pub weights: HashMap<String, f64>,
}

/// Weighted-sum combiner with caller-chosen factor weights.
///
/// The composite is `sum(weight_f * score_f)` per cell. Factors without an
/// entry in the weight map contribute nothing. Missing cells in factors
/// with non-zero weight propagate; a zero-weighted factor cannot poison
/// the composite.
#[derive(Debug, Clone)]
pub struct CustomWeightCombiner {
    config: CustomWeightConfig,
}

impl CustomWeightCombiner {
    /// Create a new custom-weight combiner with the given configuration.
    #[must_use]
    pub const fn new(config: CustomWeightConfig) -> Self {
        Self { config }
    }

    /// The weight assigned to `factor`, zero when unspecified.
    pub fn weight(&self, factor: &str) -> f64 {
        self.config.weights.get(factor).copied().unwrap_or(0.0)
    }
}

impl Combiner for CustomWeightCombiner {
    fn combine(&self, factors: &[FactorPanel]) -> Result<Panel> {
        validate_conformable(factors)?;
        let template = &factors[0].scores;

        let mut composite = Array2::zeros(template.values().raw_dim());
        for factor in factors {
            let w = self.weight(&factor.name);
            if w == 0.0 {
                continue;
            }
            composite += &factor.scores.values().map(|v| w * v);
        }
        template.with_values(composite)
    }

    fn name(&self) -> &str {
        "custom"
    }
}
