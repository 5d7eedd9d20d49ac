//! Equal-weighted factor combination strategy.

use ndarray::Array2;
use cadiz_traits::{Panel, Result};

use crate::combiner::{validate_conformable, Combiner, FactorPanel};

/// Equal-weighted combiner that averages all factor scores.
///
/// The simplest combination strategy: the composite score is the
/// arithmetic mean of the input z-scores, cell by cell. A missing cell in
/// any factor makes the composite cell missing, so an asset is only ranked
/// by the composite when every factor could rank it. The output is not
/// re-standardized; averaging one factor with itself must reproduce that
/// factor exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualWeightCombiner;

impl Combiner for EqualWeightCombiner {
    fn combine(&self, factors: &[FactorPanel]) -> Result<Panel> {
        validate_conformable(factors)?;
        let template = &factors[0].scores;
        let mut composite = Array2::zeros(template.values().raw_dim());
        for factor in factors {
            composite += factor.scores.values();
        }
        composite /= factors.len() as f64;
        template.with_values(composite)
    }

    fn name(&self) -> &str {
        "equal_weight"
    }
}
