//! Combination method selection from configuration.

use std::collections::HashMap;

use cadiz_traits::{CadizError, Result};

use crate::combiner::Combiner;
use crate::custom::{CustomWeightCombiner, CustomWeightConfig};
use crate::equal_weight::EqualWeightCombiner;
use crate::rank_sum::RankSumCombiner;

/// Builds the combiner named by a run configuration.
///
/// # Errors
///
/// Misconfiguration is fatal: an unknown method name or a `custom` request
/// without weights returns [`CadizError::Config`] rather than silently
/// falling back to a default.
pub fn parse_method(
    name: &str,
    weights: Option<HashMap<String, f64>>,
) -> Result<Box<dyn Combiner>> {
    match name {
        "equal_weight" => Ok(Box::new(EqualWeightCombiner)),
        "rank_sum" => Ok(Box::new(RankSumCombiner)),
        "custom" => {
            let weights = weights.ok_or_else(|| {
                CadizError::Config(
                    "combine method 'custom' requires factor weights".to_string(),
                )
            })?;
            Ok(Box::new(CustomWeightCombiner::new(CustomWeightConfig {
                weights,
            })))
        }
        other => Err(CadizError::Config(format!(
            "unknown combine method '{other}' (expected equal_weight, rank_sum, or custom)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_methods() {
        assert_eq!(parse_method("equal_weight", None).unwrap().name(), "equal_weight");
        assert_eq!(parse_method("rank_sum", None).unwrap().name(), "rank_sum");

        let weights = HashMap::from([("momentum".to_string(), 1.0)]);
        assert_eq!(parse_method("custom", Some(weights)).unwrap().name(), "custom");
    }

    #[test]
    fn test_unknown_method_is_config_error() {
        let result = parse_method("median", None);
        assert!(matches!(result, Err(CadizError::Config(_))));
    }

    #[test]
    fn test_custom_without_weights_is_config_error() {
        let result = parse_method("custom", None);
        assert!(matches!(result, Err(CadizError::Config(_))));
    }
}
