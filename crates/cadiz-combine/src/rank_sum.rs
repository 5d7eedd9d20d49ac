//! Rank-sum factor combination strategy.

use ndarray::Array2;
use cadiz_traits::{Panel, Result};

use crate::combiner::{validate_conformable, Combiner, FactorPanel};

/// Descending ranks with tie averaging: the highest value gets rank 1.
///
/// Missing values receive a missing rank and do not consume a rank slot.
fn descending_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len())
        .filter(|&i| values[i].is_finite())
        .collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut ranks = vec![f64::NAN; values.len()];
    let mut i = 0;
    while i < order.len() {
        // Group ties and assign the average of their rank positions
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }
    ranks
}

/// Rank-based combiner robust to outlier z-scores.
///
/// Each factor's cross-section is converted to descending ranks (best
/// asset gets rank 1), the ranks are summed across factors, and the sum is
/// negated so that higher composite still means better. An asset missing
/// from any factor's ranking has a missing composite score.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankSumCombiner;

impl Combiner for RankSumCombiner {
    fn combine(&self, factors: &[FactorPanel]) -> Result<Panel> {
        validate_conformable(factors)?;
        let template = &factors[0].scores;
        let (n, k) = (template.num_dates(), template.num_assets());

        let mut composite: Array2<f64> = Array2::zeros((n, k));
        for factor in factors {
            for t in 0..n {
                let row: Vec<f64> = factor.scores.row(t).to_vec();
                let ranks = descending_ranks(&row);
                for j in 0..k {
                    composite[(t, j)] += ranks[j];
                }
            }
        }
        // Lower rank sums are better; negate to keep "higher is better"
        composite.mapv_inplace(|v| -v);
        template.with_values(composite)
    }

    fn name(&self) -> &str {
        "rank_sum"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use ndarray::array;

    fn panel(values: ndarray::Array2<f64>) -> Panel {
        Panel::new(
            vec![NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()],
            (0..values.ncols()).map(|i| format!("A{i}")).collect(),
            values,
        )
        .unwrap()
    }

    #[test]
    fn test_descending_ranks_with_ties() {
        let ranks = descending_ranks(&[3.0, 1.0, 3.0, 2.0]);
        // The two 3.0s tie for ranks 1 and 2
        assert_relative_eq!(ranks[0], 1.5);
        assert_relative_eq!(ranks[2], 1.5);
        assert_relative_eq!(ranks[3], 3.0);
        assert_relative_eq!(ranks[1], 4.0);
    }

    #[test]
    fn test_descending_ranks_skip_missing() {
        let ranks = descending_ranks(&[2.0, f64::NAN, 1.0]);
        assert_relative_eq!(ranks[0], 1.0);
        assert!(ranks[1].is_nan());
        assert_relative_eq!(ranks[2], 2.0);
    }

    #[test]
    fn test_rank_sum_orders_composite() {
        let factors = vec![
            FactorPanel::new("mom", panel(array![[2.0, 1.0, 0.0]])),
            FactorPanel::new("val", panel(array![[1.0, 2.0, 0.0]])),
        ];
        let composite = RankSumCombiner.combine(&factors).unwrap();

        // A0 and A1 each sum ranks 1 + 2 = 3; A2 sums 3 + 3 = 6
        assert_relative_eq!(composite.values()[(0, 0)], -3.0);
        assert_relative_eq!(composite.values()[(0, 1)], -3.0);
        assert_relative_eq!(composite.values()[(0, 2)], -6.0);
    }

    #[test]
    fn test_missing_factor_cell_propagates() {
        let factors = vec![
            FactorPanel::new("mom", panel(array![[2.0, f64::NAN, 0.0]])),
            FactorPanel::new("val", panel(array![[1.0, 2.0, 0.0]])),
        ];
        let composite = RankSumCombiner.combine(&factors).unwrap();
        assert!(composite.values()[(0, 1)].is_nan());
        assert!(composite.values()[(0, 0)].is_finite());
    }
}
