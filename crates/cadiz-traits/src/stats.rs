//! Statistical utility functions for factor processing.
//!
//! This module provides the cross-sectional z-score used by every factor
//! signal, plus the small numeric helpers shared by the evaluation layer.

use crate::panel::Panel;

/// Minimum threshold for standard deviation to avoid division by zero.
/// Cross-sections with dispersion below this are treated as degenerate.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

/// Z-score standardization result containing computed statistics.
#[derive(Debug, Clone, Copy)]
pub struct StandardizeResult {
    /// The computed mean of the finite input values.
    pub mean: f64,
    /// The computed sample standard deviation (N-1 denominator).
    pub std: f64,
    /// Whether the standardization was applied (false if the cross-section
    /// was degenerate).
    pub applied: bool,
}

/// Standardize a slice of f64 values to z-scores (mean=0, std=1).
///
/// Uses sample standard deviation (N-1 denominator). Statistics are
/// computed over finite values only; missing (`NaN`) inputs stay missing in
/// the output. A degenerate cross-section, fewer than two finite values or
/// dispersion below [`MIN_STD_THRESHOLD`], maps every finite value to zero.
///
/// # Examples
///
/// ```
/// use cadiz_traits::stats::standardize;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let (scores, result) = standardize(&values);
///
/// assert!(result.applied);
/// assert!((result.mean - 3.0).abs() < 1e-10);
/// assert!((scores[2]).abs() < 1e-10);
/// ```
pub fn standardize(values: &[f64]) -> (Vec<f64>, StandardizeResult) {
    let finite: Vec<f64> = values.iter().filter(|x| x.is_finite()).copied().collect();
    if finite.is_empty() {
        return (
            vec![f64::NAN; values.len()],
            StandardizeResult {
                mean: f64::NAN,
                std: f64::NAN,
                applied: false,
            },
        );
    }

    let n = finite.len();
    let mean = finite.iter().sum::<f64>() / n as f64;

    // Sample variance with N-1 denominator (Bessel's correction)
    let variance = if n > 1 {
        finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };
    let std = variance.sqrt();

    let applied = std > MIN_STD_THRESHOLD;

    let standardized = values
        .iter()
        .map(|x| {
            if !x.is_finite() {
                f64::NAN
            } else if applied {
                (x - mean) / std
            } else {
                0.0
            }
        })
        .collect();

    (standardized, StandardizeResult { mean, std, applied })
}

/// Cross-sectionally normalizes a panel, one z-score per date row.
///
/// Each row is standardized independently via [`standardize`], so scores on
/// different dates are comparable. Missing cells stay missing; degenerate
/// rows come back as zeros at their finite cells.
pub fn normalize(panel: &Panel) -> Panel {
    let mut values = panel.values().clone();
    for mut row in values.rows_mut() {
        let cross_section = row.to_vec();
        let (scores, _) = standardize(&cross_section);
        for (cell, score) in row.iter_mut().zip(scores) {
            *cell = score;
        }
    }
    // Axes unchanged, only values replaced; reconstruction cannot fail.
    panel.with_values(values).unwrap_or_else(|_| panel.clone())
}

/// Pearson correlation over pairwise finite observations.
///
/// Returns `NaN` when fewer than two pairs exist or either side is
/// degenerate.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n as f64;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        cov += (a - mean_x) * (b - mean_y);
        var_x += (a - mean_x).powi(2);
        var_y += (b - mean_y).powi(2);
    }
    let denom = (var_x * var_y).sqrt();
    if denom <= MIN_STD_THRESHOLD {
        f64::NAN
    } else {
        cov / denom
    }
}

/// Linear-interpolation quantile of the finite values in `values`.
///
/// Matches the common statistical definition where the quantile at
/// probability `q` interpolates between order statistics. Returns `NaN`
/// when no finite values exist or `q` lies outside `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    let mut finite: Vec<f64> = values.iter().filter(|x| x.is_finite()).copied().collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.sort_by(|a, b| a.total_cmp(b));
    let n = finite.len();
    if n == 1 {
        return finite[0];
    }
    let pos = q * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    finite[lower] + (finite[upper] - finite[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use ndarray::array;

    #[test]
    fn test_standardize_basic() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let (standardized, result) = standardize(&values);

        assert!(result.applied);
        assert_relative_eq!(result.mean, 3.0, epsilon = 1e-12);

        let mean: f64 = standardized.iter().sum::<f64>() / standardized.len() as f64;
        assert!(mean.abs() < 1e-10);

        let var: f64 = standardized.iter().map(|x| x.powi(2)).sum::<f64>()
            / (standardized.len() - 1) as f64;
        assert_relative_eq!(var.sqrt(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_standardize_empty() {
        let values: Vec<f64> = vec![];
        let (standardized, result) = standardize(&values);

        assert!(standardized.is_empty());
        assert!(!result.applied);
        assert!(result.mean.is_nan());
    }

    #[test]
    fn test_standardize_single_value() {
        let values = vec![42.0];
        let (standardized, result) = standardize(&values);

        assert!(!result.applied);
        assert!(standardized[0].abs() < 1e-10);
    }

    #[test]
    fn test_standardize_constant_values() {
        let values = vec![5.0, 5.0, 5.0, 5.0];
        let (standardized, result) = standardize(&values);

        assert!(!result.applied);
        assert!(standardized.iter().all(|&x| x.abs() < 1e-10));
    }

    #[test]
    fn test_standardize_preserves_missing() {
        let values = vec![1.0, 2.0, f64::NAN, 4.0, 5.0];
        let (standardized, result) = standardize(&values);

        assert!(result.applied);
        // Mean computed from finite values only
        assert_relative_eq!(result.mean, 3.0, epsilon = 1e-12);
        assert!(standardized[2].is_nan());
    }

    #[test]
    fn test_standardize_degenerate_keeps_missing() {
        let values = vec![5.0, f64::NAN, 5.0];
        let (standardized, result) = standardize(&values);

        assert!(!result.applied);
        assert!(standardized[0].abs() < 1e-10);
        assert!(standardized[1].is_nan());
    }

    #[test]
    fn test_normalize_rows_independent() {
        let panel = Panel::new(
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            ],
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            array![[1.0, 2.0, 3.0], [10.0, 10.0, 10.0]],
        )
        .unwrap();

        let normalized = normalize(&panel);

        // First row standardizes to a symmetric z-score
        let row0: Vec<f64> = normalized.row(0).to_vec();
        let mean: f64 = row0.iter().sum::<f64>() / 3.0;
        assert!(mean.abs() < 1e-10);
        assert_relative_eq!(row0[1], 0.0, epsilon = 1e-10);

        // Constant row is degenerate and maps to zeros
        assert!(normalized.row(1).iter().all(|v| v.abs() < 1e-10));
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert_relative_eq!(pearson(&x, &y), 1.0, epsilon = 1e-12);

        let neg: Vec<f64> = y.iter().map(|v| -v).collect();
        assert_relative_eq!(pearson(&x, &neg), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_skips_missing_pairs() {
        let x = [1.0, f64::NAN, 3.0, 4.0];
        let y = [2.0, 100.0, 6.0, 8.0];
        assert_relative_eq!(pearson(&x, &y), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile(&values, 0.5), 2.5, epsilon = 1e-12);
        assert_relative_eq!(quantile(&values, 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(quantile(&values, 1.0), 4.0, epsilon = 1e-12);
        // 0.8 quantile of 4 points sits at position 2.4
        assert_relative_eq!(quantile(&values, 0.8), 3.4, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_ignores_missing() {
        let values = [1.0, f64::NAN, 3.0];
        assert_relative_eq!(quantile(&values, 0.5), 2.0, epsilon = 1e-12);
        assert!(quantile(&[f64::NAN], 0.5).is_nan());
    }
}
