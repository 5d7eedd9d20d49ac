//! Cross-strategy analysis: return correlations and benchmark alignment.

use cadiz_traits::stats::pearson;
use cadiz_traits::{CadizError, Result, ReturnSeries};

/// A symmetric correlation matrix over named return streams.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Strategy names in matrix order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The full matrix, row major. Diagonal entries are 1.
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Correlation between two strategies by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[i][j])
    }

    /// Renders the matrix as a fixed-width ASCII table.
    #[must_use]
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("{:<20}", ""));
        for name in &self.names {
            output.push_str(&format!(" {name:>12.12}"));
        }
        output.push('\n');
        for (i, name) in self.names.iter().enumerate() {
            output.push_str(&format!("{name:<20}"));
            for v in &self.values[i] {
                if v.is_finite() {
                    output.push_str(&format!(" {v:>12.3}"));
                } else {
                    output.push_str(&format!(" {:>12}", "--"));
                }
            }
            output.push('\n');
        }
        output
    }
}

/// Computes pairwise return correlations across strategies.
///
/// Each pair is aligned on its common dates with missing observations
/// dropped; pairs with fewer than two overlapping observations get `NaN`.
pub fn correlation_matrix(series: &[&ReturnSeries]) -> Result<CorrelationMatrix> {
    if series.is_empty() {
        return Err(CadizError::InvalidData(
            "correlation matrix requires at least one return series".into(),
        ));
    }
    let names: Vec<String> = series.iter().map(|s| s.name().to_string()).collect();
    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let corr = pairwise_correlation(series[i], series[j]);
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }
    Ok(CorrelationMatrix { names, values })
}

fn pairwise_correlation(a: &ReturnSeries, b: &ReturnSeries) -> f64 {
    let (xs, ys) = paired_observations(a, b);
    if xs.len() < 2 {
        return f64::NAN;
    }
    pearson(&xs, &ys)
}

/// Collects the jointly non-missing observations of two series.
fn paired_observations(a: &ReturnSeries, b: &ReturnSeries) -> (Vec<f64>, Vec<f64>) {
    let (aligned_a, aligned_b) = a.align_intersect(b);
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (x, y) in aligned_a.values().iter().zip(aligned_b.values()) {
        if x.is_finite() && y.is_finite() {
            xs.push(*x);
            ys.push(*y);
        }
    }
    (xs, ys)
}

/// Restricts a benchmark series to the strategy's calendar.
///
/// The benchmark typically covers a wider date range than the backtest;
/// comparisons are only meaningful over the common dates.
pub fn align_benchmark(strategy: &ReturnSeries, benchmark: &ReturnSeries) -> ReturnSeries {
    let (_, aligned) = strategy.align_intersect(benchmark);
    aligned
}
