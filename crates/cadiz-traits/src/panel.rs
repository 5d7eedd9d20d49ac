//! Date-by-asset panel of floating point observations.
//!
//! A [`Panel`] is the dense rectangular container used for prices, returns,
//! and factor scores throughout Cadiz: rows are dates in strictly increasing
//! order, columns are assets, and `NaN` encodes a missing observation. All
//! transformations produce new panels; nothing mutates in place.

use chrono::{Datelike, NaiveDate};
use ndarray::{Array2, ArrayView1};

use crate::error::{CadizError, Result};

/// Returns the last calendar day of the month containing `date`.
///
/// Used when resampling daily panels so that monthly labels line up with
/// month-end labelled price panels regardless of which trading day closed
/// the month.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (y, m) = (date.year(), date.month());
    let first_of_next = if m == 12 {
        NaiveDate::from_ymd_opt(y + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(y, m + 1, 1)
    };
    // Both branches construct the first of a valid month.
    first_of_next
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

/// A dates-by-assets matrix of `f64` observations with `NaN` as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
    values: Array2<f64>,
}

impl Panel {
    /// Creates a panel from its parts, validating shape and ordering.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::ShapeMismatch`] when the matrix dimensions do
    /// not agree with the axis labels, and [`CadizError::InvalidData`] when
    /// dates are not strictly increasing or assets repeat.
    pub fn new(dates: Vec<NaiveDate>, assets: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if values.nrows() != dates.len() || values.ncols() != assets.len() {
            return Err(CadizError::ShapeMismatch(format!(
                "values are {}x{} but axes are {} dates x {} assets",
                values.nrows(),
                values.ncols(),
                dates.len(),
                assets.len()
            )));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CadizError::InvalidData(
                "panel dates must be strictly increasing".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::with_capacity(assets.len());
        for asset in &assets {
            if !seen.insert(asset.as_str()) {
                return Err(CadizError::InvalidData(format!(
                    "duplicate asset column: {asset}"
                )));
            }
        }
        Ok(Self {
            dates,
            assets,
            values,
        })
    }

    /// Creates a panel filled with a constant value.
    pub fn filled(dates: Vec<NaiveDate>, assets: Vec<String>, fill: f64) -> Result<Self> {
        let values = Array2::from_elem((dates.len(), assets.len()), fill);
        Self::new(dates, assets, values)
    }

    /// The date axis, strictly increasing.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The asset axis, unique labels in column order.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// The underlying matrix, rows = dates, columns = assets.
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of dates.
    pub fn num_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of assets.
    pub fn num_assets(&self) -> usize {
        self.assets.len()
    }

    /// Whether the panel has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.assets.is_empty()
    }

    /// Position of `date` on the date axis, if present.
    pub fn date_index(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Position of `asset` on the asset axis, if present.
    pub fn asset_index(&self, asset: &str) -> Option<usize> {
        self.assets.iter().position(|a| a == asset)
    }

    /// Observation at `(date, asset)`; `None` when either label is absent.
    pub fn get(&self, date: NaiveDate, asset: &str) -> Option<f64> {
        let r = self.date_index(date)?;
        let c = self.asset_index(asset)?;
        Some(self.values[(r, c)])
    }

    /// View of the cross-section at row `idx`.
    pub fn row(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.values.row(idx)
    }

    /// View of the history for the asset at column `idx`.
    pub fn column(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.values.column(idx)
    }

    /// Simple returns over `periods` rows: `v[t] / v[t - periods] - 1`.
    ///
    /// The first `periods` rows are missing, as is any cell where either
    /// endpoint is missing or the denominator is zero.
    pub fn pct_change(&self, periods: usize) -> Self {
        let mut out = Array2::from_elem(self.values.raw_dim(), f64::NAN);
        for t in periods..self.dates.len() {
            for j in 0..self.assets.len() {
                let prev = self.values[(t - periods, j)];
                let curr = self.values[(t, j)];
                if prev.is_finite() && curr.is_finite() && prev != 0.0 {
                    out[(t, j)] = curr / prev - 1.0;
                }
            }
        }
        Self {
            dates: self.dates.clone(),
            assets: self.assets.clone(),
            values: out,
        }
    }

    /// Shifts observations forward in time by `lag` rows.
    ///
    /// Row `t` of the result holds row `t - lag` of the input; the first
    /// `lag` rows are missing. A zero lag is the identity.
    pub fn shift(&self, lag: usize) -> Self {
        let mut out = Array2::from_elem(self.values.raw_dim(), f64::NAN);
        for t in lag..self.dates.len() {
            for j in 0..self.assets.len() {
                out[(t, j)] = self.values[(t - lag, j)];
            }
        }
        Self {
            dates: self.dates.clone(),
            assets: self.assets.clone(),
            values: out,
        }
    }

    /// Rolling sample standard deviation per column.
    ///
    /// At row `t` the window covers rows `t + 1 - window ..= t`. A cell is
    /// missing until a full window of rows exists, or when fewer than
    /// `min_periods` finite observations (and at least two) fall inside it.
    pub fn rolling_std(&self, window: usize, min_periods: usize) -> Self {
        let mut out = Array2::from_elem(self.values.raw_dim(), f64::NAN);
        for j in 0..self.assets.len() {
            for t in 0..self.dates.len() {
                if t + 1 < window {
                    continue;
                }
                let start = t + 1 - window;
                let mut finite: Vec<f64> = Vec::with_capacity(window);
                for r in start..=t {
                    let v = self.values[(r, j)];
                    if v.is_finite() {
                        finite.push(v);
                    }
                }
                let n = finite.len();
                if n < min_periods.max(2) {
                    continue;
                }
                let mean = finite.iter().sum::<f64>() / n as f64;
                let var =
                    finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
                out[(t, j)] = var.sqrt();
            }
        }
        Self {
            dates: self.dates.clone(),
            assets: self.assets.clone(),
            values: out,
        }
    }

    /// Keeps the last row of each calendar month, relabelled to month end.
    ///
    /// Month-end labels keep daily-derived panels joinable with monthly
    /// price panels even when the final trading day varies.
    pub fn resample_month_end(&self) -> Self {
        let mut keep: Vec<usize> = Vec::new();
        for (i, d) in self.dates.iter().enumerate() {
            let last_of_month = match self.dates.get(i + 1) {
                Some(next) => (next.year(), next.month()) != (d.year(), d.month()),
                None => true,
            };
            if last_of_month {
                keep.push(i);
            }
        }
        let dates: Vec<NaiveDate> = keep.iter().map(|&i| month_end(self.dates[i])).collect();
        let mut values = Array2::from_elem((keep.len(), self.assets.len()), f64::NAN);
        for (r, &i) in keep.iter().enumerate() {
            values.row_mut(r).assign(&self.values.row(i));
        }
        Self {
            dates,
            assets: self.assets.clone(),
            values,
        }
    }

    /// Restricts the panel to the given asset columns, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::SymbolNotFound`] when a requested asset is not
    /// a column of the panel.
    pub fn select_assets(&self, assets: &[String]) -> Result<Self> {
        let mut cols = Vec::with_capacity(assets.len());
        for asset in assets {
            match self.asset_index(asset) {
                Some(c) => cols.push(c),
                None => return Err(CadizError::SymbolNotFound(asset.clone())),
            }
        }
        let mut values = Array2::from_elem((self.dates.len(), cols.len()), f64::NAN);
        for (out_c, &c) in cols.iter().enumerate() {
            values.column_mut(out_c).assign(&self.values.column(c));
        }
        Self::new(self.dates.clone(), assets.to_vec(), values)
    }

    /// Restricts the panel to the given date rows, which must be a subset
    /// of its calendar in increasing order.
    pub fn select_dates(&self, dates: &[NaiveDate]) -> Result<Self> {
        let mut values = Array2::from_elem((dates.len(), self.assets.len()), f64::NAN);
        for (r, &d) in dates.iter().enumerate() {
            let Some(i) = self.date_index(d) else {
                return Err(CadizError::InvalidDate(format!(
                    "{d} is not on the panel calendar"
                )));
            };
            values.row_mut(r).assign(&self.values.row(i));
        }
        Self::new(dates.to_vec(), self.assets.clone(), values)
    }

    /// Restricts the panel to rows within `[start, end]` inclusive.
    pub fn slice_dates(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let keep: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| **d >= start && **d <= end)
            .map(|(i, _)| i)
            .collect();
        let dates: Vec<NaiveDate> = keep.iter().map(|&i| self.dates[i]).collect();
        let mut values = Array2::from_elem((keep.len(), self.assets.len()), f64::NAN);
        for (r, &i) in keep.iter().enumerate() {
            values.row_mut(r).assign(&self.values.row(i));
        }
        Self {
            dates,
            assets: self.assets.clone(),
            values,
        }
    }

    /// Applies `f` to every cell, preserving labels.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            dates: self.dates.clone(),
            assets: self.assets.clone(),
            values: self.values.map(|&v| f(v)),
        }
    }

    /// Replaces the matrix, keeping the axes. Shapes must agree.
    pub fn with_values(&self, values: Array2<f64>) -> Result<Self> {
        Self::new(self.dates.clone(), self.assets.clone(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_panel() -> Panel {
        Panel::new(
            vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)],
            vec!["AAA".to_string(), "BBB".to_string()],
            array![
                [100.0, 50.0],
                [110.0, 45.0],
                [121.0, f64::NAN],
                [133.1, 40.5]
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_shape_mismatch() {
        let result = Panel::new(
            vec![d(2024, 1, 31)],
            vec!["AAA".to_string(), "BBB".to_string()],
            array![[1.0]],
        );
        assert!(matches!(result, Err(CadizError::ShapeMismatch(_))));
    }

    #[test]
    fn test_new_rejects_unsorted_dates() {
        let result = Panel::new(
            vec![d(2024, 2, 29), d(2024, 1, 31)],
            vec!["AAA".to_string()],
            array![[1.0], [2.0]],
        );
        assert!(matches!(result, Err(CadizError::InvalidData(_))));
    }

    #[test]
    fn test_new_rejects_duplicate_assets() {
        let result = Panel::new(
            vec![d(2024, 1, 31)],
            vec!["AAA".to_string(), "AAA".to_string()],
            array![[1.0, 2.0]],
        );
        assert!(matches!(result, Err(CadizError::InvalidData(_))));
    }

    #[test]
    fn test_pct_change() {
        let panel = sample_panel();
        let returns = panel.pct_change(1);

        assert!(returns.values()[(0, 0)].is_nan());
        assert_relative_eq!(returns.values()[(1, 0)], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns.values()[(1, 1)], -0.10, epsilon = 1e-12);
        // NaN endpoint on either side stays missing
        assert!(returns.values()[(2, 1)].is_nan());
        assert!(returns.values()[(3, 1)].is_nan());
    }

    #[test]
    fn test_shift_pushes_rows_forward() {
        let panel = sample_panel();
        let shifted = panel.shift(1);

        assert!(shifted.values()[(0, 0)].is_nan());
        assert_relative_eq!(shifted.values()[(1, 0)], 100.0);
        assert_relative_eq!(shifted.values()[(3, 0)], 121.0);
    }

    #[test]
    fn test_rolling_std_window() {
        let panel = Panel::new(
            vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)],
            vec!["AAA".to_string()],
            array![[1.0], [2.0], [3.0], [4.0]],
        )
        .unwrap();
        let std = panel.rolling_std(3, 3);

        assert!(std.values()[(0, 0)].is_nan());
        assert!(std.values()[(1, 0)].is_nan());
        // std([1,2,3]) = 1 with ddof=1
        assert_relative_eq!(std.values()[(2, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(std.values()[(3, 0)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rolling_std_respects_min_periods() {
        let panel = Panel::new(
            vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3)],
            vec!["AAA".to_string()],
            array![[1.0], [f64::NAN], [3.0]],
        )
        .unwrap();
        // Only two finite values in the window but three required.
        let std = panel.rolling_std(3, 3);
        assert!(std.values()[(2, 0)].is_nan());

        let std = panel.rolling_std(3, 2);
        assert!(std.values()[(2, 0)].is_finite());
    }

    #[test]
    fn test_resample_month_end() {
        let panel = Panel::new(
            vec![d(2024, 1, 30), d(2024, 1, 31), d(2024, 2, 28), d(2024, 3, 14)],
            vec!["AAA".to_string()],
            array![[1.0], [2.0], [3.0], [4.0]],
        )
        .unwrap();
        let monthly = panel.resample_month_end();

        assert_eq!(
            monthly.dates(),
            &[d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31)]
        );
        assert_relative_eq!(monthly.values()[(0, 0)], 2.0);
        assert_relative_eq!(monthly.values()[(1, 0)], 3.0);
        assert_relative_eq!(monthly.values()[(2, 0)], 4.0);
    }

    #[test]
    fn test_month_end_labels() {
        assert_eq!(month_end(d(2024, 2, 3)), d(2024, 2, 29));
        assert_eq!(month_end(d(2023, 12, 15)), d(2023, 12, 31));
        assert_eq!(month_end(d(2024, 4, 30)), d(2024, 4, 30));
    }

    #[test]
    fn test_select_assets_reorders() {
        let panel = sample_panel();
        let selected = panel
            .select_assets(&["BBB".to_string(), "AAA".to_string()])
            .unwrap();
        assert_eq!(selected.assets(), &["BBB".to_string(), "AAA".to_string()]);
        assert_relative_eq!(selected.values()[(0, 0)], 50.0);
        assert_relative_eq!(selected.values()[(0, 1)], 100.0);
    }

    #[test]
    fn test_select_assets_unknown_symbol() {
        let panel = sample_panel();
        let result = panel.select_assets(&["ZZZ".to_string()]);
        assert!(matches!(result, Err(CadizError::SymbolNotFound(_))));
    }

    #[test]
    fn test_slice_dates() {
        let panel = sample_panel();
        let sliced = panel.slice_dates(d(2024, 2, 1), d(2024, 3, 31));
        assert_eq!(sliced.dates(), &[d(2024, 2, 29), d(2024, 3, 31)]);
    }
}
