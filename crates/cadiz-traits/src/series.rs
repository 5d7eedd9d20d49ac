//! Named time series of periodic returns.

use chrono::NaiveDate;

use crate::error::{CadizError, Result};

/// A named sequence of dated observations, typically periodic returns.
///
/// Dates are strictly increasing and `NaN` encodes a missing observation.
/// Statistics such as [`mean`](Self::mean) and [`std`](Self::std) skip
/// missing values the way the panel layer does.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReturnSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Creates a series from parallel date and value vectors.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::ShapeMismatch`] when the vectors differ in
    /// length and [`CadizError::InvalidData`] when dates are not strictly
    /// increasing.
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(CadizError::ShapeMismatch(format!(
                "{} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CadizError::InvalidData(
                "series dates must be strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            dates,
            values,
        })
    }

    /// An empty series with the given name.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dates: Vec::new(),
            values: Vec::new(),
        }
    }

    /// The series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of the series under a new name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dates: self.dates.clone(),
            values: self.values.clone(),
        }
    }

    /// The date axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The observation values, parallel to [`dates`](Self::dates).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations, missing included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The observation at `date`, if on the calendar.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        let idx = self.dates.binary_search(&date).ok()?;
        Some(self.values[idx])
    }

    /// Iterates over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Drops missing observations, keeping the name.
    pub fn dropna(&self) -> Self {
        let (dates, values) = self
            .iter()
            .filter(|(_, v)| v.is_finite())
            .unzip();
        Self {
            name: self.name.clone(),
            dates,
            values,
        }
    }

    /// Mean over finite observations; `NaN` when none exist.
    pub fn mean(&self) -> f64 {
        let finite: Vec<f64> = self.values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            f64::NAN
        } else {
            finite.iter().sum::<f64>() / finite.len() as f64
        }
    }

    /// Sample standard deviation over finite observations; `NaN` below two.
    pub fn std(&self) -> f64 {
        let finite: Vec<f64> = self.values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.len() < 2 {
            return f64::NAN;
        }
        let mean = finite.iter().sum::<f64>() / finite.len() as f64;
        let var = finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / (finite.len() - 1) as f64;
        var.sqrt()
    }

    /// Restricts both series to their common dates, in order.
    pub fn align_intersect(&self, other: &Self) -> (Self, Self) {
        let common: Vec<NaiveDate> = self
            .dates
            .iter()
            .copied()
            .filter(|d| other.dates.binary_search(d).is_ok())
            .collect();
        let pick = |s: &Self| Self {
            name: s.name.clone(),
            dates: common.clone(),
            values: common
                .iter()
                .map(|d| s.get(*d).unwrap_or(f64::NAN))
                .collect(),
        };
        (pick(self), pick(other))
    }
}
