//! Fundamental statement tables.

use chrono::NaiveDate;
use polars::prelude::*;

use cadiz_traits::{CadizError, Result, Symbol};

use crate::line_items::{self, LineItem};

/// A dated fundamental statement for one security.
///
/// Wraps a Polars DataFrame with a `date` column plus vendor-named line-item
/// columns. Line items are read through the fuzzy resolver in
/// [`line_items`], so column spelling differences stay contained here.
#[derive(Debug, Clone)]
pub struct FundamentalStatement {
    symbol: Symbol,
    data: DataFrame,
}

impl FundamentalStatement {
    /// Creates a statement table, requiring a `date` column.
    pub fn new(symbol: impl Into<Symbol>, data: DataFrame) -> Result<Self> {
        if data.column("date").is_err() {
            return Err(CadizError::MissingColumn("date".to_string()));
        }
        Ok(Self {
            symbol: symbol.into(),
            data,
        })
    }

    /// The security this statement belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Number of reporting periods in the table.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The column names of the table.
    pub fn columns(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Whether `item` can be resolved against this table's columns.
    pub fn has_line_item(&self, item: LineItem) -> bool {
        line_items::resolve(item, &self.columns()).is_some()
    }

    fn parse_dates(&self) -> Result<Vec<Option<NaiveDate>>> {
        let series = self.data.column("date")?.as_materialized_series();
        match series.dtype() {
            DataType::Date => Ok(series.date()?.as_date_iter().collect()),
            DataType::String => Ok(series
                .str()?
                .into_iter()
                .map(|opt| opt.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
                .collect()),
            other => Err(CadizError::InvalidData(format!(
                "unsupported date column dtype {other} for {}",
                self.symbol
            ))),
        }
    }

    /// Extracts `item` as a date-sorted series of observations.
    ///
    /// Null cells become `NaN` so downstream rolling sums can apply their
    /// own validity rules. Rows whose date fails to parse are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::LineItemNotFound`] when no column matches the
    /// item. Callers are expected to skip the affected symbol and keep
    /// going.
    pub fn line_item(&self, item: LineItem) -> Result<Vec<(NaiveDate, f64)>> {
        let columns = self.columns();
        let Some(name) = line_items::resolve(item, &columns) else {
            return Err(CadizError::LineItemNotFound {
                symbol: self.symbol.clone(),
                item: item.as_str().to_string(),
            });
        };
        let values = self
            .data
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let dates = self.parse_dates()?;

        let mut observations: Vec<(NaiveDate, f64)> = dates
            .into_iter()
            .zip(values.f64()?)
            .filter_map(|(date, value)| date.map(|d| (d, value.unwrap_or(f64::NAN))))
            .collect();
        observations.sort_by_key(|(d, _)| *d);
        Ok(observations)
    }

    /// Gross profit per period, deriving revenue minus COGS when the vendor
    /// does not report it directly.
    pub fn gross_profit(&self) -> Result<Vec<(NaiveDate, f64)>> {
        if self.has_line_item(LineItem::GrossProfit) {
            return self.line_item(LineItem::GrossProfit);
        }
        let revenue = self.line_item(LineItem::Revenue)?;
        let cogs = self.line_item(LineItem::CostOfRevenue)?;
        Ok(revenue
            .into_iter()
            .map(|(date, rev)| {
                let cost = cogs
                    .iter()
                    .find(|(d, _)| *d == date)
                    .map_or(f64::NAN, |(_, c)| *c);
                (date, rev - cost)
            })
            .collect())
    }
}
