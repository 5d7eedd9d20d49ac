//! Point-in-time panel alignment.
//!
//! Fundamental data arrives on an irregular calendar and becomes known only
//! after a reporting delay. [`align_to`] projects such a panel onto a target
//! calendar using as-of (backward-looking) matching plus an explicit lag, so
//! a cell at date `t` can never reflect information published after `t`.

use chrono::NaiveDate;
use ndarray::Array2;

use crate::error::{CadizError, Result};
use crate::panel::Panel;

/// Projects `source` onto `target_dates` as-of each date, then lags.
///
/// For each target date the most recent finite source observation at or
/// before it is carried forward, per column. The result is then shifted by
/// `lag` rows on the target calendar, modelling a publication delay. Cells
/// with no prior source observation are missing.
pub fn align_to(target_dates: &[NaiveDate], source: &Panel, lag: usize) -> Result<Panel> {
    if target_dates.windows(2).any(|w| w[0] >= w[1]) {
        return Err(CadizError::InvalidData(
            "target calendar must be strictly increasing".to_string(),
        ));
    }
    let mut values = Array2::from_elem((target_dates.len(), source.num_assets()), f64::NAN);
    let source_dates = source.dates();
    for j in 0..source.num_assets() {
        let column = source.column(j);
        let mut cursor = 0usize;
        let mut carried = f64::NAN;
        for (r, target) in target_dates.iter().enumerate() {
            while cursor < source_dates.len() && source_dates[cursor] <= *target {
                let v = column[cursor];
                if v.is_finite() {
                    carried = v;
                }
                cursor += 1;
            }
            values[(r, j)] = carried;
        }
    }
    let aligned = Panel::new(target_dates.to_vec(), source.assets().to_vec(), values)?;
    Ok(if lag > 0 { aligned.shift(lag) } else { aligned })
}

/// Restricts two panels to their common dates and common assets.
///
/// Dates keep calendar order; assets follow the column order of `a`. The
/// returned panels have identical axes.
pub fn intersect(a: &Panel, b: &Panel) -> Result<(Panel, Panel)> {
    let dates: Vec<NaiveDate> = a
        .dates()
        .iter()
        .copied()
        .filter(|d| b.date_index(*d).is_some())
        .collect();
    let assets: Vec<String> = a
        .assets()
        .iter()
        .filter(|s| b.asset_index(s).is_some())
        .cloned()
        .collect();

    let pick = |p: &Panel| -> Result<Panel> {
        p.select_assets(&assets)?.select_dates(&dates)
    };
    Ok((pick(a)?, pick(b)?))
}

/// Restricts two panels to their common dates, leaving columns alone.
pub fn intersect_rows(a: &Panel, b: &Panel) -> Result<(Panel, Panel)> {
    let dates: Vec<NaiveDate> = a
        .dates()
        .iter()
        .copied()
        .filter(|d| b.date_index(*d).is_some())
        .collect();
    Ok((a.select_dates(&dates)?, b.select_dates(&dates)?))
}

/// Restricts two panels to their common assets, leaving calendars alone.
pub fn intersect_columns(a: &Panel, b: &Panel) -> Result<(Panel, Panel)> {
    let assets: Vec<String> = a
        .assets()
        .iter()
        .filter(|s| b.asset_index(s).is_some())
        .cloned()
        .collect();
    Ok((a.select_assets(&assets)?, b.select_assets(&assets)?))
}

/// Dates present in every panel, in calendar order.
pub fn common_calendar(panels: &[&Panel]) -> Vec<NaiveDate> {
    let Some(first) = panels.first() else {
        return Vec::new();
    };
    first
        .dates()
        .iter()
        .copied()
        .filter(|d| panels[1..].iter().all(|p| p.date_index(*d).is_some()))
        .collect()
}
