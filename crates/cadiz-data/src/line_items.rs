//! Canonical fundamental line items and fuzzy column resolution.
//!
//! Statement vendors disagree on spelling: one feed reports `grossProfit`,
//! another `Gross Profit`, a third `GROSS_PROFIT`. Factors ask for a
//! [`LineItem`] and the resolver finds whichever column a statement actually
//! carries, so a renamed column degrades a single asset instead of the run.

/// A canonical fundamental line item used by factor signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LineItem {
    /// Total revenue for the period.
    Revenue,
    /// Cost of revenue (COGS).
    CostOfRevenue,
    /// Gross profit; derivable as revenue minus COGS when absent.
    GrossProfit,
    /// Total assets from the balance sheet.
    TotalAssets,
    /// Net income for the period.
    NetIncome,
}

impl LineItem {
    /// Lower-cased substrings accepted as a match for this item.
    ///
    /// Patterns are compared against normalized column names, so they only
    /// need to cover vocabulary differences, not casing or separators.
    pub const fn patterns(self) -> &'static [&'static str] {
        match self {
            Self::Revenue => &["totalrevenue", "revenue", "sales"],
            Self::CostOfRevenue => &["costofrevenue", "costofgoodssold", "cogs"],
            Self::GrossProfit => &["grossprofit"],
            Self::TotalAssets => &["totalassets"],
            Self::NetIncome => &["netincome"],
        }
    }

    /// Human-readable name for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::CostOfRevenue => "CostOfRevenue",
            Self::GrossProfit => "GrossProfit",
            Self::TotalAssets => "TotalAssets",
            Self::NetIncome => "NetIncome",
        }
    }
}

/// Lower-cases a column name and strips separators before matching.
fn canonicalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Finds the column among `columns` that carries `item`, if any.
///
/// Exact matches are preferred to substring matches, and earlier patterns
/// win over later ones, so a bare `revenue` column beats `revenueGrowth`
/// and `totalRevenue` beats a stray `costOfRevenue`.
pub fn resolve<'a>(item: LineItem, columns: &'a [String]) -> Option<&'a str> {
    let normalized: Vec<String> = columns.iter().map(|c| canonicalize(c)).collect();
    for pattern in item.patterns() {
        if let Some(idx) = normalized.iter().position(|c| c == pattern) {
            return Some(columns[idx].as_str());
        }
    }
    for pattern in item.patterns() {
        if let Some(idx) = normalized.iter().position(|c| c.contains(pattern)) {
            return Some(columns[idx].as_str());
        }
    }
    None
}
