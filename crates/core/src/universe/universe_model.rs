use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market-cap floors reported by the universe census, smallest first.
pub const CENSUS_THRESHOLDS: [(&str, i64); 8] = [
    ("50M", 50_000_000),
    ("100M", 100_000_000),
    ("500M", 500_000_000),
    ("1B", 1_000_000_000),
    ("5B", 5_000_000_000),
    ("10B", 10_000_000_000),
    ("50B", 50_000_000_000),
    ("100B", 100_000_000_000),
];

/// One row of a ranked stock list.
///
/// Carries the ranking inputs alongside the derived ratios so stored lists
/// and exports are self-contained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStock {
    pub symbol: String,
    /// List date; the newest quote date among the ranked rows.
    pub date: NaiveDate,
    /// 1-based position after sorting by `pe_roe_ratio` ascending.
    pub rank: i32,
    pub close: Decimal,
    pub market_cap: Decimal,
    pub pe_ratio: Decimal,
    pub eps: Decimal,
    pub shares_outstanding: Decimal,
    pub net_income: Decimal,
    pub shareholder_equity: Decimal,
    pub return_on_equity: Decimal,
    pub pe_roe_ratio: Decimal,
    /// Balance sheet the equity figure was taken from.
    pub report_date: NaiveDate,
}
