use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DATE_FORMAT;

/// One dated position snapshot. Rows are append-only; the current position
/// of (portfolio, symbol) as of date D is the row with the greatest
/// `as_of` <= D.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub portfolio_id: String,
    pub symbol: String,
    /// End-of-day quantity; the cash amount for the `USD` leg.
    pub quantity: Decimal,
    pub as_of: NaiveDate,
}

impl Holding {
    /// Storage key, `{portfolio_id}_{symbol}_{YYYY-MM-DD}`.
    pub fn id(&self) -> String {
        format!(
            "{}_{}_{}",
            self.portfolio_id,
            self.symbol,
            self.as_of.format(DATE_FORMAT)
        )
    }
}

/// What one projection pass did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectionSummary {
    pub portfolio_id: String,
    pub days_replayed: usize,
    pub rows_appended: usize,
    pub dividends_recorded: usize,
}
