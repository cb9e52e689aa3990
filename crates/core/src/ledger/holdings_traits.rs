use chrono::NaiveDate;

use super::holdings_model::Holding;
use crate::errors::Result;

/// Store access for the append-only holdings history.
pub trait HoldingRepositoryTrait: Send + Sync {
    /// The latest row per symbol with `as_of` <= `date`; the resolved
    /// position view of the portfolio on that date.
    fn get_latest_holdings(&self, portfolio_id: &str, date: NaiveDate) -> Result<Vec<Holding>>;

    /// Every row with `as_of` >= `start`, ordered by (as_of, symbol).
    fn get_holdings_since(&self, portfolio_id: &str, start: NaiveDate) -> Result<Vec<Holding>>;

    fn append_holdings(&self, rows: &[Holding]) -> Result<usize>;

    /// Removes rows with `as_of` >= `since`; pairs with
    /// [`crate::transactions::TransactionRepositoryTrait::delete_dividends_since`]
    /// when rolling a portfolio back for re-projection.
    fn delete_since(&self, portfolio_id: &str, since: NaiveDate) -> Result<usize>;
}
