use chrono::NaiveDate;

use super::universe_model::RankedStock;
use crate::errors::Result;

/// Store access for persisted ranked stock lists.
pub trait StockListRepositoryTrait: Send + Sync {
    /// Rows stored for exactly `date`, in rank order.
    fn get_stock_list_on(&self, date: NaiveDate) -> Result<Vec<RankedStock>>;

    /// The newest stored list with date <= `as_of`, in rank order, bounded
    /// by the [`crate::constants::STOCK_LIST_LOOKBACK_DAYS`] window.
    fn get_latest_stock_list(&self, as_of: NaiveDate) -> Result<Vec<RankedStock>>;

    fn append_stock_list(&self, rows: &[RankedStock]) -> Result<usize>;

    /// Removes lists dated before `cutoff`; returns the number of rows removed.
    fn delete_before(&self, cutoff: NaiveDate) -> Result<usize>;
}
