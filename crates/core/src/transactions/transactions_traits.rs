use chrono::NaiveDate;

use super::transactions_model::{NewTransaction, Transaction};
use crate::errors::Result;

/// Store access for the append-only transaction ledger.
///
/// Implementations must assign strictly increasing `seq` values and return
/// rows ordered by (date, seq); replay determinism depends on it.
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Appends one row and returns it with its assigned `seq`.
    fn append(&self, transaction: NewTransaction) -> Result<Transaction>;

    /// Appends a batch in order; returns the number of rows written.
    fn append_many(&self, transactions: &[NewTransaction]) -> Result<usize>;

    /// All rows for a portfolio with date >= `start`, ordered by (date, seq).
    fn get_for_portfolio_since(
        &self,
        portfolio_id: &str,
        start: NaiveDate,
    ) -> Result<Vec<Transaction>>;

    /// Removes dividend rows with date >= `since` for one portfolio.
    /// Used together with a holdings rollback to force a clean re-projection.
    fn delete_dividends_since(&self, portfolio_id: &str, since: NaiveDate) -> Result<usize>;
}
