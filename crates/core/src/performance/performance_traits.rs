use chrono::NaiveDate;

use super::performance_model::PerformanceRecord;
use crate::errors::Result;

/// Store access for the daily performance history.
pub trait PerformanceRepositoryTrait: Send + Sync {
    /// The most recent record for a portfolio, if any.
    fn get_latest_record(&self, portfolio_id: &str) -> Result<Option<PerformanceRecord>>;

    /// All records with date >= `start`, ordered by date.
    fn get_records_since(
        &self,
        portfolio_id: &str,
        start: NaiveDate,
    ) -> Result<Vec<PerformanceRecord>>;

    fn append_records(&self, records: &[PerformanceRecord]) -> Result<usize>;

    /// Removes records with date >= `since` for one portfolio.
    fn delete_since(&self, portfolio_id: &str, since: NaiveDate) -> Result<usize>;
}
