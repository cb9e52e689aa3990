use chrono::NaiveDate;

use super::portfolios_model::PortfolioDefinition;
use crate::errors::Result;

/// Store access for portfolio definitions.
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// Definitions whose inception_date is on or before `as_of`.
    fn get_portfolios(&self, as_of: NaiveDate) -> Result<Vec<PortfolioDefinition>>;

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Option<PortfolioDefinition>>;

    /// Inserts definitions whose id is not already stored; returns the
    /// number inserted.
    fn append_portfolios(&self, definitions: &[PortfolioDefinition]) -> Result<usize>;
}
