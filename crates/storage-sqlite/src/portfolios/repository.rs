use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::PortfolioDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::portfolios::dsl as portfolios_dsl;
use crate::utils::format_date;
use paperfolio_core::portfolios::{PortfolioDefinition, PortfolioRepositoryTrait};
use paperfolio_core::Result;

pub struct PortfolioRepository {
    pool: Arc<DbPool>,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl PortfolioRepositoryTrait for PortfolioRepository {
    fn get_portfolios(&self, as_of: NaiveDate) -> Result<Vec<PortfolioDefinition>> {
        let mut conn = get_connection(&self.pool)?;
        let as_of_str = format_date(as_of);

        let rows = portfolios_dsl::portfolios
            .filter(portfolios_dsl::inception_date.le(&as_of_str))
            .order(portfolios_dsl::id.asc())
            .load::<PortfolioDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(PortfolioDefinition::try_from).collect()
    }

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Option<PortfolioDefinition>> {
        let mut conn = get_connection(&self.pool)?;

        let row = portfolios_dsl::portfolios
            .find(portfolio_id)
            .first::<PortfolioDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(PortfolioDefinition::try_from).transpose()
    }

    fn append_portfolios(&self, definitions: &[PortfolioDefinition]) -> Result<usize> {
        if definitions.is_empty() {
            return Ok(0);
        }

        let mut conn = get_connection(&self.pool)?;
        let db_rows: Vec<PortfolioDB> = definitions.iter().map(PortfolioDB::from).collect();

        diesel::insert_or_ignore_into(portfolios_dsl::portfolios)
            .values(&db_rows)
            .execute(&mut conn)
            .into_core()
    }
}
