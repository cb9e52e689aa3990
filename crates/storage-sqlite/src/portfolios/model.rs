//! Database model for portfolio definitions.

use diesel::prelude::*;

use crate::utils::{format_date, parse_date, parse_decimal};
use paperfolio_core::portfolios::PortfolioDefinition;
use paperfolio_core::Error;

/// Database model for portfolio definitions
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub name: String,
    pub description: String,
    pub stock_count: i32,
    pub min_market_cap: String,
    pub inception_date: String,
}

impl TryFrom<PortfolioDB> for PortfolioDefinition {
    type Error = Error;

    fn try_from(db: PortfolioDB) -> Result<Self, Error> {
        Ok(PortfolioDefinition {
            id: db.id,
            name: db.name,
            description: db.description,
            stock_count: db.stock_count,
            min_market_cap: parse_decimal(&db.min_market_cap)?,
            inception_date: parse_date(&db.inception_date)?,
        })
    }
}

impl From<&PortfolioDefinition> for PortfolioDB {
    fn from(definition: &PortfolioDefinition) -> Self {
        PortfolioDB {
            id: definition.id.clone(),
            name: definition.name.clone(),
            description: definition.description.clone(),
            stock_count: definition.stock_count,
            min_market_cap: definition.min_market_cap.to_string(),
            inception_date: format_date(definition.inception_date),
        }
    }
}
