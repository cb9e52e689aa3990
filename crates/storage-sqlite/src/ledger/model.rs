//! Database model for dated holding snapshots.

use diesel::prelude::*;

use crate::utils::{format_date, parse_date, parse_decimal};
use paperfolio_core::ledger::Holding;
use paperfolio_core::Error;

/// Database model for holdings. The primary key encodes
/// (portfolio_id, symbol, as_of) so replaying a day overwrites its rows.
#[derive(
    Queryable, Identifiable, Selectable, Insertable, QueryableByName, Debug, Clone, PartialEq,
)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub id: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub portfolio_id: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub symbol: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub quantity: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub as_of: String,
}

impl TryFrom<HoldingDB> for Holding {
    type Error = Error;

    fn try_from(db: HoldingDB) -> Result<Self, Error> {
        Ok(Holding {
            portfolio_id: db.portfolio_id,
            symbol: db.symbol,
            quantity: parse_decimal(&db.quantity)?,
            as_of: parse_date(&db.as_of)?,
        })
    }
}

impl From<&Holding> for HoldingDB {
    fn from(holding: &Holding) -> Self {
        HoldingDB {
            id: holding.id(),
            portfolio_id: holding.portfolio_id.clone(),
            symbol: holding.symbol.clone(),
            quantity: holding.quantity.to_string(),
            as_of: format_date(holding.as_of),
        }
    }
}
