//! Database models for ranked stock lists.

use diesel::prelude::*;

use crate::utils::{format_date, parse_date, parse_decimal};
use paperfolio_core::universe::RankedStock;
use paperfolio_core::Error;

/// Database model for ranked stock list rows
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::stock_list)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RankedStockDB {
    pub id: i32,
    pub symbol: String,
    pub date: String,
    pub rank: i32,
    pub close: String,
    pub market_cap: String,
    pub pe_ratio: String,
    pub eps: String,
    pub shares_outstanding: String,
    pub net_income: String,
    pub shareholder_equity: String,
    pub return_on_equity: String,
    pub pe_roe_ratio: String,
    pub report_date: String,
}

/// Insert payload for ranked stock list rows.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::stock_list)]
pub struct NewRankedStockDB {
    pub symbol: String,
    pub date: String,
    pub rank: i32,
    pub close: String,
    pub market_cap: String,
    pub pe_ratio: String,
    pub eps: String,
    pub shares_outstanding: String,
    pub net_income: String,
    pub shareholder_equity: String,
    pub return_on_equity: String,
    pub pe_roe_ratio: String,
    pub report_date: String,
}

impl TryFrom<RankedStockDB> for RankedStock {
    type Error = Error;

    fn try_from(db: RankedStockDB) -> Result<Self, Error> {
        Ok(RankedStock {
            symbol: db.symbol,
            date: parse_date(&db.date)?,
            rank: db.rank,
            close: parse_decimal(&db.close)?,
            market_cap: parse_decimal(&db.market_cap)?,
            pe_ratio: parse_decimal(&db.pe_ratio)?,
            eps: parse_decimal(&db.eps)?,
            shares_outstanding: parse_decimal(&db.shares_outstanding)?,
            net_income: parse_decimal(&db.net_income)?,
            shareholder_equity: parse_decimal(&db.shareholder_equity)?,
            return_on_equity: parse_decimal(&db.return_on_equity)?,
            pe_roe_ratio: parse_decimal(&db.pe_roe_ratio)?,
            report_date: parse_date(&db.report_date)?,
        })
    }
}

impl From<&RankedStock> for NewRankedStockDB {
    fn from(stock: &RankedStock) -> Self {
        NewRankedStockDB {
            symbol: stock.symbol.clone(),
            date: format_date(stock.date),
            rank: stock.rank,
            close: stock.close.to_string(),
            market_cap: stock.market_cap.to_string(),
            pe_ratio: stock.pe_ratio.to_string(),
            eps: stock.eps.to_string(),
            shares_outstanding: stock.shares_outstanding.to_string(),
            net_income: stock.net_income.to_string(),
            shareholder_equity: stock.shareholder_equity.to_string(),
            return_on_equity: stock.return_on_equity.to_string(),
            pe_roe_ratio: stock.pe_roe_ratio.to_string(),
            report_date: format_date(stock.report_date),
        }
    }
}
