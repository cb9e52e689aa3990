//! Database models for market data (symbols, quotes, dividends, balance sheets).

use diesel::prelude::*;

use crate::utils::{format_date, parse_date, parse_decimal};
use paperfolio_core::market_data::{BalanceSheet, DividendDeclaration, Quote, SymbolProfile};
use paperfolio_core::Error;

/// Database model for symbol reference data
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::symbols)]
#[diesel(primary_key(symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SymbolProfileDB {
    pub symbol: String,
    pub name: String,
    pub security_name: String,
    pub security_type: String,
    pub region: String,
    pub currency: String,
    pub exchange: String,
    pub industry: String,
    pub enabled: bool,
}

/// Database model for quotes
#[derive(Queryable, Identifiable, Selectable, QueryableByName, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::quotes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteDB {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    pub id: i32,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub symbol: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub date: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub close: String,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub market_cap: Option<String>,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub pe_ratio: Option<String>,
}

/// Insert payload for quotes; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::quotes)]
pub struct NewQuoteDB {
    pub symbol: String,
    pub date: String,
    pub close: String,
    pub market_cap: Option<String>,
    pub pe_ratio: Option<String>,
}

/// Database model for dividend declarations
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::dividends)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DividendDB {
    pub id: i32,
    pub symbol: String,
    pub ex_date: String,
    pub payment_date: Option<String>,
    pub amount: Option<String>,
    pub currency: String,
}

/// Insert payload for dividend declarations.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::dividends)]
pub struct NewDividendDB {
    pub symbol: String,
    pub ex_date: String,
    pub payment_date: Option<String>,
    pub amount: Option<String>,
    pub currency: String,
}

/// Database model for quarterly balance sheets
#[derive(Queryable, Identifiable, Selectable, QueryableByName, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::balance_sheets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BalanceSheetDB {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    pub id: i32,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub symbol: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub report_date: String,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub shareholder_equity: Option<String>,
}

/// Insert payload for balance sheets.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::balance_sheets)]
pub struct NewBalanceSheetDB {
    pub symbol: String,
    pub report_date: String,
    pub shareholder_equity: Option<String>,
}

// Conversion implementations

impl From<SymbolProfileDB> for SymbolProfile {
    fn from(db: SymbolProfileDB) -> Self {
        SymbolProfile {
            symbol: db.symbol,
            name: db.name,
            security_name: db.security_name,
            security_type: db.security_type,
            region: db.region,
            currency: db.currency,
            exchange: db.exchange,
            industry: db.industry,
            enabled: db.enabled,
        }
    }
}

impl From<&SymbolProfile> for SymbolProfileDB {
    fn from(profile: &SymbolProfile) -> Self {
        SymbolProfileDB {
            symbol: profile.symbol.clone(),
            name: profile.name.clone(),
            security_name: profile.security_name.clone(),
            security_type: profile.security_type.clone(),
            region: profile.region.clone(),
            currency: profile.currency.clone(),
            exchange: profile.exchange.clone(),
            industry: profile.industry.clone(),
            enabled: profile.enabled,
        }
    }
}

impl TryFrom<QuoteDB> for Quote {
    type Error = Error;

    fn try_from(db: QuoteDB) -> Result<Self, Error> {
        Ok(Quote {
            symbol: db.symbol,
            date: parse_date(&db.date)?,
            close: parse_decimal(&db.close)?,
            market_cap: db.market_cap.as_deref().map(parse_decimal).transpose()?,
            pe_ratio: db.pe_ratio.as_deref().map(parse_decimal).transpose()?,
        })
    }
}

impl From<&Quote> for NewQuoteDB {
    fn from(quote: &Quote) -> Self {
        NewQuoteDB {
            symbol: quote.symbol.clone(),
            date: format_date(quote.date),
            close: quote.close.to_string(),
            market_cap: quote.market_cap.map(|v| v.to_string()),
            pe_ratio: quote.pe_ratio.map(|v| v.to_string()),
        }
    }
}

impl TryFrom<DividendDB> for DividendDeclaration {
    type Error = Error;

    fn try_from(db: DividendDB) -> Result<Self, Error> {
        Ok(DividendDeclaration {
            symbol: db.symbol,
            ex_date: parse_date(&db.ex_date)?,
            payment_date: db.payment_date.as_deref().map(parse_date).transpose()?,
            amount: db.amount.as_deref().map(parse_decimal).transpose()?,
            currency: db.currency,
        })
    }
}

impl From<&DividendDeclaration> for NewDividendDB {
    fn from(dividend: &DividendDeclaration) -> Self {
        NewDividendDB {
            symbol: dividend.symbol.clone(),
            ex_date: format_date(dividend.ex_date),
            payment_date: dividend.payment_date.map(format_date),
            amount: dividend.amount.map(|v| v.to_string()),
            currency: dividend.currency.clone(),
        }
    }
}

impl TryFrom<BalanceSheetDB> for BalanceSheet {
    type Error = Error;

    fn try_from(db: BalanceSheetDB) -> Result<Self, Error> {
        Ok(BalanceSheet {
            symbol: db.symbol,
            report_date: parse_date(&db.report_date)?,
            shareholder_equity: db
                .shareholder_equity
                .as_deref()
                .map(parse_decimal)
                .transpose()?,
        })
    }
}

impl From<&BalanceSheet> for NewBalanceSheetDB {
    fn from(sheet: &BalanceSheet) -> Self {
        NewBalanceSheetDB {
            symbol: sheet.symbol.clone(),
            report_date: format_date(sheet.report_date),
            shareholder_equity: sheet.shareholder_equity.map(|v| v.to_string()),
        }
    }
}
