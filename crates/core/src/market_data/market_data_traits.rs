use chrono::NaiveDate;
use std::collections::HashMap;

use super::market_data_model::{BalanceSheet, DividendDeclaration, Quote, SymbolProfile};
use crate::errors::Result;

/// Store access for end-of-day quotes.
pub trait QuoteRepositoryTrait: Send + Sync {
    /// All quotes for `symbols` with date >= `start`, ordered by date.
    fn get_quotes_since(&self, symbols: &[String], start: NaiveDate) -> Result<Vec<Quote>>;

    /// Latest quote per symbol with date <= `as_of`, bounded by the
    /// [`crate::constants::QUOTE_LOOKBACK_DAYS`] window.
    fn get_latest_quotes(
        &self,
        symbols: &[String],
        as_of: NaiveDate,
    ) -> Result<HashMap<String, Quote>>;

    /// Per-symbol date of the newest stored quote.
    fn get_latest_dates(&self) -> Result<HashMap<String, NaiveDate>>;

    fn append_quotes(&self, quotes: &[Quote]) -> Result<usize>;

    /// Removes rows whose (symbol, date) appears more than once, keeping one.
    fn delete_duplicates(&self) -> Result<usize>;
}

/// Store access for dividend declarations.
pub trait DividendRepositoryTrait: Send + Sync {
    /// Declarations for `symbols` going ex on exactly `ex_date`.
    fn get_dividends_on_ex_date(
        &self,
        symbols: &[String],
        ex_date: NaiveDate,
    ) -> Result<Vec<DividendDeclaration>>;

    /// Per-symbol newest stored ex-date.
    fn get_latest_ex_dates(&self) -> Result<HashMap<String, NaiveDate>>;

    fn append_dividends(&self, dividends: &[DividendDeclaration]) -> Result<usize>;
}

/// Store access for quarterly balance sheets.
pub trait BalanceSheetRepositoryTrait: Send + Sync {
    /// Latest report per symbol with report_date <= `as_of`, bounded by the
    /// [`crate::constants::BALANCE_SHEET_MAX_AGE_DAYS`] window.
    fn get_latest_reports(
        &self,
        symbols: &[String],
        as_of: NaiveDate,
    ) -> Result<Vec<BalanceSheet>>;

    /// Per-symbol date of the newest stored report.
    fn get_latest_report_dates(&self) -> Result<HashMap<String, NaiveDate>>;

    fn append_balance_sheets(&self, sheets: &[BalanceSheet]) -> Result<usize>;

    /// Removes rows whose (symbol, report_date) appears more than once, keeping one.
    fn delete_duplicates(&self) -> Result<usize>;
}

/// Store access for symbol reference data.
pub trait SymbolRepositoryTrait: Send + Sync {
    fn get_all(&self) -> Result<Vec<SymbolProfile>>;

    /// Inserts profiles whose symbol is not already stored; returns the
    /// number inserted.
    fn append_symbols(&self, profiles: &[SymbolProfile]) -> Result<usize>;
}
