//! Utility functions for SQLite storage operations.
//!
//! Dates and decimals are stored as TEXT (`YYYY-MM-DD` and plain decimal
//! strings); the helpers here convert between the stored form and the domain
//! types, and chunk large parameter lists to stay under SQLite limits.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use paperfolio_core::constants::DATE_FORMAT;
use paperfolio_core::Result;

/// Maximum number of parameters for SQLite IN (...) queries.
///
/// SQLite has a compile-time limit on the number of parameters in a SQL
/// statement, typically around 999 (SQLITE_MAX_VARIABLE_NUMBER). To stay
/// safely under this limit and leave room for other parameters in the query,
/// we use 500 as our chunk size.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Chunk a slice into smaller slices for batch SQLite queries.
///
/// Any query that uses `IN (...)` with a potentially large list of symbols,
/// and any multi-row insert, should go through this to avoid exceeding
/// SQLite's parameter limits.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Format a date the way it is stored (`YYYY-MM-DD`, sorts chronologically).
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored date column back into a `NaiveDate`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(value, DATE_FORMAT)?)
}

/// Parse a stored decimal column back into a `Decimal`.
pub fn parse_decimal(value: &str) -> Result<Decimal> {
    Ok(Decimal::from_str(value)?)
}
