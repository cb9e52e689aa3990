//! Core error types for the paperfolio engine.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.
//!
//! Two variants carry batch-control semantics: [`Error::DataUnavailable`]
//! aborts the current portfolio but lets the run continue, while
//! [`Error::Ledger`] marks the portfolio's ledger as corrupt and must never
//! be silently swallowed.

use chrono::{NaiveDate, ParseError as ChronoParseError};
use std::num::ParseFloatError;
use thiserror::Error;

use paperfolio_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Required data unavailable: {0}")]
    DataUnavailable(#[from] DataUnavailableError),

    #[error("Ledger invariant violated: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True for errors that should skip the current portfolio without
    /// failing the whole batch run.
    pub fn is_portfolio_scoped(&self) -> bool {
        matches!(self, Error::DataUnavailable(_) | Error::Ledger(_))
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Recoverable gaps in the data a portfolio operation needs.
///
/// These abort the affected portfolio, not the run.
#[derive(Error, Debug)]
pub enum DataUnavailableError {
    #[error("No quotes found for portfolio {portfolio_id} from {start}")]
    NoQuotes {
        portfolio_id: String,
        start: NaiveDate,
    },

    #[error("No close price for {symbol} on or before {date}")]
    NoClose { symbol: String, date: NaiveDate },

    #[error("No ranked stock list on or before {0}")]
    NoStockList(NaiveDate),

    #[error("Ranked stock list for {date} has {available} entries, need {needed}")]
    StockListTooShort {
        date: NaiveDate,
        available: usize,
        needed: usize,
    },

    #[error("Portfolio not found: {0}")]
    PortfolioNotFound(String),
}

/// Ledger invariant violations detected during replay.
///
/// A violation means the transaction log and the holdings history disagree;
/// the portfolio's projection is aborted and nothing is persisted for the
/// failing day.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Sell of {symbol} on {date} in portfolio {portfolio_id} with no position on the books")]
    SellWithoutHolding {
        portfolio_id: String,
        symbol: String,
        date: NaiveDate,
    },

    #[error("Portfolio {0} has no cash position on the books")]
    MissingCashPosition(String),

    #[error("Unsupported transaction kind: {0}")]
    UnsupportedTransactionKind(String),

    #[error("Replay failed: {0}")]
    Replay(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
