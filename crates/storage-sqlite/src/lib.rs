//! SQLite storage implementation for paperfolio.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `paperfolio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The `core` crate is database-agnostic and works with traits.
//!
//! ```text
//! core (domain)
//!       │
//!       ▼
//! storage-sqlite (this crate)
//!       │
//!       ▼
//!   SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod ledger;
pub mod market_data;
pub mod performance;
pub mod portfolios;
pub mod transactions;
pub mod universe;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export repository implementations
pub use ledger::HoldingRepository;
pub use market_data::{
    BalanceSheetRepository, DividendRepository, QuoteRepository, SymbolRepository,
};
pub use performance::PerformanceRepository;
pub use portfolios::PortfolioRepository;
pub use transactions::TransactionRepository;
pub use universe::StockListRepository;

// Re-export from paperfolio-core for convenience
pub use paperfolio_core::errors::{DatabaseError, Error, Result};
