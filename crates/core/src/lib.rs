//! Paperfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for the model-portfolio engine:
//! the transaction ledger, holdings replay, performance accounting, and
//! universe ranking. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod ingest;
pub mod ledger;
pub mod market_data;
pub mod performance;
pub mod portfolios;
pub mod reports;
pub mod transactions;
pub mod universe;
pub mod utils;

// Re-export common types from the ledger and performance modules
pub use ledger::*;
pub use performance::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
