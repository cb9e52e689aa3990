//! Market data provider abstraction and implementations.
//!
//! This module contains:
//! - The `EquityDataProvider` trait the ingest layer programs against
//! - The IEX Cloud implementation

mod traits;

pub mod iex;

// Re-exports
pub use traits::EquityDataProvider;
