//! Paperfolio Market Data Crate
//!
//! This crate is the gateway between the batch pipeline and the equity
//! market data provider. It exposes:
//!
//! - [`EquityDataProvider`]: the async trait the ingest layer programs
//!   against
//! - [`IexProvider`]: the IEX Cloud implementation of that trait
//! - Provider payload models ([`SymbolListing`], [`LatestQuote`],
//!   [`DividendRecord`], [`BalanceSheetReport`], ...)
//! - [`MarketDataError`] with an [`is_transient`](MarketDataError::is_transient)
//!   classification driving a bounded retry inside the client
//!
//! Normalization happens at this edge: quotes without an official close
//! resolve to `None`, malformed dividend dates degrade to optional fields,
//! and daily close series drop null points. Callers never see provider
//! wire quirks.

pub mod errors;
pub mod models;
pub mod provider;

// Re-export all public types from models
pub use models::{
    BalanceSheetReport, ChartRange, CompanyInfo, DividendRecord, HistoryPoint, LatestQuote,
    SymbolListing,
};

// Re-export provider types
pub use provider::iex::IexProvider;
pub use provider::EquityDataProvider;

// Re-export error types
pub use errors::MarketDataError;
