//! Provider payload models
//!
//! This module contains the normalized documents handed to the ingest
//! layer:
//! - `documents` - Reference, quote, dividend, balance sheet, and history
//!   payloads
//! - `range` - Date range selector for chart and dividend endpoints

mod documents;
mod range;

pub use documents::{
    BalanceSheetReport, CompanyInfo, DividendRecord, HistoryPoint, LatestQuote, SymbolListing,
};
pub use range::ChartRange;
