//! Market data documents and store traits.
//!
//! These are the read-side documents the ledger, performance, and universe
//! modules consume. Ingest (see [`crate::ingest`]) is the only writer.

mod market_data_model;
mod market_data_traits;

pub use market_data_model::{
    active_symbols, BalanceSheet, DividendDeclaration, Quote, SymbolProfile, EXCLUDED_INDUSTRIES,
    EXCLUDED_SHARE_CLASSES,
};
pub use market_data_traits::{
    BalanceSheetRepositoryTrait, DividendRepositoryTrait, QuoteRepositoryTrait,
    SymbolRepositoryTrait,
};
