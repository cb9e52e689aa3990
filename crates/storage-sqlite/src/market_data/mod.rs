//! SQLite storage implementation for market data.

mod balance_sheet_repository;
mod dividend_repository;
mod model;
mod quote_repository;
mod symbol_repository;

pub use model::{
    BalanceSheetDB, DividendDB, NewBalanceSheetDB, NewDividendDB, NewQuoteDB, QuoteDB,
    SymbolProfileDB,
};

pub use balance_sheet_repository::BalanceSheetRepository;
pub use dividend_repository::DividendRepository;
pub use quote_repository::QuoteRepository;
pub use symbol_repository::SymbolRepository;
