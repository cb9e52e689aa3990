//! SQLite storage implementation for ranked stock lists.

mod model;
mod repository;

pub use model::{NewRankedStockDB, RankedStockDB};
pub use repository::StockListRepository;
