//! SQLite storage implementation for daily valuation records.

mod model;
mod repository;

pub use model::PerformanceRecordDB;
pub use repository::PerformanceRepository;
