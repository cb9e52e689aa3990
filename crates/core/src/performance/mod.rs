//! Performance module - daily valuation and percent returns.

mod performance_calculator;
mod performance_model;
mod performance_traits;


pub use performance_calculator::PerformanceCalculator;
pub use performance_model::{chain_returns, PerformanceRecord, ValuationSummary};
pub use performance_traits::PerformanceRepositoryTrait;
