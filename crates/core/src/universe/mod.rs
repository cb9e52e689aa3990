//! Universe module - investable stock ranking.
//!
//! Filters the symbol reference data down to the investable universe, joins
//! fundamentals with recent quotes, and ranks by price-to-earnings over
//! return-on-equity.

mod universe_model;
mod universe_service;
mod universe_traits;

#[cfg(test)]
mod universe_service_tests;

pub use universe_model::{RankedStock, CENSUS_THRESHOLDS};
pub use universe_service::UniverseRanker;
pub use universe_traits::StockListRepositoryTrait;
