//! Portfolios module - definitions and admin batches.
//!
//! Portfolio definitions are created once and never updated. The admin
//! service only ever appends transactions; holdings and performance are
//! derived from the log by the ledger and performance modules.

mod portfolios_model;
mod portfolios_service;
mod portfolios_traits;


pub use portfolios_model::{standard_grid, PortfolioDefinition, INITIAL_DEPOSIT, STANDARD_INCEPTION};
pub use portfolios_service::PortfolioAdmin;
pub use portfolios_traits::PortfolioRepositoryTrait;
