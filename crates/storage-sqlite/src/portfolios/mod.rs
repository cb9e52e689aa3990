//! SQLite storage implementation for portfolio definitions.

mod model;
mod repository;

pub use model::PortfolioDB;
pub use repository::PortfolioRepository;
