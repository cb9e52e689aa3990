//! Transactions module - the append-only portfolio ledger.

mod transactions_constants;
mod transactions_model;
mod transactions_traits;

// Re-export the public interface
pub use transactions_constants::*;
pub use transactions_model::{NewTransaction, Transaction, TransactionKind};
pub use transactions_traits::TransactionRepositoryTrait;
