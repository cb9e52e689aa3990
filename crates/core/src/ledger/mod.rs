//! Ledger module - holdings replay.
//!
//! Replays the append-only transaction log day by day into dated holding
//! snapshots, materializing dividends for held symbols along the way.

mod holdings_model;
mod holdings_projector;
mod holdings_traits;
mod ledger_state;


pub use holdings_model::{Holding, ProjectionSummary};
pub use holdings_projector::HoldingsProjector;
pub use holdings_traits::HoldingRepositoryTrait;
pub use ledger_state::LedgerState;
