use chrono::{Duration, NaiveDate};
use log::{debug, info, warn};
use std::sync::Arc;

use crate::constants::CASH_SYMBOL;
use crate::errors::Result;
use crate::ledger::holdings_model::ProjectionSummary;
use crate::ledger::holdings_traits::HoldingRepositoryTrait;
use crate::ledger::ledger_state::LedgerState;
use crate::market_data::DividendRepositoryTrait;
use crate::portfolios::PortfolioDefinition;
use crate::transactions::{
    NewTransaction, Transaction, TransactionKind, TransactionRepositoryTrait,
};
use crate::utils::time_utils::get_days_between;

/// Replays a portfolio's transaction log day by day into dated holding
/// snapshots. Dividends for held symbols are materialized on their ex-date
/// as future-dated transactions, so they pay out when replay reaches the
/// payment date (possibly in a later pass).
pub struct HoldingsProjector {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    dividend_repository: Arc<dyn DividendRepositoryTrait>,
}

impl HoldingsProjector {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        dividend_repository: Arc<dyn DividendRepositoryTrait>,
    ) -> Self {
        Self {
            transaction_repository,
            holding_repository,
            dividend_repository,
        }
    }

    /// Brings the holdings history of `portfolio` up to `target_date`.
    ///
    /// Replay resumes the day after the newest persisted holding, or at the
    /// inception date with a synthetic zero cash leg for a new portfolio.
    /// Re-running with no new transactions appends nothing.
    pub fn project_portfolio(
        &self,
        portfolio: &PortfolioDefinition,
        target_date: NaiveDate,
    ) -> Result<ProjectionSummary> {
        let existing = self
            .holding_repository
            .get_latest_holdings(&portfolio.id, target_date)?;

        let (mut state, start) = if existing.is_empty() {
            (
                LedgerState::seeded(&portfolio.id, portfolio.inception_date),
                portfolio.inception_date,
            )
        } else {
            let state = LedgerState::from_holdings(&portfolio.id, existing);
            let start = state
                .last_replayed()
                .map(|last| last + Duration::days(1))
                .unwrap_or(portfolio.inception_date);
            (state, start)
        };

        let mut summary = ProjectionSummary {
            portfolio_id: portfolio.id.clone(),
            ..Default::default()
        };
        if start > target_date {
            debug!(
                "Holdings for {} already cover {}, nothing to replay",
                portfolio.id, target_date
            );
            return Ok(summary);
        }

        // The working set: every pending transaction from `start`, ordered
        // by (date, seq). Materialized dividends are appended to it so a
        // payment date inside this pass is settled in this pass.
        let mut pending = self
            .transaction_repository
            .get_for_portfolio_since(&portfolio.id, start)?;

        debug!(
            "Replaying {} from {} to {} with {} pending transactions",
            portfolio.id,
            start,
            target_date,
            pending.len()
        );

        for date in get_days_between(start, target_date) {
            summary.days_replayed += 1;
            summary.dividends_recorded +=
                self.materialize_dividends(&portfolio.id, &state, &mut pending, date)?;

            if pending.is_empty() {
                continue;
            }

            for transaction in pending.iter().filter(|t| t.date == date) {
                state.apply(transaction)?;
            }

            let touched = state.rows_touched_on(date);
            if !touched.is_empty() {
                summary.rows_appended += self.holding_repository.append_holdings(&touched)?;
            }
        }

        if summary.rows_appended > 0 {
            info!(
                "Projected {}: {} holding rows over {} days, {} dividends recorded",
                portfolio.id, summary.rows_appended, summary.days_replayed, summary.dividends_recorded
            );
        }
        Ok(summary)
    }

    /// Records dividend transactions for held symbols going ex on `date`.
    ///
    /// The recorded volume is the quantity held on the ex-date, priced at
    /// the declared per-share amount and dated at the payment date. A
    /// declaration already present in the working set for the same symbol
    /// and payment date is not recorded twice.
    fn materialize_dividends(
        &self,
        portfolio_id: &str,
        state: &LedgerState,
        pending: &mut Vec<Transaction>,
        date: NaiveDate,
    ) -> Result<usize> {
        let held = state.held_symbols();
        if held.is_empty() {
            return Ok(0);
        }

        let declarations = self
            .dividend_repository
            .get_dividends_on_ex_date(&held, date)?;

        let mut recorded = 0;
        for declaration in declarations {
            if declaration.currency != CASH_SYMBOL {
                continue;
            }
            let amount = match declaration.amount {
                Some(amount) if !amount.is_zero() => amount,
                _ => {
                    warn!(
                        "Skipping dividend for {} on {}: amount is empty",
                        declaration.symbol, declaration.ex_date
                    );
                    continue;
                }
            };
            let payment_date = match declaration.payment_date {
                Some(payment_date) => payment_date,
                None => {
                    warn!(
                        "Skipping dividend for {} on {}: payment date is missing",
                        declaration.symbol, declaration.ex_date
                    );
                    continue;
                }
            };

            let already_recorded = pending.iter().any(|t| {
                t.kind == TransactionKind::Dividend
                    && t.symbol == declaration.symbol
                    && t.date == payment_date
            });
            if already_recorded {
                debug!(
                    "Dividend for {} paying {} already recorded",
                    declaration.symbol, payment_date
                );
                continue;
            }

            let held_quantity = state.quantity(&declaration.symbol);
            let transaction = self.transaction_repository.append(NewTransaction::dividend(
                portfolio_id,
                &declaration.symbol,
                payment_date,
                amount,
                held_quantity,
            ))?;
            info!(
                "Recorded dividend for {}: {} x {} per share, ex {} paying {}",
                portfolio_id, held_quantity, amount, declaration.ex_date, payment_date
            );
            pending.push(transaction);
            recorded += 1;
        }
        Ok(recorded)
    }
}
