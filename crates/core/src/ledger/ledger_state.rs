use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::constants::CASH_SYMBOL;
use crate::errors::LedgerError;
use crate::ledger::holdings_model::Holding;
use crate::transactions::{Transaction, TransactionKind};

#[derive(Debug, Clone, PartialEq)]
struct Position {
    quantity: Decimal,
    as_of: NaiveDate,
}

/// In-memory replay state of one portfolio: symbol -> current position.
///
/// Built once per projection pass from the latest persisted holdings, then
/// mutated by [`LedgerState::apply`] as transactions are replayed. A
/// `BTreeMap` keeps iteration (and thus persisted row order) deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerState {
    portfolio_id: String,
    positions: BTreeMap<String, Position>,
}

impl LedgerState {
    /// State for a brand-new portfolio: a synthetic zero cash leg dated at
    /// inception, so the first replayed day persists it.
    pub fn seeded(portfolio_id: &str, inception_date: NaiveDate) -> Self {
        let mut positions = BTreeMap::new();
        positions.insert(
            CASH_SYMBOL.to_string(),
            Position {
                quantity: Decimal::ZERO,
                as_of: inception_date,
            },
        );
        LedgerState {
            portfolio_id: portfolio_id.to_string(),
            positions,
        }
    }

    /// State from persisted rows. `rows` must already be the latest row per
    /// symbol; later duplicates overwrite earlier ones.
    pub fn from_holdings(portfolio_id: &str, rows: Vec<Holding>) -> Self {
        let mut positions = BTreeMap::new();
        for row in rows {
            positions.insert(
                row.symbol,
                Position {
                    quantity: row.quantity,
                    as_of: row.as_of,
                },
            );
        }
        LedgerState {
            portfolio_id: portfolio_id.to_string(),
            positions,
        }
    }

    /// The most recent `as_of` across all positions.
    pub fn last_replayed(&self) -> Option<NaiveDate> {
        self.positions.values().map(|p| p.as_of).max()
    }

    pub fn quantity(&self, symbol: &str) -> Decimal {
        self.positions
            .get(symbol)
            .map(|p| p.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn cash(&self) -> Decimal {
        self.quantity(CASH_SYMBOL)
    }

    /// Non-cash symbols with a non-zero quantity.
    pub fn held_symbols(&self) -> Vec<String> {
        self.positions
            .iter()
            .filter(|(symbol, position)| {
                symbol.as_str() != CASH_SYMBOL && !position.quantity.is_zero()
            })
            .map(|(symbol, _)| symbol.clone())
            .collect()
    }

    /// Applies one ledger row dated `transaction.date`.
    ///
    /// A sell requires an existing position row for the symbol; a
    /// zero-quantity row counts as existing (the quantity may go negative,
    /// exactly as a sell-then-rebuy history produces). A sell with no row
    /// at all means the log and the holdings history disagree and fails
    /// the replay.
    pub fn apply(&mut self, transaction: &Transaction) -> Result<(), LedgerError> {
        let date = transaction.date;
        let gross = transaction.price * transaction.volume;
        match transaction.kind {
            TransactionKind::Deposit | TransactionKind::Dividend => {
                self.add_cash(gross, date);
            }
            TransactionKind::Withdrawal => {
                self.add_cash(-gross, date);
            }
            TransactionKind::Buy => {
                let position = self
                    .positions
                    .entry(transaction.symbol.clone())
                    .or_insert(Position {
                        quantity: Decimal::ZERO,
                        as_of: date,
                    });
                position.quantity += transaction.volume;
                position.as_of = date;
                self.add_cash(-gross, date);
            }
            TransactionKind::Sell => {
                let position = self.positions.get_mut(&transaction.symbol).ok_or_else(|| {
                    LedgerError::SellWithoutHolding {
                        portfolio_id: self.portfolio_id.clone(),
                        symbol: transaction.symbol.clone(),
                        date,
                    }
                })?;
                position.quantity -= transaction.volume;
                position.as_of = date;
                self.add_cash(gross, date);
            }
        }
        Ok(())
    }

    /// Snapshot rows for every position touched on `date`, symbol-ordered.
    pub fn rows_touched_on(&self, date: NaiveDate) -> Vec<Holding> {
        self.positions
            .iter()
            .filter(|(_, position)| position.as_of == date)
            .map(|(symbol, position)| Holding {
                portfolio_id: self.portfolio_id.clone(),
                symbol: symbol.clone(),
                quantity: position.quantity,
                as_of: date,
            })
            .collect()
    }

    fn add_cash(&mut self, amount: Decimal, date: NaiveDate) {
        let cash = self
            .positions
            .entry(CASH_SYMBOL.to_string())
            .or_insert(Position {
                quantity: Decimal::ZERO,
                as_of: date,
            });
        cash.quantity += amount;
        cash.as_of = date;
    }
}
