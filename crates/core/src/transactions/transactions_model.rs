use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::CASH_SYMBOL;
use crate::transactions::transactions_constants::*;

/// The five ledger movements the replay understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Buy,
    Sell,
    Dividend,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => TRANSACTION_KIND_DEPOSIT,
            TransactionKind::Withdrawal => TRANSACTION_KIND_WITHDRAWAL,
            TransactionKind::Buy => TRANSACTION_KIND_BUY,
            TransactionKind::Sell => TRANSACTION_KIND_SELL,
            TransactionKind::Dividend => TRANSACTION_KIND_DIVIDEND,
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == TRANSACTION_KIND_DEPOSIT => Ok(TransactionKind::Deposit),
            s if s == TRANSACTION_KIND_WITHDRAWAL => Ok(TransactionKind::Withdrawal),
            s if s == TRANSACTION_KIND_BUY => Ok(TransactionKind::Buy),
            s if s == TRANSACTION_KIND_SELL => Ok(TransactionKind::Sell),
            s if s == TRANSACTION_KIND_DIVIDEND => Ok(TransactionKind::Dividend),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the append-only ledger.
///
/// `seq` is assigned by storage on insert and is strictly increasing, so
/// (date, seq) gives the deterministic order replay relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub seq: i64,
    pub portfolio_id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
    /// Per-share price for trades, per-share amount for dividends, 1 for
    /// pure cash movements.
    pub price: Decimal,
    /// Shares for trades, cash amount for deposits/withdrawals, held
    /// quantity for dividends.
    pub volume: Decimal,
    /// Transaction cost. Always 0 today, reserved for future use; the
    /// replay ignores it.
    pub commission: Decimal,
}

impl Transaction {
    /// Cash flow into (positive) or out of (negative) the cash leg.
    pub fn cash_delta(&self) -> Decimal {
        let gross = self.price * self.volume;
        match self.kind {
            TransactionKind::Deposit | TransactionKind::Dividend | TransactionKind::Sell => gross,
            TransactionKind::Withdrawal | TransactionKind::Buy => -gross,
        }
    }
}

/// A ledger row that has not been persisted yet (no `seq`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub portfolio_id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub price: Decimal,
    pub volume: Decimal,
    pub commission: Decimal,
}

impl NewTransaction {
    pub fn deposit(portfolio_id: &str, date: NaiveDate, amount: Decimal) -> Self {
        NewTransaction {
            portfolio_id: portfolio_id.to_string(),
            symbol: CASH_SYMBOL.to_string(),
            kind: TransactionKind::Deposit,
            date,
            price: dec!(1),
            volume: amount,
            commission: dec!(0),
        }
    }

    pub fn withdrawal(portfolio_id: &str, date: NaiveDate, amount: Decimal) -> Self {
        NewTransaction {
            portfolio_id: portfolio_id.to_string(),
            symbol: CASH_SYMBOL.to_string(),
            kind: TransactionKind::Withdrawal,
            date,
            price: dec!(1),
            volume: amount,
            commission: dec!(0),
        }
    }

    pub fn buy(
        portfolio_id: &str,
        symbol: &str,
        date: NaiveDate,
        price: Decimal,
        volume: Decimal,
    ) -> Self {
        NewTransaction {
            portfolio_id: portfolio_id.to_string(),
            symbol: symbol.to_string(),
            kind: TransactionKind::Buy,
            date,
            price,
            volume,
            commission: dec!(0),
        }
    }

    pub fn sell(
        portfolio_id: &str,
        symbol: &str,
        date: NaiveDate,
        price: Decimal,
        volume: Decimal,
    ) -> Self {
        NewTransaction {
            portfolio_id: portfolio_id.to_string(),
            symbol: symbol.to_string(),
            kind: TransactionKind::Sell,
            date,
            price,
            volume,
            commission: dec!(0),
        }
    }

    pub fn dividend(
        portfolio_id: &str,
        symbol: &str,
        payment_date: NaiveDate,
        amount_per_share: Decimal,
        held_volume: Decimal,
    ) -> Self {
        NewTransaction {
            portfolio_id: portfolio_id.to_string(),
            symbol: symbol.to_string(),
            kind: TransactionKind::Dividend,
            date: payment_date,
            price: amount_per_share,
            volume: held_volume,
            commission: dec!(0),
        }
    }
}
