//! Database models for the transaction ledger.

use diesel::prelude::*;
use std::str::FromStr;

use crate::utils::{format_date, parse_date, parse_decimal};
use paperfolio_core::errors::LedgerError;
use paperfolio_core::transactions::{NewTransaction, Transaction, TransactionKind};
use paperfolio_core::Error;

/// Database model for ledger rows
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(primary_key(seq))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub seq: i64,
    pub portfolio_id: String,
    pub symbol: String,
    pub kind: String,
    pub date: String,
    pub price: String,
    pub volume: String,
    pub commission: String,
}

/// Insert payload for ledger rows; seq is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransactionDB {
    pub portfolio_id: String,
    pub symbol: String,
    pub kind: String,
    pub date: String,
    pub price: String,
    pub volume: String,
    pub commission: String,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self, Error> {
        let kind = TransactionKind::from_str(&db.kind)
            .map_err(|_| LedgerError::UnsupportedTransactionKind(db.kind.clone()))?;

        Ok(Transaction {
            seq: db.seq,
            portfolio_id: db.portfolio_id,
            symbol: db.symbol,
            kind,
            date: parse_date(&db.date)?,
            price: parse_decimal(&db.price)?,
            volume: parse_decimal(&db.volume)?,
            commission: parse_decimal(&db.commission)?,
        })
    }
}

impl From<&NewTransaction> for NewTransactionDB {
    fn from(transaction: &NewTransaction) -> Self {
        NewTransactionDB {
            portfolio_id: transaction.portfolio_id.clone(),
            symbol: transaction.symbol.clone(),
            kind: transaction.kind.as_str().to_string(),
            date: format_date(transaction.date),
            price: transaction.price.to_string(),
            volume: transaction.volume.to_string(),
            commission: transaction.commission.to_string(),
        }
    }
}
