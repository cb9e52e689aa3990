use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::{NewTransactionDB, TransactionDB};
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::transactions::dsl as transactions_dsl;
use crate::utils::{chunk_for_sqlite, format_date};
use paperfolio_core::transactions::{
    NewTransaction, Transaction, TransactionKind, TransactionRepositoryTrait,
};
use paperfolio_core::Result;

pub struct TransactionRepository {
    pool: Arc<DbPool>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    fn append(&self, transaction: NewTransaction) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;

        let row: TransactionDB = diesel::insert_into(transactions_dsl::transactions)
            .values(NewTransactionDB::from(&transaction))
            .get_result(&mut conn)
            .into_core()?;

        Transaction::try_from(row)
    }

    fn append_many(&self, transactions: &[NewTransaction]) -> Result<usize> {
        if transactions.is_empty() {
            return Ok(0);
        }

        let mut conn = get_connection(&self.pool)?;
        let db_rows: Vec<NewTransactionDB> =
            transactions.iter().map(NewTransactionDB::from).collect();

        let mut written = 0;
        for chunk in chunk_for_sqlite(&db_rows) {
            written += diesel::insert_into(transactions_dsl::transactions)
                .values(chunk)
                .execute(&mut conn)
                .into_core()?;
        }
        Ok(written)
    }

    fn get_for_portfolio_since(
        &self,
        portfolio_id: &str,
        start: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let start_str = format_date(start);

        let rows = transactions_dsl::transactions
            .filter(transactions_dsl::portfolio_id.eq(portfolio_id))
            .filter(transactions_dsl::date.ge(&start_str))
            .order((transactions_dsl::date.asc(), transactions_dsl::seq.asc()))
            .load::<TransactionDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    fn delete_dividends_since(&self, portfolio_id: &str, since: NaiveDate) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let since_str = format_date(since);

        diesel::delete(
            transactions_dsl::transactions
                .filter(transactions_dsl::portfolio_id.eq(portfolio_id))
                .filter(transactions_dsl::kind.eq(TransactionKind::Dividend.as_str()))
                .filter(transactions_dsl::date.ge(&since_str)),
        )
        .execute(&mut conn)
        .into_core()
    }
}
