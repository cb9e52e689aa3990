use chrono::NaiveDate;
use diesel::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::{DividendDB, NewDividendDB};
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::dividends::dsl as dividends_dsl;
use crate::utils::{chunk_for_sqlite, format_date, parse_date};
use paperfolio_core::market_data::{DividendDeclaration, DividendRepositoryTrait};
use paperfolio_core::Result;

pub struct DividendRepository {
    pool: Arc<DbPool>,
}

impl DividendRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl DividendRepositoryTrait for DividendRepository {
    fn get_dividends_on_ex_date(
        &self,
        symbols: &[String],
        ex_date: NaiveDate,
    ) -> Result<Vec<DividendDeclaration>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = get_connection(&self.pool)?;
        let ex_date_str = format_date(ex_date);

        let mut rows: Vec<DividendDB> = Vec::new();
        for chunk in chunk_for_sqlite(symbols) {
            rows.extend(
                dividends_dsl::dividends
                    .filter(dividends_dsl::symbol.eq_any(chunk))
                    .filter(dividends_dsl::ex_date.eq(&ex_date_str))
                    .load::<DividendDB>(&mut conn)
                    .into_core()?,
            );
        }
        rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        rows.into_iter().map(DividendDeclaration::try_from).collect()
    }

    fn get_latest_ex_dates(&self) -> Result<HashMap<String, NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<(String, Option<String>)> = dividends_dsl::dividends
            .group_by(dividends_dsl::symbol)
            .select((dividends_dsl::symbol, diesel::dsl::max(dividends_dsl::ex_date)))
            .load(&mut conn)
            .into_core()?;

        let mut latest = HashMap::with_capacity(rows.len());
        for (symbol, max_date) in rows {
            if let Some(date) = max_date {
                latest.insert(symbol, parse_date(&date)?);
            }
        }
        Ok(latest)
    }

    fn append_dividends(&self, dividends: &[DividendDeclaration]) -> Result<usize> {
        if dividends.is_empty() {
            return Ok(0);
        }

        let mut conn = get_connection(&self.pool)?;
        let db_rows: Vec<NewDividendDB> = dividends.iter().map(NewDividendDB::from).collect();

        let mut inserted = 0;
        for chunk in chunk_for_sqlite(&db_rows) {
            inserted += diesel::insert_into(dividends_dsl::dividends)
                .values(chunk)
                .execute(&mut conn)
                .into_core()?;
        }
        Ok(inserted)
    }
}
