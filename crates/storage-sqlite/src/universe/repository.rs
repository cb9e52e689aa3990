use chrono::{Duration, NaiveDate};
use diesel::prelude::*;
use std::sync::Arc;

use super::model::{NewRankedStockDB, RankedStockDB};
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::stock_list::dsl as stock_list_dsl;
use crate::utils::{chunk_for_sqlite, format_date};
use paperfolio_core::constants::STOCK_LIST_LOOKBACK_DAYS;
use paperfolio_core::universe::{RankedStock, StockListRepositoryTrait};
use paperfolio_core::Result;

pub struct StockListRepository {
    pool: Arc<DbPool>,
}

impl StockListRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl StockListRepositoryTrait for StockListRepository {
    fn get_stock_list_on(&self, date: NaiveDate) -> Result<Vec<RankedStock>> {
        let mut conn = get_connection(&self.pool)?;
        let date_str = format_date(date);

        let rows = stock_list_dsl::stock_list
            .filter(stock_list_dsl::date.eq(&date_str))
            .order(stock_list_dsl::rank.asc())
            .load::<RankedStockDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(RankedStock::try_from).collect()
    }

    fn get_latest_stock_list(&self, as_of: NaiveDate) -> Result<Vec<RankedStock>> {
        let mut conn = get_connection(&self.pool)?;
        let as_of_str = format_date(as_of);
        let window_start = format_date(as_of - Duration::days(STOCK_LIST_LOOKBACK_DAYS));

        let latest: Option<String> = stock_list_dsl::stock_list
            .filter(stock_list_dsl::date.le(&as_of_str))
            .filter(stock_list_dsl::date.ge(&window_start))
            .select(diesel::dsl::max(stock_list_dsl::date))
            .first(&mut conn)
            .into_core()?;

        let Some(list_date) = latest else {
            return Ok(Vec::new());
        };

        let rows = stock_list_dsl::stock_list
            .filter(stock_list_dsl::date.eq(&list_date))
            .order(stock_list_dsl::rank.asc())
            .load::<RankedStockDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(RankedStock::try_from).collect()
    }

    fn append_stock_list(&self, rows: &[RankedStock]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut conn = get_connection(&self.pool)?;
        let db_rows: Vec<NewRankedStockDB> = rows.iter().map(NewRankedStockDB::from).collect();

        let mut inserted = 0;
        for chunk in chunk_for_sqlite(&db_rows) {
            inserted += diesel::insert_into(stock_list_dsl::stock_list)
                .values(chunk)
                .execute(&mut conn)
                .into_core()?;
        }
        Ok(inserted)
    }

    fn delete_before(&self, cutoff: NaiveDate) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let cutoff_str = format_date(cutoff);

        diesel::delete(stock_list_dsl::stock_list.filter(stock_list_dsl::date.lt(&cutoff_str)))
            .execute(&mut conn)
            .into_core()
    }
}
