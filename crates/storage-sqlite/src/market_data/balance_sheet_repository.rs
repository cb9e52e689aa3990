use chrono::{Duration, NaiveDate};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::{BalanceSheetDB, NewBalanceSheetDB};
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::balance_sheets::dsl as balance_sheets_dsl;
use crate::utils::{chunk_for_sqlite, format_date, parse_date};
use paperfolio_core::constants::BALANCE_SHEET_MAX_AGE_DAYS;
use paperfolio_core::market_data::{BalanceSheet, BalanceSheetRepositoryTrait};
use paperfolio_core::Result;

pub struct BalanceSheetRepository {
    pool: Arc<DbPool>,
}

impl BalanceSheetRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl BalanceSheetRepositoryTrait for BalanceSheetRepository {
    fn get_latest_reports(
        &self,
        symbols: &[String],
        as_of: NaiveDate,
    ) -> Result<Vec<BalanceSheet>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = get_connection(&self.pool)?;
        let as_of_str = format_date(as_of);
        let window_start = format_date(as_of - Duration::days(BALANCE_SHEET_MAX_AGE_DAYS));

        let mut rows: Vec<BalanceSheetDB> = Vec::new();
        for chunk in chunk_for_sqlite(symbols) {
            let placeholders = chunk.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
            let sql = format!(
                "WITH LatestDates AS ( \
                    SELECT symbol, MAX(report_date) AS max_report_date \
                    FROM balance_sheets \
                    WHERE symbol IN ({}) AND report_date <= ? AND report_date >= ? \
                    GROUP BY symbol \
                ) \
                SELECT b.* \
                FROM balance_sheets b \
                INNER JOIN LatestDates ld \
                    ON b.symbol = ld.symbol \
                    AND b.report_date = ld.max_report_date",
                placeholders
            );

            let mut query = sql_query(sql).into_boxed::<Sqlite>();
            for symbol in chunk {
                query = query.bind::<Text, _>(symbol.as_str());
            }
            query = query
                .bind::<Text, _>(as_of_str.as_str())
                .bind::<Text, _>(window_start.as_str());

            rows.extend(query.load::<BalanceSheetDB>(&mut conn).into_core()?);
        }
        rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        rows.into_iter().map(BalanceSheet::try_from).collect()
    }

    fn get_latest_report_dates(&self) -> Result<HashMap<String, NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<(String, Option<String>)> = balance_sheets_dsl::balance_sheets
            .group_by(balance_sheets_dsl::symbol)
            .select((
                balance_sheets_dsl::symbol,
                diesel::dsl::max(balance_sheets_dsl::report_date),
            ))
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

    fn append_balance_sheets(&self, sheets: &[BalanceSheet]) -> Result<usize> {
        if sheets.is_empty() {
            return Ok(0);
        }

        let mut conn = get_connection(&self.pool)?;
        let db_rows: Vec<NewBalanceSheetDB> = sheets.iter().map(NewBalanceSheetDB::from).collect();

        let mut inserted = 0;
        for chunk in chunk_for_sqlite(&db_rows) {
            inserted += diesel::insert_into(balance_sheets_dsl::balance_sheets)
                .values(chunk)
                .execute(&mut conn)
                .into_core()?;
        }
        Ok(inserted)
    }

    fn delete_duplicates(&self) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;

        sql_query(
            "DELETE FROM balance_sheets WHERE id NOT IN ( \
                SELECT MIN(id) FROM balance_sheets GROUP BY symbol, report_date \
            )",
        )
        .execute(&mut conn)
        .into_core()
    }
}
