use chrono::{Duration, NaiveDate};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::{NewQuoteDB, QuoteDB};
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::quotes::dsl as quotes_dsl;
use crate::utils::{chunk_for_sqlite, format_date, parse_date};
use paperfolio_core::constants::QUOTE_LOOKBACK_DAYS;
use paperfolio_core::market_data::{Quote, QuoteRepositoryTrait};
use paperfolio_core::Result;

pub struct QuoteRepository {
    pool: Arc<DbPool>,
}

impl QuoteRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl QuoteRepositoryTrait for QuoteRepository {
    fn get_quotes_since(&self, symbols: &[String], start: NaiveDate) -> Result<Vec<Quote>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = get_connection(&self.pool)?;
        let start_str = format_date(start);

        let mut rows: Vec<QuoteDB> = Vec::new();
        for chunk in chunk_for_sqlite(symbols) {
            rows.extend(
                quotes_dsl::quotes
                    .filter(quotes_dsl::symbol.eq_any(chunk))
                    .filter(quotes_dsl::date.ge(&start_str))
                    .load::<QuoteDB>(&mut conn)
                    .into_core()?,
            );
        }
        // Chunked loads arrive per chunk; restore the global (date, symbol) order.
        rows.sort_by(|a, b| (&a.date, &a.symbol).cmp(&(&b.date, &b.symbol)));

        rows.into_iter().map(Quote::try_from).collect()
    }

    fn get_latest_quotes(
        &self,
        symbols: &[String],
        as_of: NaiveDate,
    ) -> Result<HashMap<String, Quote>> {
        if symbols.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = get_connection(&self.pool)?;
        let as_of_str = format_date(as_of);
        let window_start = format_date(as_of - Duration::days(QUOTE_LOOKBACK_DAYS));

        let mut result: HashMap<String, Quote> = HashMap::new();
        for chunk in chunk_for_sqlite(symbols) {
            let placeholders = chunk.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
            let sql = format!(
                "WITH LatestDates AS ( \
                    SELECT symbol, MAX(date) AS max_date \
                    FROM quotes \
                    WHERE symbol IN ({}) AND date <= ? AND date >= ? \
                    GROUP BY symbol \
                ) \
                SELECT q.* \
                FROM quotes q \
                INNER JOIN LatestDates ld \
                    ON q.symbol = ld.symbol \
                    AND q.date = ld.max_date",
                placeholders
            );

            let mut query = sql_query(sql).into_boxed::<Sqlite>();
            for symbol in chunk {
                query = query.bind::<Text, _>(symbol.as_str());
            }
            query = query
                .bind::<Text, _>(as_of_str.as_str())
                .bind::<Text, _>(window_start.as_str());

            let rows = query.load::<QuoteDB>(&mut conn).into_core()?;
            for row in rows {
                let quote = Quote::try_from(row)?;
                result.insert(quote.symbol.clone(), quote);
            }
        }
        Ok(result)
    }

    fn get_latest_dates(&self) -> Result<HashMap<String, NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<(String, Option<String>)> = quotes_dsl::quotes
            .group_by(quotes_dsl::symbol)
            .select((quotes_dsl::symbol, diesel::dsl::max(quotes_dsl::date)))
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

    fn append_quotes(&self, quotes: &[Quote]) -> Result<usize> {
        if quotes.is_empty() {
            return Ok(0);
        }

        let mut conn = get_connection(&self.pool)?;
        let db_rows: Vec<NewQuoteDB> = quotes.iter().map(NewQuoteDB::from).collect();

        let mut inserted = 0;
        for chunk in chunk_for_sqlite(&db_rows) {
            inserted += diesel::insert_into(quotes_dsl::quotes)
                .values(chunk)
                .execute(&mut conn)
                .into_core()?;
        }
        Ok(inserted)
    }

    fn delete_duplicates(&self) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;

        sql_query(
            "DELETE FROM quotes WHERE id NOT IN ( \
                SELECT MIN(id) FROM quotes GROUP BY symbol, date \
            )",
        )
        .execute(&mut conn)
        .into_core()
    }
}
