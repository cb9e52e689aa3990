use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use std::sync::Arc;

use super::model::HoldingDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::holdings::dsl as holdings_dsl;
use crate::utils::{chunk_for_sqlite, format_date};
use paperfolio_core::ledger::{Holding, HoldingRepositoryTrait};
use paperfolio_core::Result;

pub struct HoldingRepository {
    pool: Arc<DbPool>,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl HoldingRepositoryTrait for HoldingRepository {
    fn get_latest_holdings(&self, portfolio_id: &str, date: NaiveDate) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let date_str = format_date(date);

        let rows = sql_query(
            "WITH LatestDates AS ( \
                SELECT symbol, MAX(as_of) AS max_as_of \
                FROM holdings \
                WHERE portfolio_id = ? AND as_of <= ? \
                GROUP BY symbol \
            ) \
            SELECT h.* \
            FROM holdings h \
            INNER JOIN LatestDates ld \
                ON h.symbol = ld.symbol \
                AND h.as_of = ld.max_as_of \
            WHERE h.portfolio_id = ? \
            ORDER BY h.symbol",
        )
        .into_boxed::<Sqlite>()
        .bind::<Text, _>(portfolio_id)
        .bind::<Text, _>(date_str.as_str())
        .bind::<Text, _>(portfolio_id)
        .load::<HoldingDB>(&mut conn)
        .into_core()?;

        rows.into_iter().map(Holding::try_from).collect()
    }

    fn get_holdings_since(&self, portfolio_id: &str, start: NaiveDate) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let start_str = format_date(start);

        let rows = holdings_dsl::holdings
            .filter(holdings_dsl::portfolio_id.eq(portfolio_id))
            .filter(holdings_dsl::as_of.ge(&start_str))
            .order((holdings_dsl::as_of.asc(), holdings_dsl::symbol.asc()))
            .load::<HoldingDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(Holding::try_from).collect()
    }

    fn append_holdings(&self, rows: &[Holding]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut conn = get_connection(&self.pool)?;
        let db_rows: Vec<HoldingDB> = rows.iter().map(HoldingDB::from).collect();

        let mut written = 0;
        for chunk in chunk_for_sqlite(&db_rows) {
            written += diesel::replace_into(holdings_dsl::holdings)
                .values(chunk)
                .execute(&mut conn)
                .into_core()?;
        }
        Ok(written)
    }

    fn delete_since(&self, portfolio_id: &str, since: NaiveDate) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let since_str = format_date(since);

        diesel::delete(
            holdings_dsl::holdings
                .filter(holdings_dsl::portfolio_id.eq(portfolio_id))
                .filter(holdings_dsl::as_of.ge(&since_str)),
        )
        .execute(&mut conn)
        .into_core()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn test_repository() -> (HoldingRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db").to_string_lossy().to_string();
        let pool = create_pool(&db_path).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        (HoldingRepository::new(pool), temp_dir)
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn holding(portfolio_id: &str, symbol: &str, quantity: Decimal, as_of: NaiveDate) -> Holding {
        Holding {
            portfolio_id: portfolio_id.to_string(),
            symbol: symbol.to_string(),
            quantity,
            as_of,
        }
    }

    #[test]
    fn test_get_latest_holdings_resolves_position_view() {
        let (repo, _guard) = test_repository();

        repo.append_holdings(&[
            holding("p1", "AAA", dec!(10), date(2018, 7, 2)),
            holding("p1", "AAA", dec!(15), date(2018, 7, 5)),
            holding("p1", "USD", dec!(1000), date(2018, 7, 2)),
            // Appended after the reference date; must not surface.
            holding("p1", "BBB", dec!(5), date(2018, 7, 9)),
            // Another portfolio's row must not leak.
            holding("p2", "AAA", dec!(99), date(2018, 7, 3)),
        ])
        .expect("append failed");

        let view = repo
            .get_latest_holdings("p1", date(2018, 7, 6))
            .expect("query failed");

        assert_eq!(
            view,
            vec![
                holding("p1", "AAA", dec!(15), date(2018, 7, 5)),
                holding("p1", "USD", dec!(1000), date(2018, 7, 2)),
            ]
        );
    }

    #[test]
    fn test_get_holdings_since_orders_by_date_then_symbol() {
        let (repo, _guard) = test_repository();

        repo.append_holdings(&[
            holding("p1", "BBB", dec!(5), date(2018, 7, 3)),
            holding("p1", "AAA", dec!(10), date(2018, 7, 3)),
            holding("p1", "AAA", dec!(10), date(2018, 7, 2)),
        ])
        .expect("append failed");

        let rows = repo
            .get_holdings_since("p1", date(2018, 7, 3))
            .expect("query failed");

        assert_eq!(
            rows,
            vec![
                holding("p1", "AAA", dec!(10), date(2018, 7, 3)),
                holding("p1", "BBB", dec!(5), date(2018, 7, 3)),
            ]
        );
    }

    #[test]
    fn test_append_holdings_overwrites_same_day() {
        let (repo, _guard) = test_repository();

        repo.append_holdings(&[holding("p1", "AAA", dec!(10), date(2018, 7, 2))])
            .expect("append failed");
        repo.append_holdings(&[holding("p1", "AAA", dec!(12), date(2018, 7, 2))])
            .expect("append failed");

        let rows = repo
            .get_holdings_since("p1", date(2018, 7, 1))
            .expect("query failed");
        assert_eq!(rows, vec![holding("p1", "AAA", dec!(12), date(2018, 7, 2))]);
    }

    #[test]
    fn test_delete_since_scopes_to_portfolio() {
        let (repo, _guard) = test_repository();

        repo.append_holdings(&[
            holding("p1", "AAA", dec!(10), date(2018, 7, 2)),
            holding("p1", "AAA", dec!(15), date(2018, 7, 5)),
            holding("p2", "AAA", dec!(99), date(2018, 7, 5)),
        ])
        .expect("append failed");

        let removed = repo.delete_since("p1", date(2018, 7, 5)).expect("delete failed");
        assert_eq!(removed, 1);

        let p1 = repo.get_holdings_since("p1", date(2018, 7, 1)).expect("query failed");
        assert_eq!(p1, vec![holding("p1", "AAA", dec!(10), date(2018, 7, 2))]);

        let p2 = repo.get_holdings_since("p2", date(2018, 7, 1)).expect("query failed");
        assert_eq!(p2.len(), 1);
    }
}
