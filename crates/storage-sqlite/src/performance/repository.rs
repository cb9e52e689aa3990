use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::PerformanceRecordDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::performance::dsl as performance_dsl;
use crate::utils::{chunk_for_sqlite, format_date};
use paperfolio_core::performance::{PerformanceRecord, PerformanceRepositoryTrait};
use paperfolio_core::Result;

pub struct PerformanceRepository {
    pool: Arc<DbPool>,
}

impl PerformanceRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl PerformanceRepositoryTrait for PerformanceRepository {
    fn get_latest_record(&self, portfolio_id: &str) -> Result<Option<PerformanceRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let row = performance_dsl::performance
            .filter(performance_dsl::portfolio_id.eq(portfolio_id))
            .order(performance_dsl::date.desc())
            .first::<PerformanceRecordDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(PerformanceRecord::try_from).transpose()
    }

    fn get_records_since(
        &self,
        portfolio_id: &str,
        start: NaiveDate,
    ) -> Result<Vec<PerformanceRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let start_str = format_date(start);

        let rows = performance_dsl::performance
            .filter(performance_dsl::portfolio_id.eq(portfolio_id))
            .filter(performance_dsl::date.ge(&start_str))
            .order(performance_dsl::date.asc())
            .load::<PerformanceRecordDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(PerformanceRecord::try_from).collect()
    }

    fn append_records(&self, records: &[PerformanceRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut conn = get_connection(&self.pool)?;
        let db_rows: Vec<PerformanceRecordDB> =
            records.iter().map(PerformanceRecordDB::from).collect();

        let mut written = 0;
        for chunk in chunk_for_sqlite(&db_rows) {
            written += diesel::replace_into(performance_dsl::performance)
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
            performance_dsl::performance
                .filter(performance_dsl::portfolio_id.eq(portfolio_id))
                .filter(performance_dsl::date.ge(&since_str)),
        )
        .execute(&mut conn)
        .into_core()
    }
}
