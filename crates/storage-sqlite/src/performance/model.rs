//! Database model for daily valuation records.

use diesel::prelude::*;

use crate::utils::{format_date, parse_date, parse_decimal};
use paperfolio_core::performance::PerformanceRecord;
use paperfolio_core::Error;

/// Database model for performance records. The primary key is
/// "{portfolio_id}_{date}", so re-valuing a day overwrites its row.
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::performance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PerformanceRecordDB {
    pub id: String,
    pub portfolio_id: String,
    pub date: String,
    pub close_value: String,
    pub prev_close_value: String,
    pub adj_prev_close_value: String,
    pub adj_close_value: String,
    pub percent_return: String,
}

impl TryFrom<PerformanceRecordDB> for PerformanceRecord {
    type Error = Error;

    fn try_from(db: PerformanceRecordDB) -> Result<Self, Error> {
        Ok(PerformanceRecord {
            portfolio_id: db.portfolio_id,
            date: parse_date(&db.date)?,
            close_value: parse_decimal(&db.close_value)?,
            prev_close_value: parse_decimal(&db.prev_close_value)?,
            adj_prev_close_value: parse_decimal(&db.adj_prev_close_value)?,
            adj_close_value: parse_decimal(&db.adj_close_value)?,
            percent_return: parse_decimal(&db.percent_return)?,
        })
    }
}

impl From<&PerformanceRecord> for PerformanceRecordDB {
    fn from(record: &PerformanceRecord) -> Self {
        let date = format_date(record.date);
        PerformanceRecordDB {
            id: format!("{}_{}", record.portfolio_id, date),
            portfolio_id: record.portfolio_id.clone(),
            date,
            close_value: record.close_value.to_string(),
            prev_close_value: record.prev_close_value.to_string(),
            adj_prev_close_value: record.adj_prev_close_value.to_string(),
            adj_close_value: record.adj_close_value.to_string(),
            percent_return: record.percent_return.to_string(),
        }
    }
}
