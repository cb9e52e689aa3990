use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One date of a performance export: cumulative percent returns for the
/// portfolio and the benchmark since inception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub portfolio_return: Decimal,
    pub benchmark_return: Decimal,
}

/// Export payload written to `performance_<portfolio_id>.json`.
///
/// The series opens with a zero point dated at the benchmark close
/// preceding inception and keeps only dates both series cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub portfolio_id: String,
    pub benchmark_symbol: String,
    pub series: Vec<PerformancePoint>,
}
