//! Date range selector for chart and dividend endpoints.

use chrono::NaiveDate;
use std::fmt;

/// Range argument for history-style endpoints.
///
/// The provider encodes the range in the URL path, either as a named
/// window (`1m`, `1y`, ...) or as a single day (`date/20180702`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRange {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    /// A single trading day.
    Day(NaiveDate),
}

impl ChartRange {
    /// The URL path segment for this range.
    pub fn as_path(&self) -> String {
        match self {
            Self::OneMonth => "1m".to_string(),
            Self::ThreeMonths => "3m".to_string(),
            Self::SixMonths => "6m".to_string(),
            Self::OneYear => "1y".to_string(),
            Self::TwoYears => "2y".to_string(),
            Self::FiveYears => "5y".to_string(),
            Self::Day(date) => format!("date/{}", date.format("%Y%m%d")),
        }
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_path())
    }
}
