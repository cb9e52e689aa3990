/// Pseudo-symbol for the cash leg of every portfolio
pub const CASH_SYMBOL: &str = "USD";

/// Benchmark symbol used by performance reports
pub const DEFAULT_BENCHMARK_SYMBOL: &str = "SPY";

/// Date format used for storage keys and report output
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lookback window when resolving the "latest" quote for a reference date
pub const QUOTE_LOOKBACK_DAYS: i64 = 10;

/// Quotes older than this are too stale to rank on
pub const QUOTE_MAX_AGE_DAYS: i64 = 7;

/// Lookback window when resolving the "latest" ranked stock list
pub const STOCK_LIST_LOOKBACK_DAYS: i64 = 50;

/// Balance sheets older than this are too stale to rank on
pub const BALANCE_SHEET_MAX_AGE_DAYS: i64 = 183;

/// Balance sheets younger than this are not re-fetched
pub const BALANCE_SHEET_REFRESH_DAYS: i64 = 120;

/// Ranked stock lists older than this are pruned
pub const STOCK_LIST_RETENTION_DAYS: i64 = 7;
