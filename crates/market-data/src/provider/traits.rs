//! Market data provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{
    BalanceSheetReport, ChartRange, CompanyInfo, DividendRecord, HistoryPoint, LatestQuote,
    SymbolListing,
};

/// Gateway to an equity market data source.
///
/// One implementation per provider. All methods return normalized
/// documents: callers never deal with provider wire formats, null
/// sentinels, or epoch timestamps.
#[async_trait]
pub trait EquityDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch the full security reference list.
    async fn fetch_symbols(&self) -> Result<Vec<SymbolListing>, MarketDataError>;

    /// Fetch company reference data for one symbol.
    ///
    /// Returns `Ok(None)` when the provider does not know the symbol.
    async fn fetch_company(&self, symbol: &str) -> Result<Option<CompanyInfo>, MarketDataError>;

    /// Fetch the latest official end-of-day quote for one symbol.
    ///
    /// Returns `Ok(None)` when the symbol is unknown or has no official
    /// close yet (null close or close time upstream).
    async fn fetch_latest_quote(
        &self,
        symbol: &str,
    ) -> Result<Option<LatestQuote>, MarketDataError>;

    /// Fetch dividend declarations for one symbol over `range`.
    ///
    /// Unknown symbols and dividend-free ranges both yield an empty list.
    async fn fetch_dividends(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<Vec<DividendRecord>, MarketDataError>;

    /// Fetch the most recent quarterly balance sheet for one symbol.
    ///
    /// Returns `Ok(None)` when the symbol is unknown or has no filings.
    async fn fetch_balance_sheet(
        &self,
        symbol: &str,
    ) -> Result<Option<BalanceSheetReport>, MarketDataError>;

    /// Fetch a close-only daily price series for one symbol over `range`.
    ///
    /// Points without a close are dropped. The series is ordered by date
    /// ascending.
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<Vec<HistoryPoint>, MarketDataError>;
}
