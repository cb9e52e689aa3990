//! IEX Cloud market data provider implementation.
//!
//! This module provides market data from the IEX Cloud API:
//! - Security reference list via /ref-data/symbols
//! - Company reference data via /stock/{symbol}/company
//! - Official end-of-day quotes via /stock/{symbol}/quote
//! - Dividend declarations via /stock/{symbol}/dividends/{range}
//! - Quarterly balance sheets via /stock/{symbol}/balance-sheet
//! - Close-only daily history via /stock/{symbol}/chart/{range}
//!
//! The API token travels as a `token` query parameter on every request.
//! API documentation: https://iexcloud.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::{retry_transient, MarketDataError};
use crate::models::{
    BalanceSheetReport, ChartRange, CompanyInfo, DividendRecord, HistoryPoint, LatestQuote,
    SymbolListing,
};
use crate::provider::EquityDataProvider;

const BASE_URL: &str = "https://cloud.iexapis.com/v1";
const PROVIDER_ID: &str = "IEX";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// API Response Structures
// ============================================================================

/// One entry of /ref-data/symbols
#[derive(Debug, Deserialize)]
struct SymbolEntry {
    symbol: String,
    /// Listing name
    name: Option<String>,
    /// Issue type code ("cs", "et", "ps", ...)
    #[serde(rename = "type")]
    security_type: Option<String>,
    region: Option<String>,
    currency: Option<String>,
    exchange: Option<String>,
    /// Whether the listing is currently tradable
    #[serde(rename = "isEnabled", default)]
    is_enabled: bool,
    // Note: iexId, date, figi, cik exist but not used
}

/// Response from /stock/{symbol}/company
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyResponse {
    symbol: Option<String>,
    company_name: Option<String>,
    security_name: Option<String>,
    issue_type: Option<String>,
    industry: Option<String>,
    sector: Option<String>,
    // Note: exchange, website, description, CEO exist but not used
}

/// Response from /stock/{symbol}/quote
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    /// Official close price. Null until the first close after listing.
    close: Option<f64>,
    /// Millisecond epoch of the official close. Null outside trading days.
    close_time: Option<i64>,
    /// Market capitalization in dollars
    market_cap: Option<f64>,
    /// Price-to-earnings ratio. Null for loss-making companies.
    pe_ratio: Option<f64>,
    // Note: latestPrice, open, high, low, volume exist but not used
}

/// One entry of /stock/{symbol}/dividends/{range}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DividendEntry {
    /// Ex-dividend date, "YYYY-MM-DD". Occasionally empty.
    ex_date: Option<String>,
    /// Payment date, "YYYY-MM-DD". Null until announced.
    payment_date: Option<String>,
    /// Cash amount per share. Null for non-cash distributions.
    amount: Option<f64>,
    /// Payment currency
    currency: Option<String>,
    // Note: recordDate, declaredDate, flag, frequency exist but not used
}

/// Response from /stock/{symbol}/balance-sheet
#[derive(Debug, Deserialize)]
struct BalanceSheetResponse {
    #[serde(default)]
    balancesheet: Vec<BalanceSheetEntry>,
}

/// One report inside a balance sheet response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceSheetEntry {
    /// Fiscal quarter end, "YYYY-MM-DD"
    report_date: Option<NaiveDate>,
    /// Total shareholder equity in dollars
    shareholder_equity: Option<f64>,
    // Note: totalAssets, totalDebt and the other line items exist but not used
}

/// One day of /stock/{symbol}/chart/{range}
#[derive(Debug, Deserialize)]
struct ChartPoint {
    date: NaiveDate,
    /// Close price. Null on days the listing did not trade.
    close: Option<f64>,
    // Note: volume, change, changePercent, changeOverTime exist but not used
}

// ============================================================================
// IexProvider
// ============================================================================

/// IEX Cloud market data provider.
///
/// Talks to the production host by default;
/// [`with_base_url`](Self::with_base_url) points the client at another
/// host such as the sandbox.
pub struct IexProvider {
    client: Client,
    base_url: String,
    token: String,
}

impl IexProvider {
    /// Create a provider against the production API with the given token.
    pub fn new(token: String) -> Self {
        Self::with_base_url(BASE_URL.to_string(), token)
    }

    /// Create a provider against a custom API host.
    pub fn with_base_url(base_url: String, token: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Make a GET request to the IEX API, classifying error statuses.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self.client.get(&url);

        request = request.query(&[("token", self.token.as_str())]);
        for (key, value) in params {
            request = request.query(&[(key, value)]);
        }

        debug!("IEX request: {}", endpoint);

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();

        // 429 is the rate limiter, 402 is an exhausted message quota
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::PAYMENT_REQUIRED
        {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        // Rejected token
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API token".to_string(),
            });
        }

        // Unknown symbols come back as 404 with a plain text body
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(endpoint.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body.trim()),
            });
        }

        response.text().await.map_err(MarketDataError::Network)
    }

    /// Fetch with bounded retries on transient failures.
    async fn fetch_with_retry(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        retry_transient(endpoint, || self.fetch(endpoint, params)).await
    }
}

// ============================================================================
// Response Mapping
// ============================================================================

fn listing_from_entry(entry: SymbolEntry) -> SymbolListing {
    SymbolListing {
        symbol: entry.symbol,
        name: entry.name.unwrap_or_default(),
        security_type: entry.security_type.unwrap_or_default(),
        region: entry.region.unwrap_or_default(),
        currency: entry.currency.unwrap_or_default(),
        exchange: entry.exchange.unwrap_or_default(),
        is_enabled: entry.is_enabled,
    }
}

/// An official close needs both a price and a close time; anything less
/// means the quote is not final yet.
fn quote_from_response(response: QuoteResponse, symbol: &str) -> Option<LatestQuote> {
    let close = response.close?;
    let close_time = response.close_time?;
    let date = DateTime::from_timestamp_millis(close_time)?.date_naive();
    let close = Decimal::try_from(close).ok()?;

    Some(LatestQuote {
        symbol: symbol.to_string(),
        date,
        close,
        market_cap: response.market_cap.and_then(|v| Decimal::try_from(v).ok()),
        pe_ratio: response.pe_ratio.and_then(|v| Decimal::try_from(v).ok()),
    })
}

/// A declaration without an ex date cannot be keyed and is dropped; the
/// other fields stay optional.
fn dividend_from_entry(entry: DividendEntry, symbol: &str) -> Option<DividendRecord> {
    let ex_date = parse_date(entry.ex_date.as_deref())?;

    Some(DividendRecord {
        symbol: symbol.to_string(),
        ex_date,
        payment_date: parse_date(entry.payment_date.as_deref()),
        amount: entry.amount.and_then(|v| Decimal::try_from(v).ok()),
        currency: entry.currency.unwrap_or_else(|| "USD".to_string()),
    })
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?, "%Y-%m-%d").ok()
}

fn closes_from_chart(points: Vec<ChartPoint>) -> Vec<HistoryPoint> {
    let mut closes: Vec<HistoryPoint> = points
        .into_iter()
        .filter_map(|point| {
            let close = Decimal::try_from(point.close?).ok()?;
            Some(HistoryPoint {
                date: point.date,
                close,
            })
        })
        .collect();
    closes.sort_by_key(|point| point.date);
    closes
}

// ============================================================================
// EquityDataProvider Implementation
// ============================================================================

#[async_trait]
impl EquityDataProvider for IexProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_symbols(&self) -> Result<Vec<SymbolListing>, MarketDataError> {
        let text = self.fetch_with_retry("/ref-data/symbols", &[]).await?;
        let entries: Vec<SymbolEntry> = serde_json::from_str(&text)?;

        let listings: Vec<SymbolListing> = entries.into_iter().map(listing_from_entry).collect();

        debug!("IEX returned {} reference listings", listings.len());
        Ok(listings)
    }

    async fn fetch_company(&self, symbol: &str) -> Result<Option<CompanyInfo>, MarketDataError> {
        let endpoint = format!("/stock/{}/company", symbol);
        let text = match self.fetch_with_retry(&endpoint, &[]).await {
            Ok(text) => text,
            Err(MarketDataError::SymbolNotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };

        let response: CompanyResponse = serde_json::from_str(&text)?;

        Ok(Some(CompanyInfo {
            symbol: response.symbol.unwrap_or_else(|| symbol.to_string()),
            company_name: response.company_name,
            security_name: response.security_name,
            issue_type: response.issue_type,
            industry: response.industry,
            sector: response.sector,
        }))
    }

    async fn fetch_latest_quote(
        &self,
        symbol: &str,
    ) -> Result<Option<LatestQuote>, MarketDataError> {
        let endpoint = format!("/stock/{}/quote", symbol);
        let text = match self.fetch_with_retry(&endpoint, &[]).await {
            Ok(text) => text,
            Err(MarketDataError::SymbolNotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };

        let response: QuoteResponse = serde_json::from_str(&text)?;

        let quote = quote_from_response(response, symbol);
        if quote.is_none() {
            debug!("No official close for {} yet", symbol);
        }
        Ok(quote)
    }

    async fn fetch_dividends(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<Vec<DividendRecord>, MarketDataError> {
        let endpoint = format!("/stock/{}/dividends/{}", symbol, range.as_path());
        let text = match self.fetch_with_retry(&endpoint, &[]).await {
            Ok(text) => text,
            Err(MarketDataError::SymbolNotFound(_)) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let entries: Vec<DividendEntry> = serde_json::from_str(&text)?;

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match dividend_from_entry(entry, symbol) {
                Some(record) => records.push(record),
                None => warn!("Skipping dividend without ex date for {}", symbol),
            }
        }
        Ok(records)
    }

    async fn fetch_balance_sheet(
        &self,
        symbol: &str,
    ) -> Result<Option<BalanceSheetReport>, MarketDataError> {
        let endpoint = format!("/stock/{}/balance-sheet", symbol);
        let params = [("last", "1"), ("period", "quarter")];
        let text = match self.fetch_with_retry(&endpoint, &params).await {
            Ok(text) => text,
            Err(MarketDataError::SymbolNotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };

        let response: BalanceSheetResponse = serde_json::from_str(&text)?;

        let Some(entry) = response.balancesheet.into_iter().next() else {
            return Ok(None);
        };
        let Some(report_date) = entry.report_date else {
            warn!("Balance sheet for {} has no report date", symbol);
            return Ok(None);
        };

        Ok(Some(BalanceSheetReport {
            symbol: symbol.to_string(),
            report_date,
            shareholder_equity: entry
                .shareholder_equity
                .and_then(|v| Decimal::try_from(v).ok()),
        }))
    }

    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<Vec<HistoryPoint>, MarketDataError> {
        let endpoint = format!("/stock/{}/chart/{}", symbol, range.as_path());
        let params = [("chartByDay", "true"), ("chartCloseOnly", "true")];
        let text = match self.fetch_with_retry(&endpoint, &params).await {
            Ok(text) => text,
            Err(MarketDataError::SymbolNotFound(_)) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let points: Vec<ChartPoint> = serde_json::from_str(&text)?;
        let closes = closes_from_chart(points);

        debug!(
            "IEX returned {} daily closes for {} over {}",
            closes.len(),
            symbol,
            range
        );
        Ok(closes)
    }
}

// ============================================================================
// Tests
// ============================================================================
