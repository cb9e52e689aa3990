//! Normalized provider documents.
//!
//! Every type here is already past wire normalization: dates are parsed,
//! prices are `Decimal`, and fields the provider leaves null stay `Option`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One row of the provider's security reference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolListing {
    pub symbol: String,
    pub name: String,
    /// Issue type code, "cs" for common stock.
    pub security_type: String,
    pub region: String,
    pub currency: String,
    pub exchange: String,
    pub is_enabled: bool,
}

/// Company reference data for one symbol.
///
/// Fields the provider omits stay `None`; the ingest layer decides how to
/// fill them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyInfo {
    pub symbol: String,
    pub company_name: Option<String>,
    pub security_name: Option<String>,
    pub issue_type: Option<String>,
    pub industry: Option<String>,
    pub sector: Option<String>,
}

/// The latest official end-of-day quote for one symbol.
///
/// Only produced when the provider reports both an official close and its
/// close time; `date` is the trading day derived from that close time.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestQuote {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: Decimal,
    pub market_cap: Option<Decimal>,
    pub pe_ratio: Option<Decimal>,
}

/// One dividend declaration.
///
/// `amount` and `payment_date` are nullable upstream and stay optional
/// here; consumers skip declarations missing either.
#[derive(Debug, Clone, PartialEq)]
pub struct DividendRecord {
    pub symbol: String,
    pub ex_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub currency: String,
}

/// The most recent quarterly balance sheet for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSheetReport {
    pub symbol: String,
    pub report_date: NaiveDate,
    pub shareholder_equity: Option<Decimal>,
}

/// One day of a close-only price history series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub close: Decimal,
}
