//! Market data domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One end-of-day quote. History rows backfilled from price charts carry
/// only a close; rows from the live quote feed also carry fundamentals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: Decimal,
    pub market_cap: Option<Decimal>,
    pub pe_ratio: Option<Decimal>,
}

/// A dividend declaration as published by the data provider.
///
/// `amount` and `payment_date` are nullable upstream; the projector skips
/// declarations missing either.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DividendDeclaration {
    pub symbol: String,
    pub ex_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub currency: String,
}

/// Latest quarterly balance sheet figures used by the universe ranker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub symbol: String,
    pub report_date: NaiveDate,
    pub shareholder_equity: Option<Decimal>,
}

/// Share classes that duplicate a primary listing.
pub const EXCLUDED_SHARE_CLASSES: [&str; 5] =
    ["Class B", "Class C", "Class D", "Class E", "Class F"];

/// Industries whose balance sheets do not compare well under the
/// return-on-equity screen (holdings of investments as assets).
pub const EXCLUDED_INDUSTRIES: [&str; 9] = [
    "Investment Managers",
    "Real Estate Investment Trusts",
    "Regional Banks",
    "Financial Conglomerates",
    "Major Banks",
    "Investment Banks/Brokers",
    "Savings Banks",
    "Investment Trusts/Mutual Funds",
    "Financial Publishing/Services",
];

const TICKER_EXCLUDED_CHARS: [char; 3] = ['#', '.', '-'];

/// Reference data for one listed security.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymbolProfile {
    pub symbol: String,
    pub name: String,
    pub security_name: String,
    pub security_type: String,
    pub region: String,
    pub currency: String,
    pub exchange: String,
    pub industry: String,
    pub enabled: bool,
}

impl SymbolProfile {
    /// Whether this profile passes the investable-universe screen:
    /// enabled US common stock in USD on NASDAQ/NYSE, primary share class,
    /// plain ticker, and not in an excluded industry.
    pub fn is_investable(&self) -> bool {
        self.enabled
            && self.security_type == "cs"
            && self.region == "US"
            && self.currency == "USD"
            && matches!(self.exchange.as_str(), "NAS" | "NYS")
            && !EXCLUDED_SHARE_CLASSES
                .iter()
                .any(|class| self.security_name.contains(class))
            && !self.symbol.contains(&TICKER_EXCLUDED_CHARS[..])
            && !EXCLUDED_INDUSTRIES
                .iter()
                .any(|industry| self.industry == *industry)
    }
}

/// Symbols eligible for ingest and ranking: every investable profile plus
/// the benchmark, which is tracked regardless of its own profile.
pub fn active_symbols(profiles: &[SymbolProfile], benchmark_symbol: &str) -> Vec<String> {
    let mut symbols: Vec<String> = profiles
        .iter()
        .filter(|p| p.is_investable())
        .map(|p| p.symbol.clone())
        .collect();
    if !symbols.iter().any(|s| s == benchmark_symbol) {
        symbols.push(benchmark_symbol.to_string());
    }
    symbols
}
