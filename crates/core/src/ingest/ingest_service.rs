//! Market data ETL against the provider gateway.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use log::{debug, info, warn};

use paperfolio_market_data::{
    ChartRange, CompanyInfo, DividendRecord, EquityDataProvider, LatestQuote, SymbolListing,
};

use crate::constants::{BALANCE_SHEET_REFRESH_DAYS, CASH_SYMBOL};
use crate::errors::Result;
use crate::ledger::HoldingRepositoryTrait;
use crate::market_data::{
    active_symbols, BalanceSheet, BalanceSheetRepositoryTrait, DividendDeclaration,
    DividendRepositoryTrait, Quote, QuoteRepositoryTrait, SymbolProfile, SymbolRepositoryTrait,
};
use crate::portfolios::PortfolioRepositoryTrait;

/// Issue type code of a common stock in the reference feed.
const COMMON_STOCK_TYPE: &str = "cs";

/// Symbols fetched from the provider concurrently.
const BATCH_SIZE: usize = 10;

/// Pulls provider data into the store.
///
/// All sync operations share the same shape: fetch from the provider,
/// compare against the store's latest date for the symbol, insert only
/// newer rows. A provider failure on one symbol is logged and skipped;
/// the rest of the batch continues.
pub struct IngestService {
    provider: Arc<dyn EquityDataProvider>,
    symbol_repository: Arc<dyn SymbolRepositoryTrait>,
    quote_repository: Arc<dyn QuoteRepositoryTrait>,
    dividend_repository: Arc<dyn DividendRepositoryTrait>,
    balance_sheet_repository: Arc<dyn BalanceSheetRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    benchmark_symbol: String,
}

impl std::fmt::Debug for IngestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestService")
            .field("benchmark_symbol", &self.benchmark_symbol)
            .finish_non_exhaustive()
    }
}

impl IngestService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider: Arc<dyn EquityDataProvider>,
        symbol_repository: Arc<dyn SymbolRepositoryTrait>,
        quote_repository: Arc<dyn QuoteRepositoryTrait>,
        dividend_repository: Arc<dyn DividendRepositoryTrait>,
        balance_sheet_repository: Arc<dyn BalanceSheetRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        benchmark_symbol: String,
    ) -> Self {
        Self {
            provider,
            symbol_repository,
            quote_repository,
            dividend_repository,
            balance_sheet_repository,
            portfolio_repository,
            holding_repository,
            benchmark_symbol,
        }
    }

    /// Refresh the security reference list: every common stock listing
    /// plus the benchmark, merged with company reference data and inserted
    /// when not already stored. Listings without company data are left for
    /// a later run.
    pub async fn sync_symbols(&self) -> Result<usize> {
        let listings = self.provider.fetch_symbols().await?;

        let known: HashSet<String> = self
            .symbol_repository
            .get_all()?
            .into_iter()
            .map(|profile| profile.symbol)
            .collect();

        let candidates: Vec<SymbolListing> = listings
            .into_iter()
            .filter(|listing| {
                listing.security_type == COMMON_STOCK_TYPE
                    || listing.symbol == self.benchmark_symbol
            })
            .filter(|listing| !known.contains(&listing.symbol))
            // '#' would be read as a URL fragment on the follow-up requests
            .filter(|listing| !listing.symbol.contains('#'))
            .collect();

        let mut profiles = Vec::new();
        for chunk in candidates.chunks(BATCH_SIZE) {
            let fetches: Vec<_> = chunk
                .iter()
                .map(|listing| async move {
                    (listing, self.provider.fetch_company(&listing.symbol).await)
                })
                .collect();

            for (listing, fetched) in futures::future::join_all(fetches).await {
                match fetched {
                    Ok(Some(company)) => profiles.push(merge_profile(listing, company)),
                    Ok(None) => debug!("No company reference data for {}", listing.symbol),
                    Err(err) => warn!("Failed to fetch company for {}: {}", listing.symbol, err),
                }
            }
        }

        let inserted = self.symbol_repository.append_symbols(&profiles)?;
        info!(
            "Symbol sync inserted {} of {} new listings",
            inserted,
            profiles.len()
        );
        Ok(inserted)
    }

    /// Pull the latest official quote for every active symbol and insert
    /// the ones dated after the stored latest for that symbol.
    pub async fn sync_quotes(&self) -> Result<usize> {
        let profiles = self.symbol_repository.get_all()?;
        let symbols = active_symbols(&profiles, &self.benchmark_symbol);
        let latest_dates = self.quote_repository.get_latest_dates()?;

        let mut new_quotes = Vec::new();
        let mut failures = 0usize;

        for chunk in symbols.chunks(BATCH_SIZE) {
            let fetches: Vec<_> = chunk
                .iter()
                .map(|symbol| async move {
                    (
                        symbol.as_str(),
                        self.provider.fetch_latest_quote(symbol).await,
                    )
                })
                .collect();

            for (symbol, fetched) in futures::future::join_all(fetches).await {
                match fetched {
                    Ok(Some(quote)) => {
                        if newer_than(&latest_dates, symbol, quote.date) {
                            new_quotes.push(quote_from_latest(quote));
                        } else {
                            debug!("No new quote for {}", symbol);
                        }
                    }
                    Ok(None) => debug!("No official close for {}", symbol),
                    Err(err) => {
                        warn!("Failed to fetch quote for {}: {}", symbol, err);
                        failures += 1;
                    }
                }
            }
        }

        let inserted = self.quote_repository.append_quotes(&new_quotes)?;
        info!(
            "Quote sync inserted {} quotes ({} symbols, {} failed)",
            inserted,
            symbols.len(),
            failures
        );
        Ok(inserted)
    }

    /// Pull recent dividend declarations for every symbol held by any
    /// portfolio and insert the ones going ex after the stored latest
    /// ex-date for that symbol.
    pub async fn sync_dividends(&self, today: NaiveDate) -> Result<usize> {
        let symbols = self.held_symbols(today)?;
        if symbols.is_empty() {
            debug!("No held symbols, skipping dividend sync");
            return Ok(0);
        }

        let latest_ex_dates = self.dividend_repository.get_latest_ex_dates()?;

        let mut new_dividends = Vec::new();
        for chunk in symbols.chunks(BATCH_SIZE) {
            let fetches: Vec<_> = chunk
                .iter()
                .map(|symbol| async move {
                    (
                        symbol.as_str(),
                        self.provider
                            .fetch_dividends(symbol, ChartRange::OneMonth)
                            .await,
                    )
                })
                .collect();

            for (symbol, fetched) in futures::future::join_all(fetches).await {
                match fetched {
                    Ok(records) => {
                        for record in records {
                            if newer_than(&latest_ex_dates, symbol, record.ex_date) {
                                new_dividends.push(declaration_from_record(record));
                            }
                        }
                    }
                    Err(err) => warn!("Failed to fetch dividends for {}: {}", symbol, err),
                }
            }
        }

        let inserted = self.dividend_repository.append_dividends(&new_dividends)?;
        info!(
            "Dividend sync inserted {} declarations for {} held symbols",
            inserted,
            symbols.len()
        );
        Ok(inserted)
    }

    /// Pull the newest quarterly balance sheet for investable symbols
    /// whose stored report has aged past the refresh window.
    pub async fn sync_balance_sheets(&self, today: NaiveDate) -> Result<usize> {
        let profiles = self.symbol_repository.get_all()?;
        let latest_reports = self.balance_sheet_repository.get_latest_report_dates()?;
        let refresh_cutoff = today - Duration::days(BALANCE_SHEET_REFRESH_DAYS);

        let due: Vec<String> = profiles
            .iter()
            .filter(|profile| profile.is_investable())
            .map(|profile| profile.symbol.clone())
            .filter(|symbol| match latest_reports.get(symbol) {
                Some(stored) => *stored <= refresh_cutoff,
                None => true,
            })
            .collect();

        let mut new_sheets = Vec::new();
        for chunk in due.chunks(BATCH_SIZE) {
            let fetches: Vec<_> = chunk
                .iter()
                .map(|symbol| async move {
                    (
                        symbol.as_str(),
                        self.provider.fetch_balance_sheet(symbol).await,
                    )
                })
                .collect();

            for (symbol, fetched) in futures::future::join_all(fetches).await {
                match fetched {
                    Ok(Some(report)) => {
                        if newer_than(&latest_reports, symbol, report.report_date) {
                            new_sheets.push(BalanceSheet {
                                symbol: report.symbol,
                                report_date: report.report_date,
                                shareholder_equity: report.shareholder_equity,
                            });
                        }
                    }
                    Ok(None) => debug!("No balance sheet for {}", symbol),
                    Err(err) => warn!("Failed to fetch balance sheet for {}: {}", symbol, err),
                }
            }
        }

        let inserted = self
            .balance_sheet_repository
            .append_balance_sheets(&new_sheets)?;
        info!(
            "Balance sheet sync inserted {} reports ({} symbols due)",
            inserted,
            due.len()
        );
        Ok(inserted)
    }

    /// Backfill a close-only history series, inserting the days missing
    /// from the store. Used to seed benchmark history.
    pub async fn backfill_history(&self, symbol: &str, range: ChartRange) -> Result<usize> {
        let points = self.provider.fetch_daily_closes(symbol, range).await?;
        let latest_dates = self.quote_repository.get_latest_dates()?;

        let quotes: Vec<Quote> = points
            .into_iter()
            .filter(|point| newer_than(&latest_dates, symbol, point.date))
            .map(|point| Quote {
                symbol: symbol.to_string(),
                date: point.date,
                close: point.close,
                market_cap: None,
                pe_ratio: None,
            })
            .collect();

        let inserted = self.quote_repository.append_quotes(&quotes)?;
        info!(
            "History backfill inserted {} closes for {}",
            inserted, symbol
        );
        Ok(inserted)
    }

    /// Non-cash symbols appearing in any portfolio's holdings history.
    fn held_symbols(&self, today: NaiveDate) -> Result<Vec<String>> {
        let mut symbols = BTreeSet::new();
        for portfolio in self.portfolio_repository.get_portfolios(today)? {
            let holdings = self
                .holding_repository
                .get_holdings_since(&portfolio.id, portfolio.inception_date)?;
            for holding in holdings {
                if holding.symbol != CASH_SYMBOL {
                    symbols.insert(holding.symbol);
                }
            }
        }
        Ok(symbols.into_iter().collect())
    }
}

fn newer_than(latest: &HashMap<String, NaiveDate>, symbol: &str, date: NaiveDate) -> bool {
    latest.get(symbol).map_or(true, |stored| date > *stored)
}

fn merge_profile(listing: &SymbolListing, company: CompanyInfo) -> SymbolProfile {
    SymbolProfile {
        symbol: listing.symbol.clone(),
        name: listing.name.clone(),
        security_name: company.security_name.unwrap_or_default(),
        security_type: listing.security_type.clone(),
        region: listing.region.clone(),
        currency: listing.currency.clone(),
        exchange: listing.exchange.clone(),
        industry: company.industry.unwrap_or_default(),
        enabled: listing.is_enabled,
    }
}

fn quote_from_latest(quote: LatestQuote) -> Quote {
    Quote {
        symbol: quote.symbol,
        date: quote.date,
        close: quote.close,
        market_cap: quote.market_cap,
        pe_ratio: quote.pe_ratio,
    }
}

fn declaration_from_record(record: DividendRecord) -> DividendDeclaration {
    DividendDeclaration {
        symbol: record.symbol,
        ex_date: record.ex_date,
        payment_date: record.payment_date,
        amount: record.amount,
        currency: record.currency,
    }
}
