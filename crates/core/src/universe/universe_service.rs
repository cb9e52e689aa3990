use chrono::{Duration, NaiveDate};
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::constants::{QUOTE_MAX_AGE_DAYS, STOCK_LIST_RETENTION_DAYS};
use crate::errors::Result;
use crate::market_data::{
    active_symbols, BalanceSheetRepositoryTrait, QuoteRepositoryTrait, SymbolRepositoryTrait,
};
use crate::universe::universe_model::{RankedStock, CENSUS_THRESHOLDS};
use crate::universe::universe_traits::StockListRepositoryTrait;

/// Ranks the investable universe by price-to-earnings over return-on-equity.
///
/// A symbol enters the ranking only with a balance sheet no older than six
/// months and a quote no older than a week; the fundamentals are derived
/// from close, P/E and market cap rather than taken from the provider:
///
/// eps = close / pe, shares = mcap / close, net_income = shares x eps,
/// roe = net_income / equity, and the sort key is pe / roe ascending.
pub struct UniverseRanker {
    symbol_repository: Arc<dyn SymbolRepositoryTrait>,
    quote_repository: Arc<dyn QuoteRepositoryTrait>,
    balance_sheet_repository: Arc<dyn BalanceSheetRepositoryTrait>,
    stock_list_repository: Arc<dyn StockListRepositoryTrait>,
    benchmark_symbol: String,
}

impl UniverseRanker {
    pub fn new(
        symbol_repository: Arc<dyn SymbolRepositoryTrait>,
        quote_repository: Arc<dyn QuoteRepositoryTrait>,
        balance_sheet_repository: Arc<dyn BalanceSheetRepositoryTrait>,
        stock_list_repository: Arc<dyn StockListRepositoryTrait>,
        benchmark_symbol: &str,
    ) -> Self {
        Self {
            symbol_repository,
            quote_repository,
            balance_sheet_repository,
            stock_list_repository,
            benchmark_symbol: benchmark_symbol.to_string(),
        }
    }

    /// Computes the ranked list as of `as_of`. Symbols with incomplete or
    /// non-positive inputs are dropped, not zero-filled.
    pub fn rank(&self, as_of: NaiveDate) -> Result<Vec<RankedStock>> {
        let profiles = self.symbol_repository.get_all()?;
        let symbols = active_symbols(&profiles, &self.benchmark_symbol);
        debug!("Ranking universe of {} symbols as of {}", symbols.len(), as_of);

        let sheets = self.balance_sheet_repository.get_latest_reports(&symbols, as_of)?;
        let quotes = self.quote_repository.get_latest_quotes(&symbols, as_of)?;
        let oldest_quote = as_of - Duration::days(QUOTE_MAX_AGE_DAYS);

        let mut rows: Vec<RankedStock> = Vec::new();
        for sheet in sheets {
            let Some(equity) = sheet.shareholder_equity else {
                continue;
            };
            let Some(quote) = quotes.get(&sheet.symbol) else {
                continue;
            };
            if quote.date < oldest_quote {
                continue;
            }
            let (Some(market_cap), Some(pe_ratio)) = (quote.market_cap, quote.pe_ratio) else {
                continue;
            };
            if pe_ratio <= Decimal::ZERO || quote.close.is_zero() || equity.is_zero() {
                continue;
            }
            let eps = quote.close / pe_ratio;
            let shares_outstanding = market_cap / quote.close;
            let net_income = shares_outstanding * eps;
            let return_on_equity = net_income / equity;
            if return_on_equity <= Decimal::ZERO {
                continue;
            }
            rows.push(RankedStock {
                symbol: sheet.symbol,
                date: quote.date,
                rank: 0,
                close: quote.close,
                market_cap,
                pe_ratio,
                eps,
                shares_outstanding,
                net_income,
                shareholder_equity: equity,
                return_on_equity,
                pe_roe_ratio: pe_ratio / return_on_equity,
                report_date: sheet.report_date,
            });
        }

        rows.sort_by(|a, b| a.pe_roe_ratio.cmp(&b.pe_roe_ratio));
        // Stamp the whole list with the newest quote date among its rows so
        // a rerun on a market holiday resolves to the same list.
        if let Some(list_date) = rows.iter().map(|r| r.date).max() {
            for (idx, row) in rows.iter_mut().enumerate() {
                row.rank = (idx + 1) as i32;
                row.date = list_date;
            }
        }
        info!("Ranked {} stocks as of {}", rows.len(), as_of);
        Ok(rows)
    }

    /// Persists `ranked` unless a list for its date is already stored, and
    /// prunes lists past the retention window. Returns the rows written.
    pub fn store_ranking(&self, ranked: &[RankedStock], today: NaiveDate) -> Result<usize> {
        let cutoff = today - Duration::days(STOCK_LIST_RETENTION_DAYS);
        let pruned = self.stock_list_repository.delete_before(cutoff)?;
        if pruned > 0 {
            debug!("Pruned {} stock list rows older than {}", pruned, cutoff);
        }

        let Some(first) = ranked.first() else {
            return Ok(0);
        };
        if !self.stock_list_repository.get_stock_list_on(first.date)?.is_empty() {
            debug!("Stock list for {} already stored", first.date);
            return Ok(0);
        }
        let written = self.stock_list_repository.append_stock_list(ranked)?;
        info!("Stored stock list for {} ({} rows)", first.date, written);
        Ok(written)
    }

    /// Counts ranked stocks strictly above each census market-cap floor.
    pub fn census(ranked: &[RankedStock]) -> Vec<(&'static str, usize)> {
        CENSUS_THRESHOLDS
            .iter()
            .map(|(label, floor)| {
                let floor = Decimal::from(*floor);
                (*label, ranked.iter().filter(|r| r.market_cap > floor).count())
            })
            .collect()
    }
}
