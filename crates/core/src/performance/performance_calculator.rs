use chrono::{Duration, NaiveDate};
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::constants::CASH_SYMBOL;
use crate::errors::{DataUnavailableError, Result};
use crate::ledger::{Holding, HoldingRepositoryTrait};
use crate::market_data::QuoteRepositoryTrait;
use crate::performance::performance_model::{PerformanceRecord, ValuationSummary};
use crate::performance::performance_traits::PerformanceRepositoryTrait;
use crate::portfolios::PortfolioDefinition;
use crate::transactions::{TransactionKind, TransactionRepositoryTrait};
use crate::utils::time_utils::get_days_between;

/// Values each portfolio daily from holdings and closing prices, producing
/// deposit/withdrawal-adjusted percent returns.
///
/// Days that cannot be valued are skipped without a record: all-cash days,
/// days missing a close for any held symbol, and days with a zero adjusted
/// base. The previous close carries over skipped days unchanged.
pub struct PerformanceCalculator {
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    quote_repository: Arc<dyn QuoteRepositoryTrait>,
    performance_repository: Arc<dyn PerformanceRepositoryTrait>,
}

impl PerformanceCalculator {
    pub fn new(
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        quote_repository: Arc<dyn QuoteRepositoryTrait>,
        performance_repository: Arc<dyn PerformanceRepositoryTrait>,
    ) -> Self {
        Self {
            holding_repository,
            transaction_repository,
            quote_repository,
            performance_repository,
        }
    }

    /// Appends performance records for `portfolio` up to `target_date`,
    /// resuming after the latest stored record.
    pub fn update_portfolio(
        &self,
        portfolio: &PortfolioDefinition,
        target_date: NaiveDate,
    ) -> Result<ValuationSummary> {
        let mut summary = ValuationSummary {
            portfolio_id: portfolio.id.clone(),
            ..Default::default()
        };

        let (start, mut prev_close) = match self
            .performance_repository
            .get_latest_record(&portfolio.id)?
        {
            Some(last) => (last.date + Duration::days(1), last.close_value),
            None => (portfolio.inception_date, Decimal::ZERO),
        };
        if start > target_date {
            debug!(
                "Performance for {} already covers {}",
                portfolio.id, target_date
            );
            return Ok(summary);
        }

        let holdings = self
            .holding_repository
            .get_holdings_since(&portfolio.id, portfolio.inception_date)?;
        if holdings.is_empty() {
            debug!("No holdings for {}, nothing to value", portfolio.id);
            return Ok(summary);
        }

        let mut symbols: Vec<String> = holdings
            .iter()
            .map(|h| h.symbol.clone())
            .filter(|s| s != CASH_SYMBOL)
            .collect();
        symbols.sort();
        symbols.dedup();

        let quotes = self.quote_repository.get_quotes_since(&symbols, start)?;
        if quotes.is_empty() {
            return Err(DataUnavailableError::NoQuotes {
                portfolio_id: portfolio.id.clone(),
                start,
            }
            .into());
        }
        let mut closes_by_date: HashMap<NaiveDate, HashMap<String, Decimal>> = HashMap::new();
        for quote in quotes {
            closes_by_date
                .entry(quote.date)
                .or_default()
                .insert(quote.symbol, quote.close);
        }

        let transactions = self
            .transaction_repository
            .get_for_portfolio_since(&portfolio.id, start)?;

        let mut records = Vec::new();
        for date in get_days_between(start, target_date) {
            let positions = resolve_positions(&holdings, date);
            if !positions.keys().any(|symbol| symbol != CASH_SYMBOL) {
                continue;
            }

            let Some(close_value) = value_positions(&positions, closes_by_date.get(&date)) else {
                debug!(
                    "Skipping {} on {}: missing close for a held symbol",
                    portfolio.id, date
                );
                continue;
            };

            let deposits: Decimal = transactions
                .iter()
                .filter(|t| t.date == date && t.kind == TransactionKind::Deposit)
                .map(|t| t.price * t.volume)
                .sum();
            let withdrawals: Decimal = transactions
                .iter()
                .filter(|t| t.date == date && t.kind == TransactionKind::Withdrawal)
                .map(|t| t.price * t.volume)
                .sum();

            let adj_prev_close_value = prev_close + deposits;
            let adj_close_value = close_value + withdrawals;
            // Nothing deposited and nothing valued yet; a return is undefined.
            if adj_prev_close_value.is_zero() {
                continue;
            }

            records.push(PerformanceRecord {
                portfolio_id: portfolio.id.clone(),
                date,
                close_value,
                prev_close_value: prev_close,
                adj_prev_close_value,
                adj_close_value,
                percent_return: dec!(100) * (adj_close_value - adj_prev_close_value)
                    / adj_prev_close_value,
            });
            prev_close = close_value;
        }

        if !records.is_empty() {
            summary.records_appended = self.performance_repository.append_records(&records)?;
            summary.last_valued_date = records.last().map(|r| r.date);
            info!(
                "Valued {}: {} performance records through {}",
                portfolio.id,
                summary.records_appended,
                summary.last_valued_date.unwrap_or(target_date)
            );
        }
        Ok(summary)
    }
}

/// The latest row per symbol with `as_of` <= `date`, dropping quantity 0.
fn resolve_positions(holdings: &[Holding], date: NaiveDate) -> BTreeMap<String, Decimal> {
    let mut latest: BTreeMap<String, &Holding> = BTreeMap::new();
    for row in holdings.iter().filter(|h| h.as_of <= date) {
        match latest.get(&row.symbol) {
            Some(current) if current.as_of >= row.as_of => {}
            _ => {
                latest.insert(row.symbol.clone(), row);
            }
        }
    }
    latest
        .into_iter()
        .filter(|(_, row)| !row.quantity.is_zero())
        .map(|(symbol, row)| (symbol, row.quantity))
        .collect()
}

/// Cash plus quantity x close over the non-cash positions, or None if any
/// close is missing.
fn value_positions(
    positions: &BTreeMap<String, Decimal>,
    closes: Option<&HashMap<String, Decimal>>,
) -> Option<Decimal> {
    let mut close_value = Decimal::ZERO;
    for (symbol, quantity) in positions {
        if symbol == CASH_SYMBOL {
            close_value += quantity;
        } else {
            close_value += quantity * closes?.get(symbol)?;
        }
    }
    Some(close_value)
}
