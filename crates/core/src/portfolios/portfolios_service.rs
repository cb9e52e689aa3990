use chrono::{Duration, NaiveDate};
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::constants::CASH_SYMBOL;
use crate::errors::{DataUnavailableError, LedgerError, Result};
use crate::ledger::HoldingRepositoryTrait;
use crate::market_data::QuoteRepositoryTrait;
use crate::portfolios::portfolios_model::{standard_grid, PortfolioDefinition};
use crate::portfolios::portfolios_traits::PortfolioRepositoryTrait;
use crate::transactions::{
    NewTransaction, Transaction, TransactionKind, TransactionRepositoryTrait,
};
use crate::universe::RankedStock;

/// Creates portfolios and turns admin decisions into ledger transactions.
///
/// Buys and sells are priced at the ranked list's close or the latest close
/// on or before the prior day; the admin never looks at intraday prices and
/// never writes holdings directly.
pub struct PortfolioAdmin {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    quote_repository: Arc<dyn QuoteRepositoryTrait>,
}

impl PortfolioAdmin {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        quote_repository: Arc<dyn QuoteRepositoryTrait>,
    ) -> Self {
        Self {
            portfolio_repository,
            transaction_repository,
            holding_repository,
            quote_repository,
        }
    }

    /// Creates the standard simulation grid. Definitions already stored are
    /// left untouched; returns the number created.
    pub fn seed_standard_portfolios(&self, inception: NaiveDate) -> Result<usize> {
        let definitions = standard_grid(inception);
        let created = self.portfolio_repository.append_portfolios(&definitions)?;
        info!(
            "Seeded {} of {} standard portfolios",
            created,
            definitions.len()
        );
        Ok(created)
    }

    /// Deposits `amount` of cash into the portfolio on `date`.
    pub fn fund_portfolio(
        &self,
        portfolio: &PortfolioDefinition,
        date: NaiveDate,
        amount: Decimal,
    ) -> Result<Transaction> {
        let deposit = self
            .transaction_repository
            .append(NewTransaction::deposit(&portfolio.id, date, amount))?;
        info!("Funded {} with {} on {}", portfolio.id, amount, date);
        Ok(deposit)
    }

    /// Buys the top ranked stocks above the portfolio's market-cap floor,
    /// splitting the current cash position evenly across `stock_count`
    /// slots. Prices come from the ranked list itself.
    pub fn buy_universe(
        &self,
        portfolio: &PortfolioDefinition,
        date: NaiveDate,
        ranked: &[RankedStock],
    ) -> Result<usize> {
        let picks: Vec<&RankedStock> = ranked
            .iter()
            .filter(|r| r.market_cap > portfolio.min_market_cap)
            .take(portfolio.stock_count as usize)
            .collect();
        if picks.len() < portfolio.stock_count as usize {
            return Err(DataUnavailableError::StockListTooShort {
                date: ranked.first().map(|r| r.date).unwrap_or(date),
                available: picks.len(),
                needed: portfolio.stock_count as usize,
            }
            .into());
        }

        let cash = self.cash_position(portfolio, date)?;
        let cash_per_stock = cash / Decimal::from(portfolio.stock_count);
        let orders: Vec<NewTransaction> = picks
            .iter()
            .map(|pick| {
                // Whole shares only; a slot can round to zero on a pricey stock.
                let volume = (cash_per_stock / pick.close).round();
                NewTransaction::buy(&portfolio.id, &pick.symbol, date, pick.close, volume)
            })
            .collect();
        let written = self.transaction_repository.append_many(&orders)?;
        info!(
            "Bought {} positions for {} on {} ({} cash per slot)",
            written, portfolio.id, date, cash_per_stock
        );
        Ok(written)
    }

    /// Liquidates every non-cash position at the latest close on or before
    /// the prior day. A missing close aborts the whole batch for this
    /// portfolio before any sell is written.
    pub fn sell_all(&self, portfolio: &PortfolioDefinition, date: NaiveDate) -> Result<usize> {
        let day_before = date - Duration::days(1);
        let holdings = self
            .holding_repository
            .get_latest_holdings(&portfolio.id, date)?;
        // Fully sold positions linger as zero-quantity rows; skip them.
        let positions: Vec<_> = holdings
            .iter()
            .filter(|h| h.symbol != CASH_SYMBOL && !h.quantity.is_zero())
            .collect();
        if positions.is_empty() {
            debug!("{} holds no stock positions on {}", portfolio.id, date);
            return Ok(0);
        }

        let symbols: Vec<String> = positions.iter().map(|h| h.symbol.clone()).collect();
        let quotes = self.quote_repository.get_latest_quotes(&symbols, day_before)?;
        let mut orders = Vec::with_capacity(positions.len());
        for holding in positions {
            let quote =
                quotes
                    .get(&holding.symbol)
                    .ok_or_else(|| DataUnavailableError::NoClose {
                        symbol: holding.symbol.clone(),
                        date: day_before,
                    })?;
            orders.push(NewTransaction::sell(
                &portfolio.id,
                &holding.symbol,
                date,
                quote.close,
                holding.quantity,
            ));
        }
        let written = self.transaction_repository.append_many(&orders)?;
        info!("Sold {} positions for {} on {}", written, portfolio.id, date);
        Ok(written)
    }

    /// Cash available on `date`: the cash leg of the latest holdings, or,
    /// before the first projection has materialized any holdings, the sum
    /// of deposits recorded up to `date`.
    fn cash_position(&self, portfolio: &PortfolioDefinition, date: NaiveDate) -> Result<Decimal> {
        let holdings = self
            .holding_repository
            .get_latest_holdings(&portfolio.id, date)?;
        if holdings.is_empty() {
            let deposited: Decimal = self
                .transaction_repository
                .get_for_portfolio_since(&portfolio.id, portfolio.inception_date)?
                .iter()
                .filter(|t| t.kind == TransactionKind::Deposit && t.date <= date)
                .map(|t| t.volume)
                .sum();
            if deposited > Decimal::ZERO {
                return Ok(deposited);
            }
            return Err(LedgerError::MissingCashPosition(portfolio.id.clone()).into());
        }
        let cash = holdings
            .iter()
            .find(|h| h.symbol == CASH_SYMBOL)
            .map(|h| h.quantity)
            .ok_or_else(|| LedgerError::MissingCashPosition(portfolio.id.clone()))?;
        Ok(cash)
    }
}
