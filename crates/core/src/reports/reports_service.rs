use chrono::{Duration, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::QUOTE_LOOKBACK_DAYS;
use crate::errors::{DataUnavailableError, Result};
use crate::market_data::QuoteRepositoryTrait;
use crate::performance::{chain_returns, PerformanceRepositoryTrait};
use crate::portfolios::PortfolioRepositoryTrait;
use crate::reports::reports_model::{PerformancePoint, PerformanceReport};
use crate::universe::{RankedStock, StockListRepositoryTrait};

/// Builds the JSON export payloads.
///
/// The performance series compounds each portfolio's daily returns into a
/// cumulative curve and joins it with the benchmark's, so both plot from a
/// shared zero point the trading day before inception.
pub struct ReportService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    performance_repository: Arc<dyn PerformanceRepositoryTrait>,
    quote_repository: Arc<dyn QuoteRepositoryTrait>,
    stock_list_repository: Arc<dyn StockListRepositoryTrait>,
    benchmark_symbol: String,
}

impl ReportService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        performance_repository: Arc<dyn PerformanceRepositoryTrait>,
        quote_repository: Arc<dyn QuoteRepositoryTrait>,
        stock_list_repository: Arc<dyn StockListRepositoryTrait>,
        benchmark_symbol: &str,
    ) -> Self {
        Self {
            portfolio_repository,
            performance_repository,
            quote_repository,
            stock_list_repository,
            benchmark_symbol: benchmark_symbol.to_string(),
        }
    }

    /// The cumulative return series of one portfolio up to `as_of`, joined
    /// with the benchmark on date. Days only one side covers are dropped;
    /// compounding still spans them.
    pub fn performance_report(
        &self,
        portfolio_id: &str,
        as_of: NaiveDate,
    ) -> Result<PerformanceReport> {
        let portfolio = self
            .portfolio_repository
            .get_portfolio(portfolio_id)?
            .ok_or_else(|| DataUnavailableError::PortfolioNotFound(portfolio_id.to_string()))?;

        let benchmark = self.benchmark_series(portfolio.inception_date, as_of)?;

        let mut records = self
            .performance_repository
            .get_records_since(portfolio_id, portfolio.inception_date)?;
        records.retain(|record| record.date <= as_of);

        let percents: Vec<Decimal> = records.iter().map(|r| r.percent_return).collect();
        let chained = chain_returns(&percents);

        // The portfolio curve opens at zero on the benchmark's first date,
        // unless a record already sits on that date.
        let mut portfolio_points: Vec<(NaiveDate, Decimal)> =
            Vec::with_capacity(records.len() + 1);
        if let Some((baseline, _)) = benchmark.first() {
            if records.first().map_or(true, |r| r.date > *baseline) {
                portfolio_points.push((*baseline, Decimal::ZERO));
            }
        }
        portfolio_points.extend(records.iter().zip(chained).map(|(r, c)| (r.date, c)));

        let benchmark_by_date: HashMap<NaiveDate, Decimal> = benchmark.into_iter().collect();
        let series: Vec<PerformancePoint> = portfolio_points
            .into_iter()
            .filter_map(|(date, portfolio_return)| {
                benchmark_by_date
                    .get(&date)
                    .map(|benchmark_return| PerformancePoint {
                        date,
                        portfolio_return,
                        benchmark_return: *benchmark_return,
                    })
            })
            .collect();

        debug!(
            "Performance report for {} has {} points",
            portfolio_id,
            series.len()
        );
        Ok(PerformanceReport {
            portfolio_id: portfolio_id.to_string(),
            benchmark_symbol: self.benchmark_symbol.clone(),
            series,
        })
    }

    /// The newest stored ranked list as of `as_of`, in rank order.
    pub fn stock_list_report(&self, as_of: NaiveDate) -> Result<Vec<RankedStock>> {
        let rows = self.stock_list_repository.get_latest_stock_list(as_of)?;
        if rows.is_empty() {
            return Err(DataUnavailableError::NoStockList(as_of).into());
        }
        debug!("Stock list report as of {} has {} entries", as_of, rows.len());
        Ok(rows)
    }

    /// Benchmark closes from just before `inception` through `as_of`,
    /// rebased as cumulative percent returns against the first close.
    fn benchmark_series(
        &self,
        inception: NaiveDate,
        as_of: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Decimal)>> {
        let window_start = inception - Duration::days(QUOTE_LOOKBACK_DAYS);
        let mut quotes = self
            .quote_repository
            .get_quotes_since(&[self.benchmark_symbol.clone()], window_start)?;
        quotes.retain(|q| q.date <= as_of && !q.close.is_zero());
        if quotes.is_empty() {
            return Err(DataUnavailableError::NoClose {
                symbol: self.benchmark_symbol.clone(),
                date: inception,
            }
            .into());
        }

        // One close before inception anchors the zero point; when history
        // starts at inception the first close anchors it instead.
        let baseline = match quotes.iter().position(|q| q.date >= inception) {
            Some(index) => index.saturating_sub(1),
            None => quotes.len() - 1,
        };
        let baseline_close = quotes[baseline].close;
        Ok(quotes[baseline..]
            .iter()
            .map(|q| (q.date, dec!(100) * (q.close / baseline_close - Decimal::ONE)))
            .collect())
    }
}
