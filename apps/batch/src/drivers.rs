//! The batch commands themselves.
//!
//! Every multi-portfolio loop classifies failures the same way: missing
//! data skips the portfolio with a warning, a ledger violation skips it
//! with an error, and anything else (storage, provider plumbing) aborts
//! the whole run.

use std::path::Path;

use anyhow::bail;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{error, info, warn};

use paperfolio_core::portfolios::{PortfolioDefinition, INITIAL_DEPOSIT};
use paperfolio_core::universe::UniverseRanker;
use paperfolio_core::utils::time_utils::today;
use paperfolio_core::Error;
use paperfolio_market_data::ChartRange;

use crate::config::Config;
use crate::context::AppContext;

/// End-of-day run: ingest the new market data, bring every portfolio's
/// holdings and performance up to `date`, refresh the ranked universe and
/// write the JSON exports.
pub async fn run_daily(
    context: &AppContext,
    config: &Config,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let ingest = context.ingest(config)?;
    let quotes = ingest.sync_quotes().await?;
    let dividends = ingest.sync_dividends(date).await?;
    info!(
        "Ingested {} quotes and {} dividend declarations",
        quotes, dividends
    );

    let projected = for_each_portfolio(context, date, "Projection", |p| {
        context.projector.project_portfolio(p, date).map(|_| ())
    })?;
    let valued = for_each_portfolio(context, date, "Valuation", |p| {
        context.calculator.update_portfolio(p, date).map(|_| ())
    })?;
    info!("Projected {} and valued {} portfolios", projected, valued);

    let ranked = context.ranker.rank(date)?;
    context.ranker.store_ranking(&ranked, date)?;
    for (label, count) in UniverseRanker::census(&ranked) {
        info!("Universe census {}: {}", label, count);
    }

    export_reports(context, config, date)
}

/// Reference data refresh: the symbol universe and quarterly balance
/// sheets move slowly, so this runs on a monthly schedule.
pub async fn run_monthly(context: &AppContext, config: &Config) -> anyhow::Result<()> {
    let ingest = context.ingest(config)?;
    let symbols = ingest.sync_symbols().await?;
    let sheets = ingest.sync_balance_sheets(today()).await?;
    info!(
        "Ingested {} new symbols and {} balance sheets",
        symbols, sheets
    );
    Ok(())
}

/// One-time setup: benchmark history, the standard portfolio grid, and
/// the inception deposit plus initial purchases for each portfolio.
///
/// The deposit and the buys are recorded against the inception date and
/// left for the next daily run to replay into holdings. Portfolios that
/// already have transactions are left untouched, so a rerun cannot
/// double-fund.
pub async fn run_bootstrap(
    context: &AppContext,
    config: &Config,
    inception: NaiveDate,
) -> anyhow::Result<()> {
    let ingest = context.ingest(config)?;
    let backfilled = ingest
        .backfill_history(&config.benchmark_symbol, ChartRange::FiveYears)
        .await?;
    info!(
        "Backfilled {} {} closes",
        backfilled, config.benchmark_symbol
    );

    context.admin.seed_standard_portfolios(inception)?;

    let ranked = context.ranker.rank(inception - Duration::days(1))?;
    let funded = for_each_portfolio(context, inception, "Bootstrap", |p| {
        let existing = context
            .transaction_repository
            .get_for_portfolio_since(&p.id, p.inception_date)?;
        if !existing.is_empty() {
            info!(
                "{} already has {} transactions, leaving it as is",
                p.id,
                existing.len()
            );
            return Ok(());
        }
        context.admin.fund_portfolio(p, inception, INITIAL_DEPOSIT)?;
        context.admin.buy_universe(p, inception, &ranked)?;
        Ok(())
    })?;
    info!(
        "Bootstrap done for {} portfolios; the next daily run materializes holdings",
        funded
    );
    Ok(())
}

/// Liquidates every position across all portfolios on `date`.
pub fn run_sell_all(context: &AppContext, date: NaiveDate) -> anyhow::Result<()> {
    let sold = for_each_portfolio(context, date, "Liquidation", |p| {
        context.admin.sell_all(p, date).map(|_| ())
    })?;
    info!("Liquidated {} portfolios on {}", sold, date);
    Ok(())
}

/// Buys the ranked universe across all portfolios on `date`, priced off
/// the prior day's ranking. Sale proceeds must already be projected into
/// holdings, so this runs after a liquidation day has gone through a
/// daily run.
pub fn run_buy_all(context: &AppContext, date: NaiveDate) -> anyhow::Result<()> {
    let ranked = context.ranker.rank(date - Duration::days(1))?;
    let bought = for_each_portfolio(context, date, "Purchase", |p| {
        context.admin.buy_universe(p, date, &ranked).map(|_| ())
    })?;
    info!("Bought the universe for {} portfolios on {}", bought, date);
    Ok(())
}

/// Writes `performance_<portfolio_id>.json` per portfolio plus
/// `stock_list.json` under the configured report directory.
pub fn export_reports(
    context: &AppContext,
    config: &Config,
    date: NaiveDate,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.report_dir)?;

    let mut exported = 0;
    for portfolio in context.portfolio_repository.get_portfolios(date)? {
        match context.reports.performance_report(&portfolio.id, date) {
            Ok(report) => {
                let path = config
                    .report_dir
                    .join(format!("performance_{}.json", portfolio.id));
                write_json(&path, &report)?;
                exported += 1;
            }
            Err(err) if err.is_portfolio_scoped() => {
                warn!("Performance report skipped for {}: {}", portfolio.id, err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    match context.reports.stock_list_report(date) {
        Ok(rows) => {
            write_json(&config.report_dir.join("stock_list.json"), &rows)?;
            exported += 1;
        }
        Err(err) if err.is_portfolio_scoped() => warn!("Stock list report skipped: {}", err),
        Err(err) => return Err(err.into()),
    }

    info!(
        "Exported {} report files to {}",
        exported,
        config.report_dir.display()
    );
    Ok(())
}

/// Drops quote rows whose (symbol, date) is stored more than once.
pub fn run_dedupe_quotes(context: &AppContext) -> anyhow::Result<()> {
    let removed = context.quote_repository.delete_duplicates()?;
    info!("Removed {} duplicate quote rows", removed);
    Ok(())
}

/// Drops balance sheet rows whose (symbol, report date) is stored more
/// than once.
pub fn run_dedupe_balance_sheets(context: &AppContext) -> anyhow::Result<()> {
    let removed = context.balance_sheet_repository.delete_duplicates()?;
    info!("Removed {} duplicate balance sheet rows", removed);
    Ok(())
}

/// Deletes dividend transactions dated on or after `since`, together with
/// every holding row from `since` forward so the next daily run replays
/// the affected span from scratch.
pub fn run_reset_dividends(
    context: &AppContext,
    portfolio_id: Option<&str>,
    since: NaiveDate,
) -> anyhow::Result<()> {
    for id in resolve_portfolio_ids(context, portfolio_id)? {
        let transactions = context
            .transaction_repository
            .delete_dividends_since(&id, since)?;
        let holdings = context.holding_repository.delete_since(&id, since)?;
        info!(
            "Reset {}: removed {} dividend transactions and {} holding rows since {}",
            id, transactions, holdings, since
        );
    }
    Ok(())
}

/// Deletes performance rows dated on or after `since`; the next daily run
/// revalues the span.
pub fn run_reset_performance(
    context: &AppContext,
    portfolio_id: Option<&str>,
    since: NaiveDate,
) -> anyhow::Result<()> {
    for id in resolve_portfolio_ids(context, portfolio_id)? {
        let removed = context.performance_repository.delete_since(&id, since)?;
        info!(
            "Reset {}: removed {} performance rows since {}",
            id, removed, since
        );
    }
    Ok(())
}

fn resolve_portfolio_ids(
    context: &AppContext,
    portfolio_id: Option<&str>,
) -> anyhow::Result<Vec<String>> {
    match portfolio_id {
        Some(id) => {
            if context.portfolio_repository.get_portfolio(id)?.is_none() {
                bail!("unknown portfolio: {}", id);
            }
            Ok(vec![id.to_string()])
        }
        None => Ok(context
            .portfolio_repository
            .get_portfolios(today())?
            .into_iter()
            .map(|p| p.id)
            .collect()),
    }
}

/// Runs `op` over every portfolio active on `date` and returns how many
/// completed. Portfolio-scoped errors are logged and skipped; everything
/// else aborts the run.
fn for_each_portfolio<F>(
    context: &AppContext,
    date: NaiveDate,
    action: &str,
    mut op: F,
) -> anyhow::Result<usize>
where
    F: FnMut(&PortfolioDefinition) -> Result<(), Error>,
{
    let portfolios = context.portfolio_repository.get_portfolios(date)?;
    let mut completed = 0;
    for portfolio in &portfolios {
        match op(portfolio) {
            Ok(()) => completed += 1,
            Err(err @ Error::DataUnavailable(_)) => {
                warn!("{} skipped for {}: {}", action, portfolio.id, err);
            }
            Err(err) if err.is_portfolio_scoped() => {
                error!("{} failed for {}: {}", action, portfolio.id, err);
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(completed)
}

fn write_json<T: Serialize>(path: &Path, payload: &T) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), payload)?;
    Ok(())
}
