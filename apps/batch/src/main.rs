//! Batch entrypoint: scheduled ingest, projection, valuation and exports.

mod config;
mod context;
mod drivers;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use paperfolio_core::portfolios::STANDARD_INCEPTION;
use paperfolio_core::utils::time_utils::today;

use crate::config::Config;
use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "paperfolio-batch", about = "Model portfolio batch runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// End-of-day run: ingest, project, value, rank and export
    Daily {
        /// Valuation date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Reference data refresh: symbols and balance sheets
    Monthly,
    /// Seed the standard portfolio grid and record the initial purchases
    Bootstrap {
        /// Inception date (YYYY-MM-DD)
        #[arg(long, default_value = STANDARD_INCEPTION)]
        inception: NaiveDate,
    },
    /// Liquidate every position across all portfolios
    SellAll {
        /// Transaction date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Buy the ranked universe across all portfolios
    BuyAll {
        /// Transaction date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Data repair utilities
    Maintain {
        #[command(subcommand)]
        task: MaintainTask,
    },
    /// Write the JSON exports without touching market data
    Report {
        /// Report date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum MaintainTask {
    /// Drop duplicated (symbol, date) quote rows, keeping the first
    DedupeQuotes,
    /// Drop duplicated (symbol, report date) balance sheet rows, keeping the first
    DedupeBalanceSheets,
    /// Delete dividend transactions and holdings from a date forward
    ResetDividends {
        /// First date to delete (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Limit the reset to one portfolio
        #[arg(long)]
        portfolio: Option<String>,
    },
    /// Delete performance rows from a date forward
    ResetPerformance {
        /// First date to delete (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Limit the reset to one portfolio
        #[arg(long)]
        portfolio: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env();
    tracing::debug!("Running with {:?}", config);
    let context = AppContext::build(&config)?;

    match cli.command {
        Commands::Daily { date } => {
            drivers::run_daily(&context, &config, date.unwrap_or_else(today)).await
        }
        Commands::Monthly => drivers::run_monthly(&context, &config).await,
        Commands::Bootstrap { inception } => {
            drivers::run_bootstrap(&context, &config, inception).await
        }
        Commands::SellAll { date } => drivers::run_sell_all(&context, date),
        Commands::BuyAll { date } => drivers::run_buy_all(&context, date),
        Commands::Maintain { task } => match task {
            MaintainTask::DedupeQuotes => drivers::run_dedupe_quotes(&context),
            MaintainTask::DedupeBalanceSheets => drivers::run_dedupe_balance_sheets(&context),
            MaintainTask::ResetDividends { date, portfolio } => {
                drivers::run_reset_dividends(&context, portfolio.as_deref(), date)
            }
            MaintainTask::ResetPerformance { date, portfolio } => {
                drivers::run_reset_performance(&context, portfolio.as_deref(), date)
            }
        },
        Commands::Report { date } => {
            drivers::export_reports(&context, &config, date.unwrap_or_else(today))
        }
    }
}
