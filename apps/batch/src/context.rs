//! Dependency wiring: one pool, one set of repositories, one service each.

use std::sync::Arc;

use anyhow::Context as _;
use tracing::info;

use paperfolio_core::ingest::IngestService;
use paperfolio_core::ledger::{HoldingRepositoryTrait, HoldingsProjector};
use paperfolio_core::market_data::{
    BalanceSheetRepositoryTrait, DividendRepositoryTrait, QuoteRepositoryTrait,
    SymbolRepositoryTrait,
};
use paperfolio_core::performance::{PerformanceCalculator, PerformanceRepositoryTrait};
use paperfolio_core::portfolios::{PortfolioAdmin, PortfolioRepositoryTrait};
use paperfolio_core::reports::ReportService;
use paperfolio_core::transactions::TransactionRepositoryTrait;
use paperfolio_core::universe::{StockListRepositoryTrait, UniverseRanker};
use paperfolio_market_data::{EquityDataProvider, IexProvider};
use paperfolio_storage_sqlite::db;
use paperfolio_storage_sqlite::{
    BalanceSheetRepository, DividendRepository, HoldingRepository, PerformanceRepository,
    PortfolioRepository, QuoteRepository, StockListRepository, SymbolRepository,
    TransactionRepository,
};

use crate::config::Config;

/// Everything a batch command can touch, built once per process.
pub struct AppContext {
    pub symbol_repository: Arc<dyn SymbolRepositoryTrait>,
    pub quote_repository: Arc<dyn QuoteRepositoryTrait>,
    pub dividend_repository: Arc<dyn DividendRepositoryTrait>,
    pub balance_sheet_repository: Arc<dyn BalanceSheetRepositoryTrait>,
    pub portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    pub transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    pub holding_repository: Arc<dyn HoldingRepositoryTrait>,
    pub performance_repository: Arc<dyn PerformanceRepositoryTrait>,
    pub projector: HoldingsProjector,
    pub calculator: PerformanceCalculator,
    pub ranker: UniverseRanker,
    pub admin: PortfolioAdmin,
    pub reports: ReportService,
}

impl AppContext {
    /// Opens the database, applies pending migrations and wires every
    /// repository and service over the shared pool.
    pub fn build(config: &Config) -> anyhow::Result<Self> {
        db::init(&config.db_path)?;
        let pool = db::create_pool(&config.db_path)?;
        db::run_migrations(&pool)?;
        info!("Database ready at {}", config.db_path);

        let symbol_repository: Arc<dyn SymbolRepositoryTrait> =
            Arc::new(SymbolRepository::new(pool.clone()));
        let quote_repository: Arc<dyn QuoteRepositoryTrait> =
            Arc::new(QuoteRepository::new(pool.clone()));
        let dividend_repository: Arc<dyn DividendRepositoryTrait> =
            Arc::new(DividendRepository::new(pool.clone()));
        let balance_sheet_repository: Arc<dyn BalanceSheetRepositoryTrait> =
            Arc::new(BalanceSheetRepository::new(pool.clone()));
        let portfolio_repository: Arc<dyn PortfolioRepositoryTrait> =
            Arc::new(PortfolioRepository::new(pool.clone()));
        let transaction_repository: Arc<dyn TransactionRepositoryTrait> =
            Arc::new(TransactionRepository::new(pool.clone()));
        let holding_repository: Arc<dyn HoldingRepositoryTrait> =
            Arc::new(HoldingRepository::new(pool.clone()));
        let performance_repository: Arc<dyn PerformanceRepositoryTrait> =
            Arc::new(PerformanceRepository::new(pool.clone()));
        let stock_list_repository: Arc<dyn StockListRepositoryTrait> =
            Arc::new(StockListRepository::new(pool.clone()));

        let projector = HoldingsProjector::new(
            transaction_repository.clone(),
            holding_repository.clone(),
            dividend_repository.clone(),
        );
        let calculator = PerformanceCalculator::new(
            holding_repository.clone(),
            transaction_repository.clone(),
            quote_repository.clone(),
            performance_repository.clone(),
        );
        let ranker = UniverseRanker::new(
            symbol_repository.clone(),
            quote_repository.clone(),
            balance_sheet_repository.clone(),
            stock_list_repository.clone(),
            &config.benchmark_symbol,
        );
        let admin = PortfolioAdmin::new(
            portfolio_repository.clone(),
            transaction_repository.clone(),
            holding_repository.clone(),
            quote_repository.clone(),
        );
        let reports = ReportService::new(
            portfolio_repository.clone(),
            performance_repository.clone(),
            quote_repository.clone(),
            stock_list_repository,
            &config.benchmark_symbol,
        );

        Ok(AppContext {
            symbol_repository,
            quote_repository,
            dividend_repository,
            balance_sheet_repository,
            portfolio_repository,
            transaction_repository,
            holding_repository,
            performance_repository,
            projector,
            calculator,
            ranker,
            admin,
            reports,
        })
    }

    /// The ingest service talks to the provider, so it is only built for
    /// commands that need one, and only with a token configured.
    pub fn ingest(&self, config: &Config) -> anyhow::Result<IngestService> {
        let token = config
            .provider_token
            .clone()
            .context("PROVIDER_TOKEN is not set")?;
        let provider: Arc<dyn EquityDataProvider> = match &config.provider_base_url {
            Some(base_url) => Arc::new(IexProvider::with_base_url(base_url.clone(), token)),
            None => Arc::new(IexProvider::new(token)),
        };

        Ok(IngestService::new(
            provider,
            self.symbol_repository.clone(),
            self.quote_repository.clone(),
            self.dividend_repository.clone(),
            self.balance_sheet_repository.clone(),
            self.portfolio_repository.clone(),
            self.holding_repository.clone(),
            config.benchmark_symbol.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &tempfile::TempDir) -> Config {
        Config {
            db_path: dir.path().join("batch.db").to_string_lossy().into_owned(),
            provider_base_url: None,
            provider_token: None,
            report_dir: dir.path().join("reports"),
            benchmark_symbol: "SPY".to_string(),
        }
    }

    #[test]
    fn test_build_runs_migrations_and_serves_queries() {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let config = test_config(&dir);

        let context = AppContext::build(&config).expect("Failed to build context");
        let portfolios = context
            .portfolio_repository
            .get_portfolios(chrono::NaiveDate::from_ymd_opt(2030, 1, 1).expect("Invalid date"))
            .expect("Failed to query portfolios");
        assert!(portfolios.is_empty());
    }

    #[test]
    fn test_ingest_requires_a_provider_token() {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let config = test_config(&dir);

        let context = AppContext::build(&config).expect("Failed to build context");
        let err = context.ingest(&config).unwrap_err();
        assert!(err.to_string().contains("PROVIDER_TOKEN"));
    }
}
