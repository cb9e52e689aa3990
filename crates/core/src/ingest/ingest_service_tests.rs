// Test cases for IngestService.
#[cfg(test)]
mod tests {
    use crate::constants::DEFAULT_BENCHMARK_SYMBOL;
    use crate::errors::Result;
    use crate::ingest::IngestService;
    use crate::ledger::{Holding, HoldingRepositoryTrait};
    use crate::market_data::{
        BalanceSheet, BalanceSheetRepositoryTrait, DividendDeclaration, DividendRepositoryTrait,
        Quote, QuoteRepositoryTrait, SymbolProfile, SymbolRepositoryTrait,
    };
    use crate::portfolios::{PortfolioDefinition, PortfolioRepositoryTrait};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use paperfolio_market_data::{
        BalanceSheetReport, ChartRange, CompanyInfo, DividendRecord, EquityDataProvider,
        HistoryPoint, LatestQuote, MarketDataError, SymbolListing,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn listing(symbol: &str, security_type: &str) -> SymbolListing {
        SymbolListing {
            symbol: symbol.to_string(),
            name: format!("{} Inc.", symbol),
            security_type: security_type.to_string(),
            region: "US".to_string(),
            currency: "USD".to_string(),
            exchange: "NYS".to_string(),
            is_enabled: true,
        }
    }

    fn company(symbol: &str) -> CompanyInfo {
        CompanyInfo {
            symbol: symbol.to_string(),
            company_name: Some(format!("{} Inc.", symbol)),
            security_name: Some(format!("{} Inc. Common Stock", symbol)),
            issue_type: Some("cs".to_string()),
            industry: Some("Packaged Software".to_string()),
            sector: Some("Technology Services".to_string()),
        }
    }

    fn profile(symbol: &str) -> SymbolProfile {
        SymbolProfile {
            symbol: symbol.to_string(),
            name: format!("{} Inc.", symbol),
            security_name: format!("{} Inc. Common Stock", symbol),
            security_type: "cs".to_string(),
            region: "US".to_string(),
            currency: "USD".to_string(),
            exchange: "NYS".to_string(),
            industry: "Packaged Software".to_string(),
            enabled: true,
        }
    }

    fn latest_quote(symbol: &str, on: NaiveDate, close: Decimal) -> LatestQuote {
        LatestQuote {
            symbol: symbol.to_string(),
            date: on,
            close,
            market_cap: Some(dec!(1000000000)),
            pe_ratio: Some(dec!(15)),
        }
    }

    // ------------------------------------------------------------------
    // Mock provider
    // ------------------------------------------------------------------

    #[derive(Clone, Default)]
    struct MockProvider {
        listings: Arc<Mutex<Vec<SymbolListing>>>,
        companies: Arc<Mutex<HashMap<String, CompanyInfo>>>,
        quotes: Arc<Mutex<HashMap<String, LatestQuote>>>,
        dividends: Arc<Mutex<HashMap<String, Vec<DividendRecord>>>>,
        balance_sheets: Arc<Mutex<HashMap<String, BalanceSheetReport>>>,
        closes: Arc<Mutex<HashMap<String, Vec<HistoryPoint>>>>,
        failing: Arc<Mutex<HashSet<String>>>,
        company_calls: Arc<Mutex<Vec<String>>>,
        dividend_calls: Arc<Mutex<Vec<String>>>,
        balance_sheet_calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockProvider {
        fn fail_on(&self, symbol: &str) {
            self.failing.lock().unwrap().insert(symbol.to_string());
        }

        fn check_failing(&self, symbol: &str) -> std::result::Result<(), MarketDataError> {
            if self.failing.lock().unwrap().contains(symbol) {
                Err(MarketDataError::ProviderError {
                    provider: "MOCK".to_string(),
                    message: format!("forced failure for {}", symbol),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl EquityDataProvider for MockProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn fetch_symbols(&self) -> std::result::Result<Vec<SymbolListing>, MarketDataError> {
            Ok(self.listings.lock().unwrap().clone())
        }

        async fn fetch_company(
            &self,
            symbol: &str,
        ) -> std::result::Result<Option<CompanyInfo>, MarketDataError> {
            self.company_calls.lock().unwrap().push(symbol.to_string());
            self.check_failing(symbol)?;
            Ok(self.companies.lock().unwrap().get(symbol).cloned())
        }

        async fn fetch_latest_quote(
            &self,
            symbol: &str,
        ) -> std::result::Result<Option<LatestQuote>, MarketDataError> {
            self.check_failing(symbol)?;
            Ok(self.quotes.lock().unwrap().get(symbol).cloned())
        }

        async fn fetch_dividends(
            &self,
            symbol: &str,
            _range: ChartRange,
        ) -> std::result::Result<Vec<DividendRecord>, MarketDataError> {
            self.dividend_calls.lock().unwrap().push(symbol.to_string());
            self.check_failing(symbol)?;
            Ok(self
                .dividends
                .lock()
                .unwrap()
                .get(symbol)
                .cloned()
                .unwrap_or_default())
        }

        async fn fetch_balance_sheet(
            &self,
            symbol: &str,
        ) -> std::result::Result<Option<BalanceSheetReport>, MarketDataError> {
            self.balance_sheet_calls
                .lock()
                .unwrap()
                .push(symbol.to_string());
            self.check_failing(symbol)?;
            Ok(self.balance_sheets.lock().unwrap().get(symbol).cloned())
        }

        async fn fetch_daily_closes(
            &self,
            symbol: &str,
            _range: ChartRange,
        ) -> std::result::Result<Vec<HistoryPoint>, MarketDataError> {
            self.check_failing(symbol)?;
            Ok(self
                .closes
                .lock()
                .unwrap()
                .get(symbol)
                .cloned()
                .unwrap_or_default())
        }
    }

    // ------------------------------------------------------------------
    // Mock repositories
    // ------------------------------------------------------------------

    #[derive(Clone, Default)]
    struct MockSymbolRepository {
        profiles: Arc<Mutex<Vec<SymbolProfile>>>,
    }

    impl SymbolRepositoryTrait for MockSymbolRepository {
        fn get_all(&self) -> Result<Vec<SymbolProfile>> {
            Ok(self.profiles.lock().unwrap().clone())
        }

        fn append_symbols(&self, profiles: &[SymbolProfile]) -> Result<usize> {
            let mut rows = self.profiles.lock().unwrap();
            let mut inserted = 0;
            for profile in profiles {
                if !rows.iter().any(|row| row.symbol == profile.symbol) {
                    rows.push(profile.clone());
                    inserted += 1;
                }
            }
            Ok(inserted)
        }
    }

    #[derive(Clone, Default)]
    struct MockQuoteRepository {
        rows: Arc<Mutex<Vec<Quote>>>,
    }

    impl QuoteRepositoryTrait for MockQuoteRepository {
        fn get_quotes_since(&self, _symbols: &[String], _start: NaiveDate) -> Result<Vec<Quote>> {
            unimplemented!()
        }

        fn get_latest_quotes(
            &self,
            _symbols: &[String],
            _as_of: NaiveDate,
        ) -> Result<HashMap<String, Quote>> {
            unimplemented!()
        }

        fn get_latest_dates(&self) -> Result<HashMap<String, NaiveDate>> {
            let mut latest: HashMap<String, NaiveDate> = HashMap::new();
            for row in self.rows.lock().unwrap().iter() {
                latest
                    .entry(row.symbol.clone())
                    .and_modify(|stored| {
                        if row.date > *stored {
                            *stored = row.date;
                        }
                    })
                    .or_insert(row.date);
            }
            Ok(latest)
        }

        fn append_quotes(&self, quotes: &[Quote]) -> Result<usize> {
            self.rows.lock().unwrap().extend_from_slice(quotes);
            Ok(quotes.len())
        }

        fn delete_duplicates(&self) -> Result<usize> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct MockDividendRepository {
        rows: Arc<Mutex<Vec<DividendDeclaration>>>,
    }

    impl DividendRepositoryTrait for MockDividendRepository {
        fn get_dividends_on_ex_date(
            &self,
            _symbols: &[String],
            _ex_date: NaiveDate,
        ) -> Result<Vec<DividendDeclaration>> {
            unimplemented!()
        }

        fn get_latest_ex_dates(&self) -> Result<HashMap<String, NaiveDate>> {
            let mut latest: HashMap<String, NaiveDate> = HashMap::new();
            for row in self.rows.lock().unwrap().iter() {
                latest
                    .entry(row.symbol.clone())
                    .and_modify(|stored| {
                        if row.ex_date > *stored {
                            *stored = row.ex_date;
                        }
                    })
                    .or_insert(row.ex_date);
            }
            Ok(latest)
        }

        fn append_dividends(&self, dividends: &[DividendDeclaration]) -> Result<usize> {
            self.rows.lock().unwrap().extend_from_slice(dividends);
            Ok(dividends.len())
        }
    }

    #[derive(Clone, Default)]
    struct MockBalanceSheetRepository {
        rows: Arc<Mutex<Vec<BalanceSheet>>>,
    }

    impl BalanceSheetRepositoryTrait for MockBalanceSheetRepository {
        fn get_latest_reports(
            &self,
            _symbols: &[String],
            _as_of: NaiveDate,
        ) -> Result<Vec<BalanceSheet>> {
            unimplemented!()
        }

        fn get_latest_report_dates(&self) -> Result<HashMap<String, NaiveDate>> {
            let mut latest: HashMap<String, NaiveDate> = HashMap::new();
            for row in self.rows.lock().unwrap().iter() {
                latest
                    .entry(row.symbol.clone())
                    .and_modify(|stored| {
                        if row.report_date > *stored {
                            *stored = row.report_date;
                        }
                    })
                    .or_insert(row.report_date);
            }
            Ok(latest)
        }

        fn append_balance_sheets(&self, sheets: &[BalanceSheet]) -> Result<usize> {
            self.rows.lock().unwrap().extend_from_slice(sheets);
            Ok(sheets.len())
        }

        fn delete_duplicates(&self) -> Result<usize> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct MockPortfolioRepository {
        definitions: Arc<Mutex<Vec<PortfolioDefinition>>>,
    }

    impl PortfolioRepositoryTrait for MockPortfolioRepository {
        fn get_portfolios(&self, as_of: NaiveDate) -> Result<Vec<PortfolioDefinition>> {
            Ok(self
                .definitions
                .lock()
                .unwrap()
                .iter()
                .filter(|definition| definition.inception_date <= as_of)
                .cloned()
                .collect())
        }

        fn get_portfolio(&self, _portfolio_id: &str) -> Result<Option<PortfolioDefinition>> {
            unimplemented!()
        }

        fn append_portfolios(&self, _definitions: &[PortfolioDefinition]) -> Result<usize> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct MockHoldingRepository {
        rows: Arc<Mutex<Vec<Holding>>>,
    }

    impl HoldingRepositoryTrait for MockHoldingRepository {
        fn get_latest_holdings(&self, _portfolio_id: &str, _date: NaiveDate) -> Result<Vec<Holding>> {
            unimplemented!()
        }

        fn get_holdings_since(&self, portfolio_id: &str, start: NaiveDate) -> Result<Vec<Holding>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|row| row.portfolio_id == portfolio_id && row.as_of >= start)
                .cloned()
                .collect())
        }

        fn append_holdings(&self, _rows: &[Holding]) -> Result<usize> {
            unimplemented!()
        }

        fn delete_since(&self, _portfolio_id: &str, _since: NaiveDate) -> Result<usize> {
            unimplemented!()
        }
    }

    // ------------------------------------------------------------------
    // Fixture
    // ------------------------------------------------------------------

    struct Fixture {
        provider: MockProvider,
        symbol_repository: MockSymbolRepository,
        quote_repository: MockQuoteRepository,
        dividend_repository: MockDividendRepository,
        balance_sheet_repository: MockBalanceSheetRepository,
        portfolio_repository: MockPortfolioRepository,
        holding_repository: MockHoldingRepository,
        service: IngestService,
    }

    impl Fixture {
        fn new() -> Self {
            let provider = MockProvider::default();
            let symbol_repository = MockSymbolRepository::default();
            let quote_repository = MockQuoteRepository::default();
            let dividend_repository = MockDividendRepository::default();
            let balance_sheet_repository = MockBalanceSheetRepository::default();
            let portfolio_repository = MockPortfolioRepository::default();
            let holding_repository = MockHoldingRepository::default();

            let service = IngestService::new(
                Arc::new(provider.clone()),
                Arc::new(symbol_repository.clone()),
                Arc::new(quote_repository.clone()),
                Arc::new(dividend_repository.clone()),
                Arc::new(balance_sheet_repository.clone()),
                Arc::new(portfolio_repository.clone()),
                Arc::new(holding_repository.clone()),
                DEFAULT_BENCHMARK_SYMBOL.to_string(),
            );

            Self {
                provider,
                symbol_repository,
                quote_repository,
                dividend_repository,
                balance_sheet_repository,
                portfolio_repository,
                holding_repository,
                service,
            }
        }

        fn add_profile(&self, symbol: &str) {
            self.symbol_repository
                .profiles
                .lock()
                .unwrap()
                .push(profile(symbol));
        }

        fn add_stored_quote(&self, symbol: &str, on: NaiveDate) {
            self.quote_repository.rows.lock().unwrap().push(Quote {
                symbol: symbol.to_string(),
                date: on,
                close: dec!(100),
                market_cap: None,
                pe_ratio: None,
            });
        }

        fn add_portfolio_holding(&self, portfolio_id: &str, symbol: &str, as_of: NaiveDate) {
            let known = self
                .portfolio_repository
                .definitions
                .lock()
                .unwrap()
                .iter()
                .any(|definition| definition.id == portfolio_id);
            if !known {
                self.portfolio_repository.definitions.lock().unwrap().push(
                    PortfolioDefinition {
                        id: portfolio_id.to_string(),
                        name: portfolio_id.to_string(),
                        description: String::new(),
                        stock_count: 30,
                        min_market_cap: dec!(100000000),
                        inception_date: date(2018, 7, 2),
                    },
                );
            }
            self.holding_repository.rows.lock().unwrap().push(Holding {
                portfolio_id: portfolio_id.to_string(),
                symbol: symbol.to_string(),
                quantity: dec!(10),
                as_of,
            });
        }
    }

    // ------------------------------------------------------------------
    // sync_symbols
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_sync_symbols_merges_listing_and_company() {
        let fixture = Fixture::new();
        {
            let mut listings = fixture.provider.listings.lock().unwrap();
            listings.push(listing("AAPL", "cs"));
            listings.push(listing("SPY", "et"));
            listings.push(listing("BOND", "cd"));
        }
        fixture
            .provider
            .companies
            .lock()
            .unwrap()
            .insert("AAPL".to_string(), company("AAPL"));
        fixture
            .provider
            .companies
            .lock()
            .unwrap()
            .insert("SPY".to_string(), company("SPY"));

        let inserted = fixture.service.sync_symbols().await.unwrap();

        assert_eq!(inserted, 2);
        let stored = fixture.symbol_repository.get_all().unwrap();
        let apple = stored.iter().find(|p| p.symbol == "AAPL").unwrap();
        assert_eq!(apple.name, "AAPL Inc.");
        assert_eq!(apple.security_name, "AAPL Inc. Common Stock");
        assert_eq!(apple.industry, "Packaged Software");
        assert!(apple.enabled);
        // The benchmark is ingested even though it is not a common stock
        assert!(stored.iter().any(|p| p.symbol == "SPY"));
        assert!(!stored.iter().any(|p| p.symbol == "BOND"));
    }

    #[tokio::test]
    async fn test_sync_symbols_skips_known_and_unfetchable_listings() {
        let fixture = Fixture::new();
        fixture.add_profile("OLD");
        {
            let mut listings = fixture.provider.listings.lock().unwrap();
            listings.push(listing("OLD", "cs"));
            listings.push(listing("AB#C", "cs"));
            listings.push(listing("NEW", "cs"));
        }
        // NEW has no company reference data yet

        let inserted = fixture.service.sync_symbols().await.unwrap();

        assert_eq!(inserted, 0);
        let calls = fixture.provider.company_calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["NEW"]);
    }

    #[tokio::test]
    async fn test_sync_symbols_continues_past_company_failures() {
        let fixture = Fixture::new();
        {
            let mut listings = fixture.provider.listings.lock().unwrap();
            listings.push(listing("BAD", "cs"));
            listings.push(listing("GOOD", "cs"));
        }
        fixture
            .provider
            .companies
            .lock()
            .unwrap()
            .insert("GOOD".to_string(), company("GOOD"));
        fixture.provider.fail_on("BAD");

        let inserted = fixture.service.sync_symbols().await.unwrap();

        assert_eq!(inserted, 1);
        let stored = fixture.symbol_repository.get_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].symbol, "GOOD");
    }

    // ------------------------------------------------------------------
    // sync_quotes
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_sync_quotes_inserts_only_newer_dates() {
        let fixture = Fixture::new();
        fixture.add_profile("AAA");
        fixture.add_stored_quote("AAA", date(2019, 1, 10));
        {
            let mut quotes = fixture.provider.quotes.lock().unwrap();
            quotes.insert(
                "AAA".to_string(),
                latest_quote("AAA", date(2019, 1, 10), dec!(101)),
            );
            quotes.insert(
                "SPY".to_string(),
                latest_quote("SPY", date(2019, 1, 10), dec!(250)),
            );
        }

        let inserted = fixture.service.sync_quotes().await.unwrap();

        // AAA is already stored for that date; only the benchmark is new
        assert_eq!(inserted, 1);
        let rows = fixture.quote_repository.rows.lock().unwrap();
        assert_eq!(rows.len(), 2);
        let spy = rows.iter().find(|q| q.symbol == "SPY").unwrap();
        assert_eq!(spy.date, date(2019, 1, 10));
        assert_eq!(spy.close, dec!(250));
    }

    #[tokio::test]
    async fn test_sync_quotes_survives_provider_failures() {
        let fixture = Fixture::new();
        fixture.add_profile("AAA");
        fixture.add_profile("BBB");
        fixture.provider.fail_on("AAA");
        fixture.provider.fail_on("SPY");
        fixture.provider.quotes.lock().unwrap().insert(
            "BBB".to_string(),
            latest_quote("BBB", date(2019, 1, 11), dec!(55)),
        );

        let inserted = fixture.service.sync_quotes().await.unwrap();

        assert_eq!(inserted, 1);
        let rows = fixture.quote_repository.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "BBB");
    }

    // ------------------------------------------------------------------
    // sync_dividends
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_sync_dividends_fetches_only_held_symbols() {
        let fixture = Fixture::new();
        fixture.add_portfolio_holding("p1", "AAA", date(2018, 7, 2));
        fixture.add_portfolio_holding("p1", "USD", date(2018, 7, 2));
        fixture.add_portfolio_holding("p2", "BBB", date(2018, 7, 2));

        fixture
            .dividend_repository
            .rows
            .lock()
            .unwrap()
            .push(DividendDeclaration {
                symbol: "AAA".to_string(),
                ex_date: date(2019, 1, 5),
                payment_date: Some(date(2019, 1, 20)),
                amount: Some(dec!(0.5)),
                currency: "USD".to_string(),
            });

        {
            let mut dividends = fixture.provider.dividends.lock().unwrap();
            dividends.insert(
                "AAA".to_string(),
                vec![
                    DividendRecord {
                        symbol: "AAA".to_string(),
                        ex_date: date(2019, 1, 5),
                        payment_date: Some(date(2019, 1, 20)),
                        amount: Some(dec!(0.5)),
                        currency: "USD".to_string(),
                    },
                    DividendRecord {
                        symbol: "AAA".to_string(),
                        ex_date: date(2019, 1, 12),
                        payment_date: Some(date(2019, 1, 27)),
                        amount: Some(dec!(0.5)),
                        currency: "USD".to_string(),
                    },
                ],
            );
            dividends.insert(
                "BBB".to_string(),
                vec![DividendRecord {
                    symbol: "BBB".to_string(),
                    ex_date: date(2019, 1, 3),
                    payment_date: None,
                    amount: None,
                    currency: "USD".to_string(),
                }],
            );
        }

        let inserted = fixture
            .service
            .sync_dividends(date(2019, 1, 15))
            .await
            .unwrap();

        // The Jan 5 declaration is already stored; Jan 12 and BBB are new
        assert_eq!(inserted, 2);
        let calls = fixture.provider.dividend_calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["AAA", "BBB"]);

        let rows = fixture.dividend_repository.rows.lock().unwrap();
        assert!(rows
            .iter()
            .any(|d| d.symbol == "AAA" && d.ex_date == date(2019, 1, 12)));
        assert!(rows
            .iter()
            .any(|d| d.symbol == "BBB" && d.ex_date == date(2019, 1, 3)));
    }

    #[tokio::test]
    async fn test_sync_dividends_without_holdings_is_a_no_op() {
        let fixture = Fixture::new();

        let inserted = fixture
            .service
            .sync_dividends(date(2019, 1, 15))
            .await
            .unwrap();

        assert_eq!(inserted, 0);
        assert!(fixture.provider.dividend_calls.lock().unwrap().is_empty());
    }

    // ------------------------------------------------------------------
    // sync_balance_sheets
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_sync_balance_sheets_respects_refresh_window() {
        let fixture = Fixture::new();
        fixture.add_profile("AAA");
        fixture.add_profile("BBB");
        fixture.add_profile("CCC");

        let today = date(2019, 6, 1);
        {
            let mut rows = fixture.balance_sheet_repository.rows.lock().unwrap();
            // Fresh report, skipped without a fetch
            rows.push(BalanceSheet {
                symbol: "AAA".to_string(),
                report_date: date(2019, 5, 2),
                shareholder_equity: Some(dec!(1000000)),
            });
            // Stale report, due for refresh
            rows.push(BalanceSheet {
                symbol: "BBB".to_string(),
                report_date: date(2019, 1, 2),
                shareholder_equity: Some(dec!(2000000)),
            });
        }
        fixture.provider.balance_sheets.lock().unwrap().insert(
            "BBB".to_string(),
            BalanceSheetReport {
                symbol: "BBB".to_string(),
                report_date: date(2019, 5, 22),
                shareholder_equity: Some(dec!(2500000)),
            },
        );
        // CCC has never reported and the provider has nothing for it

        let inserted = fixture.service.sync_balance_sheets(today).await.unwrap();

        assert_eq!(inserted, 1);
        let mut calls = fixture
            .provider
            .balance_sheet_calls
            .lock()
            .unwrap()
            .clone();
        calls.sort();
        assert_eq!(calls, vec!["BBB", "CCC"]);

        let rows = fixture.balance_sheet_repository.rows.lock().unwrap();
        assert!(rows
            .iter()
            .any(|s| s.symbol == "BBB" && s.report_date == date(2019, 5, 22)));
    }

    // ------------------------------------------------------------------
    // backfill_history
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_backfill_history_inserts_missing_days() {
        let fixture = Fixture::new();
        fixture.add_stored_quote("SPY", date(2019, 1, 10));
        fixture.provider.closes.lock().unwrap().insert(
            "SPY".to_string(),
            vec![
                HistoryPoint {
                    date: date(2019, 1, 9),
                    close: dec!(248),
                },
                HistoryPoint {
                    date: date(2019, 1, 10),
                    close: dec!(249),
                },
                HistoryPoint {
                    date: date(2019, 1, 11),
                    close: dec!(250),
                },
                HistoryPoint {
                    date: date(2019, 1, 14),
                    close: dec!(251),
                },
            ],
        );

        let inserted = fixture
            .service
            .backfill_history("SPY", ChartRange::OneMonth)
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        let rows = fixture.quote_repository.rows.lock().unwrap();
        let backfilled: Vec<_> = rows
            .iter()
            .filter(|q| q.date > date(2019, 1, 10))
            .collect();
        assert_eq!(backfilled.len(), 2);
        assert!(backfilled.iter().all(|q| q.market_cap.is_none()));
    }
}
