// Test cases for UniverseRanker.
#[cfg(test)]
mod tests {
    use crate::constants::QUOTE_LOOKBACK_DAYS;
    use crate::errors::Result;
    use crate::market_data::{
        BalanceSheet, BalanceSheetRepositoryTrait, Quote, QuoteRepositoryTrait, SymbolProfile,
        SymbolRepositoryTrait,
    };
    use crate::universe::{RankedStock, StockListRepositoryTrait, UniverseRanker};
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile(symbol: &str) -> SymbolProfile {
        SymbolProfile {
            symbol: symbol.to_string(),
            name: format!("{} Corp", symbol),
            security_name: format!("{} Corp Common Stock", symbol),
            security_type: "cs".to_string(),
            region: "US".to_string(),
            currency: "USD".to_string(),
            exchange: "NYS".to_string(),
            industry: "Packaged Software".to_string(),
            enabled: true,
        }
    }

    fn quote(
        symbol: &str,
        on: NaiveDate,
        close: Decimal,
        market_cap: Option<Decimal>,
        pe_ratio: Option<Decimal>,
    ) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            date: on,
            close,
            market_cap,
            pe_ratio,
        }
    }

    fn sheet(symbol: &str, on: NaiveDate, equity: Option<Decimal>) -> BalanceSheet {
        BalanceSheet {
            symbol: symbol.to_string(),
            report_date: on,
            shareholder_equity: equity,
        }
    }

    // --- Mock repositories ---

    #[derive(Clone, Default)]
    struct MockSymbolRepository {
        profiles: Arc<Mutex<Vec<SymbolProfile>>>,
    }

    impl SymbolRepositoryTrait for MockSymbolRepository {
        fn get_all(&self) -> Result<Vec<SymbolProfile>> {
            Ok(self.profiles.lock().unwrap().clone())
        }

        fn append_symbols(&self, _profiles: &[SymbolProfile]) -> Result<usize> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct MockQuoteRepository {
        quotes: Arc<Mutex<Vec<Quote>>>,
    }

    impl QuoteRepositoryTrait for MockQuoteRepository {
        fn get_quotes_since(&self, _symbols: &[String], _start: NaiveDate) -> Result<Vec<Quote>> {
            unimplemented!()
        }

        fn get_latest_quotes(
            &self,
            symbols: &[String],
            as_of: NaiveDate,
        ) -> Result<HashMap<String, Quote>> {
            let oldest = as_of - Duration::days(QUOTE_LOOKBACK_DAYS);
            let mut latest: HashMap<String, Quote> = HashMap::new();
            for q in self.quotes.lock().unwrap().iter() {
                if !symbols.contains(&q.symbol) || q.date > as_of || q.date < oldest {
                    continue;
                }
                match latest.get(&q.symbol) {
                    Some(held) if held.date >= q.date => {}
                    _ => {
                        latest.insert(q.symbol.clone(), q.clone());
                    }
                }
            }
            Ok(latest)
        }

        fn get_latest_dates(&self) -> Result<HashMap<String, NaiveDate>> {
            unimplemented!()
        }

        fn append_quotes(&self, _quotes: &[Quote]) -> Result<usize> {
            unimplemented!()
        }

        fn delete_duplicates(&self) -> Result<usize> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct MockBalanceSheetRepository {
        sheets: Arc<Mutex<Vec<BalanceSheet>>>,
    }

    impl BalanceSheetRepositoryTrait for MockBalanceSheetRepository {
        fn get_latest_reports(
            &self,
            symbols: &[String],
            as_of: NaiveDate,
        ) -> Result<Vec<BalanceSheet>> {
            let oldest = as_of - Duration::days(crate::constants::BALANCE_SHEET_MAX_AGE_DAYS);
            let mut latest: HashMap<String, BalanceSheet> = HashMap::new();
            for s in self.sheets.lock().unwrap().iter() {
                if !symbols.contains(&s.symbol) || s.report_date > as_of || s.report_date < oldest {
                    continue;
                }
                match latest.get(&s.symbol) {
                    Some(held) if held.report_date >= s.report_date => {}
                    _ => {
                        latest.insert(s.symbol.clone(), s.clone());
                    }
                }
            }
            let mut reports: Vec<BalanceSheet> = latest.into_values().collect();
            reports.sort_by(|a, b| a.symbol.cmp(&b.symbol));
            Ok(reports)
        }

        fn get_latest_report_dates(&self) -> Result<HashMap<String, NaiveDate>> {
            unimplemented!()
        }

        fn append_balance_sheets(&self, _sheets: &[BalanceSheet]) -> Result<usize> {
            unimplemented!()
        }

        fn delete_duplicates(&self) -> Result<usize> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct MockStockListRepository {
        rows: Arc<Mutex<Vec<RankedStock>>>,
    }

    impl StockListRepositoryTrait for MockStockListRepository {
        fn get_stock_list_on(&self, on: NaiveDate) -> Result<Vec<RankedStock>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.date == on)
                .cloned()
                .collect())
        }

        fn get_latest_stock_list(&self, _as_of: NaiveDate) -> Result<Vec<RankedStock>> {
            unimplemented!()
        }

        fn append_stock_list(&self, rows: &[RankedStock]) -> Result<usize> {
            self.rows.lock().unwrap().extend_from_slice(rows);
            Ok(rows.len())
        }

        fn delete_before(&self, cutoff: NaiveDate) -> Result<usize> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.date >= cutoff);
            Ok(before - rows.len())
        }
    }

    struct Fixture {
        symbols: MockSymbolRepository,
        quotes: MockQuoteRepository,
        sheets: MockBalanceSheetRepository,
        stock_lists: MockStockListRepository,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                symbols: MockSymbolRepository::default(),
                quotes: MockQuoteRepository::default(),
                sheets: MockBalanceSheetRepository::default(),
                stock_lists: MockStockListRepository::default(),
            }
        }

        fn ranker(&self) -> UniverseRanker {
            UniverseRanker::new(
                Arc::new(self.symbols.clone()),
                Arc::new(self.quotes.clone()),
                Arc::new(self.sheets.clone()),
                Arc::new(self.stock_lists.clone()),
                "SPY",
            )
        }
    }

    #[test]
    fn test_rank_orders_by_pe_over_roe() {
        let f = Fixture::new();
        let as_of = date(2019, 3, 1);
        *f.symbols.profiles.lock().unwrap() = vec![profile("AAA"), profile("BBB"), profile("CCC")];
        *f.quotes.quotes.lock().unwrap() = vec![
            quote("AAA", as_of, dec!(100), Some(dec!(1000000000)), Some(dec!(20))),
            quote("BBB", as_of, dec!(50), Some(dec!(500000000)), Some(dec!(10))),
            quote("CCC", as_of, dec!(10), Some(dec!(100000000)), Some(dec!(50))),
        ];
        *f.sheets.sheets.lock().unwrap() = vec![
            sheet("AAA", date(2018, 12, 31), Some(dec!(250000000))),
            sheet("BBB", date(2018, 12, 31), Some(dec!(200000000))),
            sheet("CCC", date(2018, 12, 31), Some(dec!(50000000))),
        ];

        let ranked = f.ranker().rank(as_of).unwrap();

        let order: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["BBB", "AAA", "CCC"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[2].rank, 3);

        // AAA: eps = 100/20 = 5, shares = 1B/100 = 10M, net income = 50M,
        // roe = 50M/250M = 0.2, pe/roe = 100.
        let aaa = &ranked[1];
        assert_eq!(aaa.eps, dec!(5));
        assert_eq!(aaa.shares_outstanding, dec!(10000000));
        assert_eq!(aaa.net_income, dec!(50000000));
        assert_eq!(aaa.return_on_equity, dec!(0.2));
        assert_eq!(aaa.pe_roe_ratio, dec!(100));
    }

    #[test]
    fn test_rank_drops_incomplete_and_non_positive_inputs() {
        let f = Fixture::new();
        let as_of = date(2019, 3, 1);
        *f.symbols.profiles.lock().unwrap() = vec![
            profile("GOOD"),
            profile("NOPE"),
            profile("NEGPE"),
            profile("ZEROEQ"),
            profile("NEGROE"),
            profile("STALE"),
        ];
        *f.quotes.quotes.lock().unwrap() = vec![
            quote("GOOD", as_of, dec!(100), Some(dec!(1000000000)), Some(dec!(20))),
            // Missing P/E.
            quote("NOPE", as_of, dec!(100), Some(dec!(1000000000)), None),
            quote("NEGPE", as_of, dec!(100), Some(dec!(1000000000)), Some(dec!(-5))),
            quote("ZEROEQ", as_of, dec!(100), Some(dec!(1000000000)), Some(dec!(20))),
            quote("NEGROE", as_of, dec!(100), Some(dec!(1000000000)), Some(dec!(20))),
            // Quote older than a week.
            quote(
                "STALE",
                as_of - Duration::days(8),
                dec!(100),
                Some(dec!(1000000000)),
                Some(dec!(20)),
            ),
        ];
        let report_date = date(2018, 12, 31);
        *f.sheets.sheets.lock().unwrap() = vec![
            sheet("GOOD", report_date, Some(dec!(250000000))),
            sheet("NOPE", report_date, Some(dec!(250000000))),
            sheet("NEGPE", report_date, Some(dec!(250000000))),
            sheet("ZEROEQ", report_date, Some(dec!(0))),
            sheet("NEGROE", report_date, Some(dec!(-250000000))),
            sheet("STALE", report_date, Some(dec!(250000000))),
        ];

        let ranked = f.ranker().rank(as_of).unwrap();

        let symbols: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["GOOD"]);
    }

    #[test]
    fn test_rank_stamps_list_with_newest_quote_date() {
        let f = Fixture::new();
        // Saturday; quotes land on Thursday and Friday.
        let as_of = date(2019, 3, 2);
        let thursday = date(2019, 2, 28);
        let friday = date(2019, 3, 1);
        *f.symbols.profiles.lock().unwrap() = vec![profile("AAA"), profile("BBB")];
        *f.quotes.quotes.lock().unwrap() = vec![
            quote("AAA", thursday, dec!(100), Some(dec!(1000000000)), Some(dec!(20))),
            quote("BBB", friday, dec!(50), Some(dec!(500000000)), Some(dec!(10))),
        ];
        *f.sheets.sheets.lock().unwrap() = vec![
            sheet("AAA", date(2018, 12, 31), Some(dec!(250000000))),
            sheet("BBB", date(2018, 12, 31), Some(dec!(200000000))),
        ];

        let ranked = f.ranker().rank(as_of).unwrap();

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.date == friday));
    }

    #[test]
    fn test_store_ranking_skips_existing_and_prunes_old_lists() {
        let f = Fixture::new();
        let as_of = date(2019, 3, 1);
        *f.symbols.profiles.lock().unwrap() = vec![profile("AAA")];
        *f.quotes.quotes.lock().unwrap() = vec![quote(
            "AAA",
            as_of,
            dec!(100),
            Some(dec!(1000000000)),
            Some(dec!(20)),
        )];
        *f.sheets.sheets.lock().unwrap() =
            vec![sheet("AAA", date(2018, 12, 31), Some(dec!(250000000)))];

        let ranker = f.ranker();
        let ranked = ranker.rank(as_of).unwrap();

        // A stale list from two weeks back is pruned by the first store.
        let mut old_row = ranked[0].clone();
        old_row.date = as_of - Duration::days(14);
        f.stock_lists.rows.lock().unwrap().push(old_row);

        assert_eq!(ranker.store_ranking(&ranked, as_of).unwrap(), 1);
        assert_eq!(ranker.store_ranking(&ranked, as_of).unwrap(), 0);

        let stored = f.stock_lists.rows.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].date, as_of);
    }

    #[test]
    fn test_census_counts_strictly_above_each_floor() {
        let f = Fixture::new();
        let as_of = date(2019, 3, 1);
        *f.symbols.profiles.lock().unwrap() =
            vec![profile("AAA"), profile("BBB"), profile("CCC")];
        *f.quotes.quotes.lock().unwrap() = vec![
            quote("AAA", as_of, dec!(100), Some(dec!(60000000)), Some(dec!(20))),
            quote("BBB", as_of, dec!(50), Some(dec!(2000000000)), Some(dec!(10))),
            quote("CCC", as_of, dec!(10), Some(dec!(60000000000)), Some(dec!(50))),
        ];
        let report_date = date(2018, 12, 31);
        *f.sheets.sheets.lock().unwrap() = vec![
            sheet("AAA", report_date, Some(dec!(25000000))),
            sheet("BBB", report_date, Some(dec!(800000000))),
            sheet("CCC", report_date, Some(dec!(20000000000))),
        ];

        let ranked = f.ranker().rank(as_of).unwrap();
        let census = UniverseRanker::census(&ranked);

        let by_label: HashMap<&str, usize> = census.into_iter().collect();
        assert_eq!(by_label["50M"], 3);
        assert_eq!(by_label["1B"], 2);
        assert_eq!(by_label["50B"], 1);
        assert_eq!(by_label["100B"], 0);
    }
}
