use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Inception date of the standard simulation grid.
pub const STANDARD_INCEPTION: &str = "2018-07-02";

/// Cash deposited into each standard portfolio at inception.
pub const INITIAL_DEPOSIT: Decimal = dec!(100_000_000);

const GRID_STOCK_COUNTS: [i32; 2] = [30, 50];

const GRID_MCAP_TIERS: [(&str, i64); 6] = [
    ("100M", 100_000_000),
    ("500M", 500_000_000),
    ("1B", 1_000_000_000),
    ("5B", 5_000_000_000),
    ("10B", 10_000_000_000),
    ("50B", 50_000_000_000),
];

/// Static configuration of one simulated portfolio. Created once,
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Target number of positions; buys split cash evenly over this count.
    pub stock_count: i32,
    /// Universe floor for buys; candidates must exceed it strictly.
    pub min_market_cap: Decimal,
    pub inception_date: NaiveDate,
}

/// The standard simulation set: every combination of position count
/// {30, 50} and market-cap floor {100M..50B}, twelve portfolios in all.
pub fn standard_grid(inception: NaiveDate) -> Vec<PortfolioDefinition> {
    let mut definitions = Vec::with_capacity(GRID_STOCK_COUNTS.len() * GRID_MCAP_TIERS.len());
    for stock_count in GRID_STOCK_COUNTS {
        for (label, floor) in GRID_MCAP_TIERS {
            definitions.push(PortfolioDefinition {
                id: format!("stocks{}mcap{}", stock_count, label),
                name: format!("{} stocks, {} market cap", stock_count, label),
                description: format!(
                    "Portfolio of {} stocks above {} market cap with initial investment of 100M USD",
                    stock_count, label
                ),
                stock_count,
                min_market_cap: Decimal::from(floor),
                inception_date: inception,
            });
        }
    }
    definitions
}
