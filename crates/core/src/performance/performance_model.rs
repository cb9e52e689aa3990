use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One valued day of one portfolio.
///
/// The adjusted pair removes same-day external flows from the return:
/// deposits inflate the base, withdrawals inflate the close, so
/// `percent_return` measures market movement only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub portfolio_id: String,
    pub date: NaiveDate,
    /// Cash plus market value of every non-cash position at the close.
    pub close_value: Decimal,
    /// `close_value` of the previous valued day (0 before the first one).
    pub prev_close_value: Decimal,
    /// prev_close_value + deposits dated this day.
    pub adj_prev_close_value: Decimal,
    /// close_value + withdrawals dated this day.
    pub adj_close_value: Decimal,
    /// 100 x (adj_close_value - adj_prev_close_value) / adj_prev_close_value
    pub percent_return: Decimal,
}

/// What one valuation pass did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValuationSummary {
    pub portfolio_id: String,
    pub records_appended: usize,
    pub last_valued_date: Option<NaiveDate>,
}

/// Compounds daily percent returns into a cumulative percent series.
///
/// `chained[i]` is the total return after day i, starting from 0 before
/// the first day. Gap days (no record) simply do not appear; compounding
/// spans them.
pub fn chain_returns(daily_percents: &[Decimal]) -> Vec<Decimal> {
    let hundred = dec!(100);
    let mut chained = Vec::with_capacity(daily_percents.len());
    let mut cumulative = Decimal::ZERO;
    for percent in daily_percents {
        cumulative =
            (((hundred + cumulative) / hundred) * ((hundred + percent) / hundred) - Decimal::ONE)
                * hundred;
        chained.push(cumulative);
    }
    chained
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_returns_compounds() {
        let chained = chain_returns(&[dec!(10), dec!(10)]);
        assert_eq!(chained, vec![dec!(10), dec!(21.00)]);
    }

    #[test]
    fn test_chain_returns_round_trip_through_loss() {
        let chained = chain_returns(&[dec!(-50), dec!(100)]);
        assert_eq!(chained.last().copied(), Some(dec!(0.00)));
    }

    #[test]
    fn test_chain_returns_empty() {
        assert!(chain_returns(&[]).is_empty());
    }
}
