use crate::model::stats::SummaryStats;
use crate::report::currency::CurrencyFormat;

pub const DEFAULT_HEADING: &str = "*Taxi Business Report*";

/// Short text for pasting into a chat: a heading line followed by income,
/// expense and profit.
pub fn share_digest(stats: &SummaryStats, heading: &str, currency: &CurrencyFormat) -> String {
    format!(
        "{}\nIncome: {}\nExpense: {}\nProfit: {}",
        heading,
        currency.format(stats.total_income),
        currency.format(stats.total_expense),
        currency.format(stats.total_profit),
    )
}
