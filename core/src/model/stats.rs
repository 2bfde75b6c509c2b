use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BestDay {
    pub date: NaiveDate,
    pub profit: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SummaryStats {
    pub total_income: f64,
    pub total_expense: f64,
    pub total_salary: f64,
    pub total_profit: f64,
    pub best_day: Option<BestDay>,
}

/// Profit summed over every entry sharing one calendar date.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DailyProfit {
    pub date: NaiveDate,
    pub profit: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String, // "Mon" in daily mode, "Mar" in monthly mode
    pub profit: f64,
}

impl ChartPoint {
    pub fn is_loss(&self) -> bool {
        self.profit < 0.0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendMode {
    #[default]
    Daily,
    Monthly,
}
