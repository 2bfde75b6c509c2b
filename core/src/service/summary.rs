use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::model::entry::Entry;
use crate::model::stats::{BestDay, DailyProfit, SummaryStats};

/// Sums profit per calendar date, in first-seen date order.
pub fn daily_profits(entries: &[Entry]) -> Vec<DailyProfit> {
    let mut buckets: Vec<DailyProfit> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for entry in entries {
        accumulate_day(&mut buckets, &mut index, entry.date, entry.profit());
    }

    buckets
}

fn accumulate_day(
    buckets: &mut Vec<DailyProfit>,
    index: &mut HashMap<NaiveDate, usize>,
    date: NaiveDate,
    profit: f64,
) {
    match index.get(&date) {
        Some(&i) => buckets[i].profit += profit,
        None => {
            index.insert(date, buckets.len());
            buckets.push(DailyProfit { date, profit });
        }
    }
}

/// Folds entries into totals and the best-performing day in one pass.
///
/// `total_profit` is derived from the two totals once at the end rather
/// than accumulated per entry, so it is always exactly
/// `total_income - total_expense`.
pub fn compute_summary(entries: &[Entry]) -> SummaryStats {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut total_salary = 0.0;

    let mut days: Vec<DailyProfit> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for entry in entries {
        let expense = entry.total_expense();
        total_income += entry.income;
        total_expense += expense;
        total_salary += entry.driver_salary;

        accumulate_day(&mut days, &mut index, entry.date, entry.income - expense);
    }

    let total_profit = total_income - total_expense;
    let best_day = pick_best_day(&days);

    debug!(
        entries = entries.len(),
        days = days.len(),
        "computed summary"
    );

    SummaryStats {
        total_income,
        total_expense,
        total_salary,
        total_profit,
        best_day,
    }
}

// Strictly greater wins, so ties keep the earliest-seen date.
fn pick_best_day(days: &[DailyProfit]) -> Option<BestDay> {
    let mut max_profit = f64::NEG_INFINITY;
    let mut best = None;

    for day in days {
        if day.profit > max_profit {
            max_profit = day.profit;
            best = Some(BestDay {
                date: day.date,
                profit: day.profit,
            });
        }
    }

    best
}
