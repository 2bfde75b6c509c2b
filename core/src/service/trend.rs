use std::collections::HashMap;

use tracing::debug;

use crate::model::entry::Entry;
use crate::model::stats::{ChartPoint, TrendMode};

/// Number of entries plotted in daily mode.
pub const DAILY_WINDOW: usize = 7;

/// Builds the profit series for the trend chart.
///
/// Daily mode expects `entries` newest-first and plots the newest seven,
/// oldest on the left, one point per entry. Monthly mode buckets the whole
/// input by month abbreviation only, so March 2023 and March 2024 share a
/// bucket; buckets appear in first-seen order.
pub fn build_trend(entries: &[Entry], mode: TrendMode) -> Vec<ChartPoint> {
    let points = match mode {
        TrendMode::Daily => daily_points(entries),
        TrendMode::Monthly => monthly_points(entries),
    };
    debug!(entries = entries.len(), points = points.len(), ?mode, "built trend");
    points
}

fn daily_points(entries: &[Entry]) -> Vec<ChartPoint> {
    entries
        .iter()
        .take(DAILY_WINDOW)
        .rev()
        .map(|e| ChartPoint {
            label: e.date.format("%a").to_string(),
            profit: e.profit(),
        })
        .collect()
}

fn monthly_points(entries: &[Entry]) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let month = entry.date.format("%b").to_string();
        match index.get(&month) {
            Some(&i) => points[i].profit += entry.profit(),
            None => {
                index.insert(month.clone(), points.len());
                points.push(ChartPoint {
                    label: month,
                    profit: entry.profit(),
                });
            }
        }
    }

    points
}
