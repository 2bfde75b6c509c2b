use fleetledger_core::{ChartPoint, CurrencyFormat, Entry, SummaryStats};
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Color, Modify, Style};
use tabled::{Table, Tabled};

// Helper struct for Table Row
#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Driver")]
    driver: String,
    #[tabled(rename = "Trip")]
    trip: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Exp")]
    expense: String,
    #[tabled(rename = "Profit")]
    profit: String,
}

#[derive(Tabled)]
struct TotalRow {
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Bucket")]
    label: String,
    #[tabled(rename = "Profit")]
    profit: String,
    #[tabled(rename = "")]
    bar: String,
}

pub fn show_entries(entries: &[Entry], currency: &CurrencyFormat) {
    if entries.is_empty() {
        println!("No entries found.");
        return;
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|e| {
            let id_short = e
                .id
                .map(|id| id.to_string()[..8].to_string())
                .unwrap_or_else(|| "-".to_string());
            let trip = match (&e.trip_from, &e.trip_to) {
                (Some(from), Some(to)) => format!("{} → {}", from, to),
                (Some(from), None) => from.clone(),
                (None, Some(to)) => format!("→ {}", to),
                (None, None) => String::new(),
            };
            EntryRow {
                id: id_short,
                date: e.date.format("%b %d").to_string(),
                vehicle: e.vehicle_id.clone(),
                driver: e.driver_name.clone(),
                trip,
                income: format!("+{}", currency.format(e.income)),
                expense: format!("-{}", currency.format(e.total_expense())),
                profit: currency.format(e.profit()),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .with(Modify::new(Columns::new(5..)).with(Alignment::right()));

    println!("{}", table);
}

pub fn show_summary(stats: &SummaryStats, currency: &CurrencyFormat) {
    let rows = vec![
        TotalRow {
            category: "Total Income",
            amount: currency.format(stats.total_income),
        },
        TotalRow {
            category: "Total Expenses",
            amount: currency.format(stats.total_expense),
        },
        TotalRow {
            category: "Driver Salaries",
            amount: currency.format(stats.total_salary),
        },
        TotalRow {
            category: "Net Profit",
            amount: currency.format(stats.total_profit),
        },
    ];

    let profit_color = if stats.total_profit >= 0.0 {
        Color::FG_GREEN
    } else {
        Color::FG_RED
    };

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .with(Modify::new(Rows::last()).with(profit_color))
        .with(Modify::new(Columns::last()).with(Alignment::right()));

    println!("{}", table);

    match &stats.best_day {
        Some(best) => println!(
            "Best day: {} ({})",
            best.date.format("%Y-%m-%d"),
            currency.format(best.profit)
        ),
        None => println!("Best day: -"),
    }
}

pub fn show_trend(points: &[ChartPoint], currency: &CurrencyFormat) {
    if points.is_empty() {
        println!("No entries to chart.");
        return;
    }

    let scale = points
        .iter()
        .map(|p| p.profit.abs())
        .fold(0.0_f64, f64::max);

    let rows: Vec<TrendRow> = points
        .iter()
        .map(|p| {
            let width = if scale > 0.0 {
                ((p.profit.abs() / scale) * 30.0).round() as usize
            } else {
                0
            };
            let glyph = if p.is_loss() { "░" } else { "█" };
            TrendRow {
                label: p.label.clone(),
                profit: currency.format(p.profit),
                bar: glyph.repeat(width),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .with(Modify::new(Columns::new(1..2)).with(Alignment::right()));

    println!("{}", table);
}
