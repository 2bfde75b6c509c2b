use std::{io, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fleetledger_core::{
    build_trend, compute_summary, ChartPoint, CurrencyFormat, Entry, SummaryStats, TrendMode,
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Padding, Paragraph},
};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    income: Color,
    expense: Color,
    salary: Color,
    profit: Color,
    loss: Color,
}

const THEME: Theme = Theme {
    primary: Color::Yellow,
    muted: Color::DarkGray,
    text: Color::White,
    income: Color::Green,
    expense: Color::Red,
    salary: Color::Magenta,
    profit: Color::Yellow,
    loss: Color::Red,
};

pub struct DashboardApp {
    pub stats: SummaryStats,
    pub daily: Vec<ChartPoint>,
    pub monthly: Vec<ChartPoint>,
    pub mode: TrendMode,
    pub currency: CurrencyFormat,
}

impl DashboardApp {
    pub fn new(entries: &[Entry], currency: CurrencyFormat) -> Self {
        Self {
            stats: compute_summary(entries),
            daily: build_trend(entries, TrendMode::Daily),
            monthly: build_trend(entries, TrendMode::Monthly),
            mode: TrendMode::Daily,
            currency,
        }
    }

    pub fn set_mode(&mut self, mode: TrendMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            TrendMode::Daily => TrendMode::Monthly,
            TrendMode::Monthly => TrendMode::Daily,
        };
    }

    pub fn points(&self) -> &[ChartPoint] {
        match self.mode {
            TrendMode::Daily => &self.daily,
            TrendMode::Monthly => &self.monthly,
        }
    }
}

pub fn run(entries: &[Entry], currency: CurrencyFormat) -> Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = DashboardApp::new(entries, currency);
    let res = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut DashboardApp,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('d') => app.set_mode(TrendMode::Daily),
                        KeyCode::Char('m') => app.set_mode(TrendMode::Monthly),
                        KeyCode::Tab | KeyCode::Left | KeyCode::Right => app.toggle_mode(),
                        _ => {}
                    }
                }
            }
        }
    }
}

fn ui(frame: &mut Frame, app: &DashboardApp) {
    let size = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header / mode tabs
            Constraint::Length(5), // Stat cards
            Constraint::Min(10),   // Trend chart
            Constraint::Length(1), // Footer / Help
        ])
        .split(size);

    draw_header(frame, app, main_layout[0]);
    draw_cards(frame, app, main_layout[1]);
    draw_chart(frame, app, main_layout[2]);

    let help = Line::from(vec![
        Span::styled("DAILY: ", Style::default().fg(THEME.muted)),
        Span::styled("d ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("MONTHLY: ", Style::default().fg(THEME.muted)),
        Span::styled("m ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    let footer = Paragraph::new(help)
        .alignment(Alignment::Center)
        .style(Style::default().fg(THEME.muted));
    frame.render_widget(footer, main_layout[3]);
}

fn draw_header(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(THEME.muted));

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // App title
            Constraint::Min(1),     // Spacer
            Constraint::Length(24), // Mode selector
        ])
        .split(area);

    let app_title = Paragraph::new(Span::styled(
        "FLEET LEDGER",
        Style::default()
            .fg(THEME.primary)
            .add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(
                format!(" {} ", label),
                Style::default()
                    .fg(THEME.primary)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(THEME.muted))
        }
    };
    let nav = Paragraph::new(Line::from(vec![
        tab("Daily", app.mode == TrendMode::Daily),
        Span::raw(" "),
        tab("Monthly", app.mode == TrendMode::Monthly),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    frame.render_widget(header_block, area);
}

fn draw_cards(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let stats = &app.stats;
    let currency = &app.currency;
    let profit_color = if stats.total_profit >= 0.0 {
        THEME.profit
    } else {
        THEME.loss
    };
    let best = stats
        .best_day
        .map(|b| format!("Best: {}", b.date.format("%Y-%m-%d")))
        .unwrap_or_default();

    let cards = [
        ("Total Income", currency.format(stats.total_income), THEME.income, String::new()),
        ("Total Expenses", currency.format(stats.total_expense), THEME.expense, String::new()),
        ("Driver Salaries", currency.format(stats.total_salary), THEME.salary, String::new()),
        ("Net Profit", currency.format(stats.total_profit), profit_color, best),
    ];

    for ((title, value, color, sub), chunk) in cards.into_iter().zip(chunks.iter()) {
        let text = vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(sub, Style::default().fg(THEME.muted))),
        ];
        let card = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(format!(" {} ", title)),
        );
        frame.render_widget(card, *chunk);
    }
}

fn draw_chart(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(" Profit Trend ");

    let points = app.points();
    if points.is_empty() {
        frame.render_widget(
            Paragraph::new("No entries yet")
                .alignment(Alignment::Center)
                .block(chart_block),
            area,
        );
        return;
    }

    // Bars carry magnitudes; sign is shown by colour and the value label.
    let bar_items: Vec<Bar> = points
        .iter()
        .map(|p| {
            let color = if p.is_loss() { THEME.loss } else { THEME.profit };
            Bar::default()
                .label(p.label.clone())
                .value(p.profit.abs().round() as u64)
                .style(Style::default().fg(color))
                .text_value(app.currency.format(p.profit))
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block)
        .bar_width(12)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bar_items));

    frame.render_widget(chart, area);
}
