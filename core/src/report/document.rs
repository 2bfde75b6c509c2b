//! Page layout for the printable statement.
//!
//! Positions are in millimetres on an A4 page, y growing downwards, text
//! positioned by its baseline. The layout is a pure function of its inputs:
//! the generation timestamp is passed in, never read from the clock.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::entry::Entry;
use crate::model::stats::SummaryStats;
use crate::report::currency::CurrencyFormat;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;

const PT_TO_MM: f64 = 0.3528;
const LINE_FACTOR: f64 = 1.15;
// Average glyph advance as a share of the em size.
const GLYPH_FACTOR: f64 = 0.5;

const TEXT_LEFT: f64 = 18.0;
const TABLE_MARGIN: f64 = 14.0;
const SECTION_GAP: f64 = 18.0;
const HEADING_TO_TABLE: f64 = 6.0;
const DETAIL_MIN_SPACE: f64 = 40.0;
const NEW_PAGE_TOP: f64 = 20.0;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

const INK: Rgb = Rgb(40, 40, 40);
const TITLE_INK: Rgb = Rgb(25, 25, 25);
const SUBTITLE_INK: Rgb = Rgb(90, 90, 90);
const MUTED_INK: Rgb = Rgb(120, 120, 120);
const DIVIDER: Rgb = Rgb(220, 220, 220);
const GRID: Rgb = Rgb(230, 230, 230);
const HEAD_FILL: Rgb = Rgb(245, 245, 245);
const ALT_FILL: Rgb = Rgb(252, 252, 252);
const PROFIT_INK: Rgb = Rgb(0, 150, 0);
const DETAIL_PROFIT_INK: Rgb = Rgb(0, 140, 0);
const LOSS_INK: Rgb = Rgb(200, 30, 30);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TextItem {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Rgb,
    pub align: Align,
    pub content: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RuleItem {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    pub width: f64,
    pub color: Rgb,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CellItem {
    pub x: f64,
    pub width: f64,
    pub text: String,
    /// `text` wrapped to the column width; one element per printed line.
    pub lines: Vec<String>,
    pub align: Align,
    pub bold: bool,
    pub color: Rgb,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RowItem {
    pub y: f64,
    pub height: f64,
    pub line_height: f64,
    pub padding: f64,
    pub font_size: f64,
    pub fill: Option<Rgb>,
    pub border: Rgb,
    pub is_header: bool,
    pub cells: Vec<CellItem>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Item {
    Text(TextItem),
    Rule(RuleItem),
    Row(RowItem),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub items: Vec<Item>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Body rows across all pages, repeated headers excluded.
    pub fn body_rows(&self) -> impl Iterator<Item = &RowItem> {
        self.pages.iter().flat_map(|p| {
            p.items.iter().filter_map(|item| match item {
                Item::Row(row) if !row.is_header => Some(row),
                _ => None,
            })
        })
    }
}

/// Everything the statement needs besides the entries and their summary.
pub struct ReportContext<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub range_label: &'a str,
    pub generated_at: NaiveDateTime,
    pub currency: &'a CurrencyFormat,
}

struct Column {
    title: &'static str,
    width: f64,
    align: Align,
    bold: bool,
}

struct TableStyle {
    font_size: f64,
    padding: f64,
    head_border: Rgb,
    alternate_fill: Option<Rgb>,
}

impl TableStyle {
    fn line_height(&self) -> f64 {
        self.font_size * PT_TO_MM * LINE_FACTOR
    }

    fn row_height(&self, cells: &[CellItem]) -> f64 {
        let lines = cells.iter().map(|c| c.lines.len()).max().unwrap_or(1).max(1);
        lines as f64 * self.line_height() + 2.0 * self.padding
    }
}

struct BodyCell {
    text: String,
    color: Option<Rgb>,
    bold: bool,
}

impl BodyCell {
    fn plain(text: String) -> Self {
        Self {
            text,
            color: None,
            bold: false,
        }
    }

    fn emphasised(text: String, color: Rgb) -> Self {
        Self {
            text,
            color: Some(color),
            bold: true,
        }
    }
}

const SUMMARY_COLUMNS: [Column; 2] = [
    Column {
        title: "Category",
        width: 91.0,
        align: Align::Left,
        bold: true,
    },
    Column {
        title: "Amount",
        width: 91.0,
        align: Align::Right,
        bold: false,
    },
];

const DETAIL_COLUMNS: [Column; 6] = [
    Column {
        title: "Date",
        width: 28.0,
        align: Align::Left,
        bold: false,
    },
    Column {
        title: "Vehicle",
        width: 30.0,
        align: Align::Left,
        bold: false,
    },
    Column {
        title: "Driver",
        width: 40.0,
        align: Align::Left,
        bold: false,
    },
    Column {
        title: "Income",
        width: 28.0,
        align: Align::Right,
        bold: false,
    },
    Column {
        title: "Expense",
        width: 28.0,
        align: Align::Right,
        bold: false,
    },
    Column {
        title: "Profit",
        width: 28.0,
        align: Align::Right,
        bold: true,
    },
];

const SUMMARY_STYLE: TableStyle = TableStyle {
    font_size: 11.0,
    padding: 4.0,
    head_border: GRID,
    alternate_fill: None,
};

const DETAIL_STYLE: TableStyle = TableStyle {
    font_size: 9.5,
    padding: 3.0,
    head_border: Rgb(225, 225, 225),
    alternate_fill: Some(ALT_FILL),
};

struct Layout {
    pages: Vec<Page>,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page {
                number: 1,
                items: Vec::new(),
            }],
        }
    }

    fn push(&mut self, item: Item) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }

    fn add_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            items: Vec::new(),
        });
    }

    fn text(&mut self, x: f64, y: f64, size: f64, color: Rgb, align: Align, content: String) {
        self.push(Item::Text(TextItem {
            x,
            y,
            size,
            color,
            align,
            content,
        }));
    }

    /// Lays out a table starting at `start_y` and returns the y just below
    /// its last row. Rows grow to fit wrapped text. A row that would cross
    /// the bottom margin moves to a new page, where the header is repeated.
    fn table(
        &mut self,
        start_y: f64,
        columns: &[Column],
        style: &TableStyle,
        rows: Vec<Vec<BodyCell>>,
    ) -> f64 {
        let bottom = PAGE_HEIGHT - TABLE_MARGIN;
        let header = header_cells(columns, style);
        let header_height = style.row_height(&header);
        let body: Vec<Vec<CellItem>> = rows
            .into_iter()
            .map(|row| lay_cells(columns, style, row))
            .collect();

        let mut y = start_y;

        // Never leave a header orphaned at the foot of a page.
        let first_height = body
            .first()
            .map(|cells| style.row_height(cells))
            .unwrap_or(header_height);
        if y + header_height + first_height > bottom {
            self.add_page();
            y = TABLE_MARGIN;
        }
        self.header_row(y, header.clone(), header_height, style);
        y += header_height;

        for (index, cells) in body.into_iter().enumerate() {
            let height = style.row_height(&cells);
            if y + height > bottom {
                self.add_page();
                y = TABLE_MARGIN;
                self.header_row(y, header.clone(), header_height, style);
                y += header_height;
            }

            let fill = match style.alternate_fill {
                Some(fill) if index % 2 == 1 => Some(fill),
                _ => None,
            };
            self.push(Item::Row(RowItem {
                y,
                height,
                line_height: style.line_height(),
                padding: style.padding,
                font_size: style.font_size,
                fill,
                border: GRID,
                is_header: false,
                cells,
            }));
            y += height;
        }

        y
    }

    fn header_row(&mut self, y: f64, cells: Vec<CellItem>, height: f64, style: &TableStyle) {
        self.push(Item::Row(RowItem {
            y,
            height,
            line_height: style.line_height(),
            padding: style.padding,
            font_size: style.font_size,
            fill: Some(HEAD_FILL),
            border: style.head_border,
            is_header: true,
            cells,
        }));
    }
}

fn header_cells(columns: &[Column], style: &TableStyle) -> Vec<CellItem> {
    let header = columns
        .iter()
        .map(|c| BodyCell::emphasised(c.title.to_string(), TITLE_INK))
        .collect();
    lay_cells(columns, style, header)
}

fn lay_cells(columns: &[Column], style: &TableStyle, row: Vec<BodyCell>) -> Vec<CellItem> {
    let mut x = TABLE_MARGIN;
    columns
        .iter()
        .zip(row)
        .map(|(column, cell)| {
            // Amounts stay on one line; free-text columns wrap.
            let lines = match column.align {
                Align::Left => {
                    wrap_to_width(&cell.text, column.width - 2.0 * style.padding, style.font_size)
                }
                _ => vec![cell.text.clone()],
            };
            let item = CellItem {
                x,
                width: column.width,
                text: cell.text,
                lines,
                align: column.align,
                bold: column.bold || cell.bold,
                color: cell.color.unwrap_or(INK),
            };
            x += column.width;
            item
        })
        .collect()
}

/// Greedy word wrap of `text` to `width_mm` at `font_size`. Words wider
/// than a whole line are split between characters. Always returns at
/// least one line.
pub fn wrap_to_width(text: &str, width_mm: f64, font_size: f64) -> Vec<String> {
    let glyph_mm = font_size * PT_TO_MM * GLYPH_FACTOR;
    let max_cols = (width_mm / glyph_mm).floor().max(1.0) as usize;

    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut used = 0;

    for word in text.split_whitespace() {
        let word_cols = UnicodeWidthStr::width(word);
        let gap = usize::from(!line.is_empty());

        if used + gap + word_cols <= max_cols {
            if gap == 1 {
                line.push(' ');
            }
            line.push_str(word);
            used += gap + word_cols;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            used = 0;
        }

        if word_cols <= max_cols {
            line.push_str(word);
            used = word_cols;
            continue;
        }

        for ch in word.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if used + w > max_cols && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            line.push(ch);
            used += w;
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

fn profit_ink(value: f64, positive: Rgb) -> Rgb {
    if value < 0.0 {
        LOSS_INK
    } else {
        positive
    }
}

/// Lays out the full statement: title block, summary table and one detail
/// row per entry, in the order given.
pub fn build_document(entries: &[Entry], stats: &SummaryStats, ctx: &ReportContext) -> Document {
    let mut layout = Layout::new();
    let centre = PAGE_WIDTH / 2.0;

    layout.text(centre, 18.0, 22.0, TITLE_INK, Align::Center, ctx.title.to_string());
    layout.text(centre, 26.0, 13.0, SUBTITLE_INK, Align::Center, ctx.subtitle.to_string());
    layout.push(Item::Rule(RuleItem {
        x1: TEXT_LEFT,
        x2: PAGE_WIDTH - TEXT_LEFT,
        y: 32.0,
        width: 0.4,
        color: DIVIDER,
    }));
    layout.text(
        TEXT_LEFT,
        39.0,
        10.0,
        MUTED_INK,
        Align::Left,
        format!("Generated: {}", ctx.generated_at.format("%d %b %Y, %H:%M")),
    );

    let summary_y = 53.0;
    layout.text(
        TEXT_LEFT,
        summary_y,
        14.0,
        INK,
        Align::Left,
        format!("Summary ({})", ctx.range_label),
    );

    let currency = ctx.currency;
    let summary_rows = vec![
        vec![
            BodyCell::plain("Total Income".to_string()),
            BodyCell::plain(currency.credit(stats.total_income)),
        ],
        vec![
            BodyCell::plain("Total Expenses".to_string()),
            BodyCell::plain(currency.debit(stats.total_expense)),
        ],
        vec![
            BodyCell::plain("Driver Salaries".to_string()),
            BodyCell::plain(currency.format(stats.total_salary)),
        ],
        {
            let ink = profit_ink(stats.total_profit, PROFIT_INK);
            vec![
                BodyCell::emphasised("Net Profit".to_string(), ink),
                BodyCell::emphasised(currency.format(stats.total_profit), ink),
            ]
        },
    ];
    let summary_end = layout.table(
        summary_y + HEADING_TO_TABLE,
        &SUMMARY_COLUMNS,
        &SUMMARY_STYLE,
        summary_rows,
    );

    let mut detail_y = summary_end + SECTION_GAP;
    if detail_y > PAGE_HEIGHT - DETAIL_MIN_SPACE {
        layout.add_page();
        detail_y = NEW_PAGE_TOP;
    }
    layout.text(
        TEXT_LEFT,
        detail_y,
        14.0,
        INK,
        Align::Left,
        "Detailed Entries".to_string(),
    );

    let detail_rows = entries
        .iter()
        .map(|e| {
            let profit = e.profit();
            vec![
                BodyCell::plain(e.date.format("%d-%b-%Y").to_string()),
                BodyCell::plain(e.vehicle_id.clone()),
                BodyCell::plain(e.driver_name.clone()),
                BodyCell::plain(currency.format_amount(e.income)),
                BodyCell::plain(currency.format_amount(e.total_expense())),
                BodyCell::emphasised(
                    currency.format_amount(profit),
                    profit_ink(profit, DETAIL_PROFIT_INK),
                ),
            ]
        })
        .collect();
    layout.table(
        detail_y + HEADING_TO_TABLE,
        &DETAIL_COLUMNS,
        &DETAIL_STYLE,
        detail_rows,
    );

    debug!(
        entries = entries.len(),
        pages = layout.pages.len(),
        "laid out statement"
    );

    Document {
        title: ctx.title.to_string(),
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
        pages: layout.pages,
    }
}
