use std::fmt;

use chrono::NaiveDate;

use crate::report::document::{Align, Document, Item, RowItem, TextItem};

const PT_TO_MM: f64 = 0.3528;
// Share of the em box above the baseline.
const ASCENT: f64 = 0.8;

const STYLE: &str = "@page { size: A4; margin: 0; }
body { margin: 0; font-family: Helvetica, Arial, sans-serif; background: #ffffff; }
.page { position: relative; overflow: hidden; page-break-after: always; break-after: page; }
.page:last-child { page-break-after: auto; break-after: auto; }
.t { position: absolute; white-space: nowrap; line-height: 1; }
.r { position: absolute; }
.c { position: absolute; box-sizing: border-box; overflow: hidden; white-space: nowrap; }";

/// `<prefix>_<yyyymmdd>.html`
pub fn report_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.html", prefix, date.format("%Y%m%d"))
}

/// Renders the laid-out document as a self-contained printable HTML page.
/// Output depends only on the document, so equal documents render to equal
/// bytes.
pub fn render_html(doc: &Document) -> String {
    HtmlDocument(doc).to_string()
}

struct HtmlDocument<'a>(&'a Document);

impl fmt::Display for HtmlDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.0;
        writeln!(f, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">")?;
        writeln!(f, "<title>{}</title>", escape(&doc.title))?;
        writeln!(f, "<style>\n{}\n</style>\n</head>\n<body>", STYLE)?;

        for page in &doc.pages {
            writeln!(
                f,
                "<section class=\"page\" data-page=\"{}\" style=\"width:{:.2}mm;height:{:.2}mm\">",
                page.number, doc.width, doc.height
            )?;
            for item in &page.items {
                match item {
                    Item::Text(text) => write_text(f, text)?,
                    Item::Rule(rule) => writeln!(
                        f,
                        "<div class=\"r\" style=\"left:{:.2}mm;top:{:.2}mm;width:{:.2}mm;border-top:{:.2}mm solid {}\"></div>",
                        rule.x1,
                        rule.y - rule.width / 2.0,
                        rule.x2 - rule.x1,
                        rule.width,
                        rule.color.hex()
                    )?,
                    Item::Row(row) => write_row(f, row)?,
                }
            }
            writeln!(f, "</section>")?;
        }

        writeln!(f, "</body>\n</html>")
    }
}

fn write_text(f: &mut fmt::Formatter<'_>, text: &TextItem) -> fmt::Result {
    let top = text.y - text.size * PT_TO_MM * ASCENT;
    let shift = match text.align {
        Align::Left => "",
        Align::Center => ";transform:translateX(-50%)",
        Align::Right => ";transform:translateX(-100%)",
    };
    writeln!(
        f,
        "<div class=\"t\" style=\"left:{:.2}mm;top:{:.2}mm;font-size:{:.1}pt;color:{}{}\">{}</div>",
        text.x,
        top,
        text.size,
        text.color.hex(),
        shift,
        escape(&text.content)
    )
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &RowItem) -> fmt::Result {
    let background = row
        .fill
        .map(|fill| format!(";background:{}", fill.hex()))
        .unwrap_or_default();
    for cell in &row.cells {
        let align = match cell.align {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        };
        let weight = if cell.bold { ";font-weight:bold" } else { "" };
        let lines: Vec<String> = cell.lines.iter().map(|l| escape(l)).collect();
        writeln!(
            f,
            "<div class=\"c\" style=\"left:{:.2}mm;top:{:.2}mm;width:{:.2}mm;height:{:.2}mm;line-height:{:.2}mm;padding:{:.2}mm;font-size:{:.1}pt;text-align:{};color:{};border:0.2mm solid {}{}{}\">{}</div>",
            cell.x,
            row.y,
            cell.width,
            row.height,
            row.line_height,
            row.padding,
            row.font_size,
            align,
            cell.color.hex(),
            row.border.hex(),
            background,
            weight,
            lines.join("<br>")
        )?;
    }
    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::Entry;
    use crate::report::currency::CurrencyFormat;
    use crate::report::document::{build_document, ReportContext};
    use crate::service::summary::compute_summary;

    fn document(entries: &[Entry]) -> Document {
        let currency = CurrencyFormat::default();
        let stats = compute_summary(entries);
        let ctx = ReportContext {
            title: "Cabs <&> Co",
            subtitle: "Monthly Statement",
            range_label: "All Time",
            generated_at: NaiveDate::from_ymd_opt(2024, 2, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            currency: &currency,
        };
        build_document(entries, &stats, &ctx)
    }

    #[test]
    fn test_report_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(report_filename("taxi_report", date), "taxi_report_20260307.html");
    }

    #[test]
    fn test_render_is_byte_identical() {
        let mut entry = Entry::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "KA01".to_string(),
            "Ravi".to_string(),
        );
        entry.income = 1000.0;
        let entries = vec![entry];
        assert_eq!(render_html(&document(&entries)), render_html(&document(&entries)));
    }

    #[test]
    fn test_render_escapes_and_marks_pages() {
        let html = render_html(&document(&[]));
        assert!(html.contains("<title>Cabs &lt;&amp;&gt; Co</title>"));
        assert!(html.contains("data-page=\"1\""));
        assert!(!html.contains("data-page=\"2\""));
        assert!(html.contains("Generated: 01 Feb 2024, 09:30"));
    }

    #[test]
    fn test_wrapped_cells_render_every_line() {
        let mut entry = Entry::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "KA01".to_string(),
            "Venkatasubramanian Krishnamurthy Iyer".to_string(),
        );
        entry.income = 1000.0;
        let html = render_html(&document(&[entry]));
        assert!(html.contains(">Venkatasubramanian<br>Krishnamurthy Iyer</div>"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
