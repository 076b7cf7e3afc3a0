use crate::domain::model::Report;
use crate::utils::error::{AnalysisError, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

pub const REPORT_TITLE: &str = "Financial Health Report";
pub const EXPORT_FILENAME: &str = "financial_report.pdf";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 6.5;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 10.5;
const WRAP_COLUMNS: usize = 95;
pub const LINES_PER_PAGE: usize = 38;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub text: String,
    pub heading: bool,
}

impl ReportLine {
    fn heading(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            heading: true,
        }
    }

    fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            heading: false,
        }
    }
}

/// Flat scalar and string fields of the report, one `key: value` entry each,
/// wrapped to the page width. Collections are not rendered.
pub fn report_lines(report: &Report) -> Vec<ReportLine> {
    let m = &report.metrics;
    let fields: Vec<(&str, String)> = vec![
        ("report_id", report.report_id.clone()),
        ("revenue", m.revenue.to_string()),
        ("expense", m.expense.to_string()),
        ("profit", m.profit.to_string()),
        ("margin", m.margin.to_string()),
        ("health_score", m.health_score.to_string()),
        ("credit_score", m.credit_score.to_string()),
        ("risk_level", m.risk_level.to_string()),
        ("forecast", m.forecast.to_string()),
        ("benchmark", m.benchmark.to_string()),
        ("industry", m.industry.clone()),
        ("receivable", m.receivable.to_string()),
        ("payable", m.payable.to_string()),
        ("inventory", m.inventory.to_string()),
        ("loan_total", m.loan_total.to_string()),
        ("gst_collected", m.gst_collected.to_string()),
        ("gst_paid", m.gst_paid.to_string()),
        ("insight_source", report.insight_source.to_string()),
        ("ai_insights", report.ai_insights.clone()),
    ];

    let mut lines = vec![
        ReportLine::heading(REPORT_TITLE),
        ReportLine::body(format!(
            "Generated {}",
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        )),
        ReportLine::body(""),
    ];

    for (key, value) in fields {
        let entry = format!("{}: {}", key, value);
        for paragraph in entry.lines() {
            lines.extend(wrap(paragraph, WRAP_COLUMNS).into_iter().map(ReportLine::body));
        }
    }
    lines
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(width)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            let rest = word.split_off(split_at);
            out.push(word);
            word = rest;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

pub fn paginate(lines: &[ReportLine], per_page: usize) -> Vec<&[ReportLine]> {
    if lines.is_empty() {
        return vec![lines];
    }
    lines.chunks(per_page.max(1)).collect()
}

/// Builtin PDF fonts only cover a Latin character set.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

fn render_error(e: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::RenderError {
        message: e.to_string(),
    }
}

pub fn render_pdf(report: &Report) -> Result<Vec<u8>> {
    let lines = report_lines(report);
    let pages = paginate(&lines, LINES_PER_PAGE);

    let (doc, first_page, first_layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular: IndirectFontRef = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_error)?;
    let bold: IndirectFontRef = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_error)?;

    let mut first = Some((first_page, first_layer));
    for (index, page_lines) in pages.iter().enumerate() {
        let (page, layer) = match first.take() {
            Some(indices) => indices,
            None => doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Layer {}", index + 1),
            ),
        };
        let layer = doc.get_page(page).get_layer(layer);

        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
        for line in page_lines.iter() {
            let (size, font) = if line.heading {
                (TITLE_SIZE, &bold)
            } else {
                (BODY_SIZE, &regular)
            };
            layer.use_text(printable(&line.text), size, Mm(MARGIN_MM), Mm(y), font);
            y -= LINE_HEIGHT_MM;
        }
    }

    tracing::debug!("Rendered report {} on {} page(s)", report.report_id, pages.len());
    doc.save_to_bytes().map_err(render_error)
}
