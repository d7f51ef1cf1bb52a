use super::{assessed_risk, axis_summary, format_score, AssessmentReport, OutputWriter};
use crate::assessment::Assessment;
use crate::error::Result;
use crate::formatting::FormattingConfig;
use crate::rating::{Axis, RatingScale};
use crate::scoring::{score_color, AssessmentScore, HexColor, Highlight, RiskMatrix};
use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use std::io::Write;

const SPECTRUM_WIDTH: usize = 40;

pub struct TerminalWriter<W: Write> {
    writer: W,
    formatting: FormattingConfig,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        Self { writer, formatting }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &AssessmentReport<'_>) -> Result<()> {
        let f = &self.formatting;
        writeln!(
            self.writer,
            "{}",
            f.header(&format!("Risk Assessment: {}", report.assessment.matter_name()))
        )?;
        writeln!(
            self.writer,
            "{}",
            f.dim(&format!(
                "Generated {}",
                report.generated.format("%Y-%m-%d %H:%M:%S UTC")
            ))
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", score_summary(&report.score, f))?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", spectrum_bar(&report.score, f))?;
        writeln!(self.writer)?;

        if report.assessment.is_empty() {
            writeln!(self.writer, "{}", f.dim("No factors recorded."))?;
        } else {
            writeln!(self.writer, "{}", factor_table(report.assessment, f))?;
        }
        writeln!(self.writer)?;

        let highlight = report.score.is_complete().then_some(report.score.highlight);
        writeln!(
            self.writer,
            "{}",
            f.header(&format!(
                "Risk Matrix ({})",
                report.policy.classification.name()
            ))
        )?;
        writeln!(
            self.writer,
            "{}",
            matrix_table(&report.policy.matrix(), highlight, f)
        )?;
        Ok(())
    }
}

/// Aggregates, composite and band, one per line.
pub fn score_summary(score: &AssessmentScore, formatting: &FormattingConfig) -> String {
    let displayed = if score.is_complete() {
        formatting.fill(
            &format!(" {} ", score.displayed_score),
            score.score_color,
        )
    } else {
        "N/A".to_string()
    };
    let band = if score.is_complete() {
        formatting.fill(&format!(" {} ", score.band.label()), score.band_color)
    } else {
        assessed_risk(score).to_string()
    };
    [
        format!("Likelihood:     {}", axis_summary(score, Axis::Likelihood)),
        format!("Severity:       {}", axis_summary(score, Axis::Severity)),
        format!("Risk Value:     {}", format_score(score.composite)),
        format!("Display Score:  {}", displayed),
        format!("Assessed Risk:  {}", band),
    ]
    .join("\n")
}

/// A one-line gradient from score 1 to 25 with a marker at the score's
/// spectrum position, followed by the spectrum label.
pub fn spectrum_bar(score: &AssessmentScore, formatting: &FormattingConfig) -> String {
    let last = SPECTRUM_WIDTH - 1;
    let marker = (score.has_factors && score.composite > 0.0)
        .then(|| (score.spectrum_position * last as f64).round() as usize)
        .map(|m| m.min(last));

    let mut bar = String::new();
    for i in 0..SPECTRUM_WIDTH {
        let at_marker = marker == Some(i);
        if formatting.use_color() {
            let color = score_color(1.0 + 24.0 * i as f64 / last as f64);
            bar.push_str(&formatting.fill(if at_marker { "|" } else { " " }, color));
        } else {
            bar.push(if at_marker { '|' } else { '-' });
        }
    }
    format!("1 [{}] 25  {}", bar, score.spectrum_label())
}

fn new_table(formatting: &FormattingConfig) -> Table {
    let mut table = Table::new();
    if formatting.use_color() {
        table.load_preset(UTF8_FULL).enforce_styling();
    } else {
        table.load_preset(ASCII_FULL).force_no_tty();
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn color_of(hex: HexColor) -> Color {
    let (r, g, b) = hex.rgb();
    Color::Rgb { r, g, b }
}

pub fn factor_table(assessment: &Assessment, formatting: &FormattingConfig) -> Table {
    let mut table = new_table(formatting);
    table.set_header(vec!["Type", "Category", "Explanation", "Risk Rating"]);
    for row in assessment.export_rows() {
        table.add_row(vec![
            Cell::new(row.axis.label()),
            Cell::new(row.category_text()),
            Cell::new(&row.explanation),
            Cell::new(format!("{} ({})", row.rating_label, row.rating)),
        ]);
    }
    table
}

/// The 5x5 grid, likelihood 5 at the top. The highlighted cell is bracketed.
pub fn matrix_table(
    matrix: &RiskMatrix,
    highlight: Option<Highlight>,
    formatting: &FormattingConfig,
) -> Table {
    let mut table = new_table(formatting);
    let mut header = vec![Cell::new("Likelihood \\ Severity")];
    header.extend(
        RatingScale::Severity
            .options()
            .iter()
            .map(|option| Cell::new(format!("{} ({})", option.label, option.value))),
    );
    table.set_header(header);

    for row in &matrix.rows {
        let Some(first) = row.first() else {
            continue;
        };
        let mut cells = vec![Cell::new(format!(
            "{} ({})",
            RatingScale::Likelihood.label(first.likelihood),
            first.likelihood
        ))];
        for cell in row {
            let highlighted = highlight.is_some_and(|h| h.matches(cell));
            let text = if highlighted {
                format!("[{} {}]", cell.score, cell.band.label())
            } else {
                format!("{} {}", cell.score, cell.band.label())
            };
            let mut rendered = Cell::new(text);
            if formatting.use_color() {
                rendered = rendered.fg(Color::Black).bg(color_of(cell.color));
            }
            if highlighted {
                rendered = rendered.add_attribute(Attribute::Bold);
            }
            cells.push(rendered);
        }
        table.add_row(cells);
    }
    table
}
