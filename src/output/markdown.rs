use super::{assessed_risk, axis_summary, format_score, AssessmentReport, OutputWriter};
use crate::assessment::{Assessment, ExportRow};
use crate::error::Result;
use crate::rating::{Axis, RatingScale};
use crate::scoring::RiskMatrix;
use std::io::Write;

const TABLE_HEADER: &str =
    "| Type | Category | Explanation | Risk Rating |\n| --- | --- | --- | --- |\n";

/// The factor table: header, separator, then one row per factor with
/// likelihood rows first. Rows are newline separated with no trailing newline.
pub fn markdown_table(assessment: &Assessment) -> String {
    let rows: Vec<String> = assessment.export_rows().iter().map(markdown_row).collect();
    format!("{}{}", TABLE_HEADER, rows.join("\n"))
}

pub fn markdown_row(row: &ExportRow) -> String {
    format!(
        "| {} | {} | {} | {} ({}) |",
        row.axis.label(),
        escape_cell(&row.category_text()),
        escape_cell(&row.explanation),
        row.rating_label,
        row.rating
    )
}

/// Escape pipes and turn line breaks into `<br>`. Backslashes directly in
/// front of either are doubled so they survive rendering.
fn escape_cell(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut backslashes = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                backslashes += 1;
                continue;
            }
            '|' => {
                escaped.push_str(&"\\".repeat(backslashes * 2));
                escaped.push_str("\\|");
            }
            '\r' | '\n' => {
                escaped.push_str(&"\\".repeat(backslashes * 2));
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("<br>");
            }
            other => {
                escaped.push_str(&"\\".repeat(backslashes));
                escaped.push(other);
            }
        }
        backslashes = 0;
    }
    escaped.push_str(&"\\".repeat(backslashes));
    escaped
}

/// Full markdown report: summary, factor table and the reference matrix.
pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &AssessmentReport<'_>) -> Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        self.write_factors(report)?;
        self.write_matrix(report)?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &AssessmentReport<'_>) -> Result<()> {
        writeln!(
            self.writer,
            "# Risk Assessment: {}",
            escape_cell(report.assessment.matter_name())
        )?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.generated.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &AssessmentReport<'_>) -> Result<()> {
        let score = &report.score;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        self.write_summary_row("Likelihood", &axis_summary(score, Axis::Likelihood))?;
        self.write_summary_row("Severity", &axis_summary(score, Axis::Severity))?;
        self.write_summary_row("Risk Value", &format_score(score.composite))?;
        self.write_summary_row("Displayed Score", &score.displayed_score.to_string())?;
        self.write_summary_row("Assessed Risk", assessed_risk(score))?;
        self.write_summary_row(
            "Scoring",
            &format!(
                "{} / {}",
                report.policy.aggregation.name(),
                report.policy.classification.name()
            ),
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary_row(&mut self, metric: &str, value: &str) -> Result<()> {
        writeln!(self.writer, "| {} | {} |", metric, value)?;
        Ok(())
    }

    fn write_factors(&mut self, report: &AssessmentReport<'_>) -> Result<()> {
        writeln!(self.writer, "## Factors")?;
        writeln!(self.writer)?;
        if report.assessment.is_empty() {
            writeln!(self.writer, "_No factors recorded._")?;
        } else {
            writeln!(self.writer, "{}", markdown_table(report.assessment))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_matrix(&mut self, report: &AssessmentReport<'_>) -> Result<()> {
        let matrix: RiskMatrix = report.policy.matrix();
        let highlight = report.score.is_complete().then_some(report.score.highlight);

        writeln!(self.writer, "## Risk Matrix")?;
        writeln!(self.writer)?;
        write!(self.writer, "| Likelihood \\ Severity |")?;
        for option in RatingScale::Severity.options() {
            write!(self.writer, " {} ({}) |", option.label, option.value)?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "|---|---|---|---|---|---|")?;

        for row in &matrix.rows {
            let Some(first) = row.first() else {
                continue;
            };
            write!(
                self.writer,
                "| {} ({}) |",
                RatingScale::Likelihood.label(first.likelihood),
                first.likelihood
            )?;
            for cell in row {
                if highlight.is_some_and(|h| h.matches(cell)) {
                    write!(self.writer, " **{} {}** |", cell.score, cell.band.label())?;
                } else {
                    write!(self.writer, " {} {} |", cell.score, cell.band.label())?;
                }
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }
}
