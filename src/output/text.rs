use super::{assessed_risk, axis_summary, format_score, AssessmentReport, OutputWriter};
use crate::error::Result;
use crate::rating::Axis;
use std::io::Write;

/// Short plain-text summary suitable for pasting into email or chat.
pub fn plain_text_summary(report: &AssessmentReport<'_>) -> String {
    let score = &report.score;
    let mut lines = vec![
        format!("Risk Assessment for {}", report.assessment.matter_name()),
        format!("Likelihood: {}", axis_summary(score, Axis::Likelihood)),
        format!("Severity: {}", axis_summary(score, Axis::Severity)),
        format!("Risk Value: {}", format_score(score.composite)),
        format!("Assessed Risk: {}", assessed_risk(score)),
    ];

    let rows = report.assessment.export_rows();
    if !rows.is_empty() {
        lines.push(String::new());
        lines.push("Factors:".to_string());
        lines.extend(rows.iter().map(|row| {
            format!(
                "- {} [{}] {}: {} ({})",
                row.axis,
                row.category_text(),
                row.explanation,
                row.rating_label,
                row.rating
            )
        }));
    }
    lines.join("\n")
}

pub struct TextWriter<W: Write> {
    writer: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TextWriter<W> {
    fn write_report(&mut self, report: &AssessmentReport<'_>) -> Result<()> {
        writeln!(self.writer, "{}", plain_text_summary(report))?;
        Ok(())
    }
}
