//! Rendering assessments for people and for other tools.
//!
//! Every format is produced by an [`OutputWriter`] over any `Write`, so the
//! same code path serves stdout, files and the clipboard.

mod clipboard;
pub mod json;
pub mod markdown;
pub mod terminal;
pub mod text;

pub use clipboard::copy_to_clipboard;
pub use json::JsonWriter;
pub use markdown::{markdown_row, markdown_table, MarkdownWriter};
pub use terminal::TerminalWriter;
pub use text::{plain_text_summary, TextWriter};

use crate::assessment::Assessment;
use crate::error::{Result, RiskMatrixError};
use crate::formatting::FormattingConfig;
use crate::rating::{Axis, Rating, RatingScale};
use crate::scoring::{AssessmentScore, ScoringPolicy};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Markdown,
    Json,
    Text,
}

/// An assessment together with its score under one policy.
#[derive(Debug, Clone)]
pub struct AssessmentReport<'a> {
    pub assessment: &'a Assessment,
    pub policy: ScoringPolicy,
    pub score: AssessmentScore,
    pub generated: DateTime<Utc>,
}

impl<'a> AssessmentReport<'a> {
    pub fn new(assessment: &'a Assessment, policy: ScoringPolicy) -> Self {
        Self::at(assessment, policy, Utc::now())
    }

    /// Build a report with a fixed timestamp.
    pub fn at(assessment: &'a Assessment, policy: ScoringPolicy, generated: DateTime<Utc>) -> Self {
        Self {
            assessment,
            policy,
            score: assessment.score(&policy),
            generated,
        }
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AssessmentReport<'_>) -> Result<()>;
}

pub fn create_writer<'w, W: Write + 'w>(
    format: OutputFormat,
    writer: W,
    formatting: FormattingConfig,
) -> Box<dyn OutputWriter + 'w> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer, formatting)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Text => Box::new(TextWriter::new(writer)),
    }
}

/// Render a report to a string in the given format.
pub fn render(
    format: OutputFormat,
    report: &AssessmentReport<'_>,
    formatting: FormattingConfig,
) -> Result<String> {
    let mut buffer = Vec::new();
    create_writer(format, &mut buffer, formatting).write_report(report)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write rendered output to `path`, creating parent directories, or to stdout.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|e| RiskMatrixError::from_io_error(e, Some(parent.to_path_buf())))?;
            }
            fs::write(path, content)
                .map_err(|e| RiskMatrixError::from_io_error(e, Some(path.to_path_buf())))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(handle)?;
            }
        }
    }
    Ok(())
}

/// `4.50 (Almost Certain)`, or `N/A` for an axis without ratings.
pub(crate) fn axis_summary(score: &AssessmentScore, axis: Axis) -> String {
    let (value, count) = match axis {
        Axis::Likelihood => (score.likelihood, score.likelihood_count),
        Axis::Severity => (score.severity, score.severity_count),
    };
    if count == 0 {
        return "N/A".to_string();
    }
    let scale = match axis {
        Axis::Likelihood => RatingScale::Likelihood,
        Axis::Severity => RatingScale::Severity,
    };
    format!("{:.2} ({})", value, scale.label(Rating::nearest(value)))
}

pub(crate) fn format_score(value: f64) -> String {
    format!("{:.2}", value)
}

/// Band label for summaries; `N/A` until both axes are rated.
pub(crate) fn assessed_risk(score: &AssessmentScore) -> &'static str {
    if score.is_complete() {
        score.band.label()
    } else {
        "N/A"
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_axis_summary_na_without_ratings() {
        let empty = Assessment::new("Empty").unwrap();
        let report = AssessmentReport::new(&empty, ScoringPolicy::default());
        assert_eq!(axis_summary(&report.score, Axis::Likelihood), "N/A");
        assert_eq!(assessed_risk(&report.score), "N/A");
    }

    #[test]
    fn test_axis_summary_uses_nearest_label() {
        let assessment = two_factor_assessment();
        let report = AssessmentReport::new(&assessment, ScoringPolicy::default());
        assert_eq!(axis_summary(&report.score, Axis::Likelihood), "3.00 (Possible)");
        assert_eq!(axis_summary(&report.score, Axis::Severity), "4.00 (Major)");
        assert_eq!(assessed_risk(&report.score), "Medium");
    }

    #[test]
    fn test_write_output_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("nested").join("subdirs").join("report.md");

        write_output("# Report", Some(&nested_path)).unwrap();

        assert_eq!(fs::read_to_string(&nested_path).unwrap(), "# Report");
    }

    #[test]
    fn test_render_every_format() {
        let assessment = two_factor_assessment();
        let report = AssessmentReport::at(&assessment, ScoringPolicy::default(), fixed_time());
        for format in [
            OutputFormat::Terminal,
            OutputFormat::Markdown,
            OutputFormat::Json,
            OutputFormat::Text,
        ] {
            let rendered = render(format, &report, FormattingConfig::plain()).unwrap();
            assert!(
                rendered.contains("Acme Supply Dispute"),
                "{format:?} output lacks the matter name"
            );
        }
    }
}
