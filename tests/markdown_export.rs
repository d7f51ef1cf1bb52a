//! Exact markdown output for exported assessments.

use indoc::indoc;
use pretty_assertions::assert_eq;
use riskmatrix::output::{markdown_table, AssessmentReport, MarkdownWriter, OutputWriter};
use riskmatrix::{Assessment, Axis, Rating, RiskFactor, ScoringPolicy};

fn factor(categories: &[&str], explanation: &str, rating: i64) -> RiskFactor {
    RiskFactor::new(categories, explanation, Rating::new(rating).unwrap()).unwrap()
}

#[test]
fn test_two_factor_export_matches_documented_format() {
    let mut assessment = Assessment::new("Vendor Contract").unwrap();
    assessment.add_factor(Axis::Likelihood, factor(&["Financial"], "Late payments", 3));
    assessment.add_factor(Axis::Severity, factor(&["Operational"], "Line stoppage", 4));

    let expected = indoc! {"
        | Type | Category | Explanation | Risk Rating |
        | --- | --- | --- | --- |
        | Likelihood | Financial | Late payments | Possible (3) |
        | Severity | Operational | Line stoppage | Major (4) |"};
    assert_eq!(markdown_table(&assessment), expected);
}

#[test]
fn test_likelihood_rows_come_first_regardless_of_entry_order() {
    let mut assessment = Assessment::new("Order").unwrap();
    assessment.add_factor(Axis::Severity, factor(&["Financial"], "Fine", 5));
    assessment.add_factor(Axis::Likelihood, factor(&["Legal Requirements"], "Statute", 1));
    assessment.add_factor(
        Axis::Likelihood,
        factor(&["Regulatory Interest", "Discoverability"], "Open inquiry", 4),
    );

    let table = markdown_table(&assessment);
    let rows: Vec<&str> = table.lines().skip(2).collect();
    assert_eq!(
        rows,
        vec![
            "| Likelihood | Legal Requirements | Statute | Rare (1) |",
            "| Likelihood | Regulatory Interest, Discoverability | Open inquiry | Likely (4) |",
            "| Severity | Financial | Fine | Severe (5) |",
        ]
    );
    assert!(!table.ends_with('\n'));
}

#[test]
fn test_report_bolds_highlighted_matrix_cell() {
    let mut assessment = Assessment::new("Scenario").unwrap();
    for rating in [5, 4, 4] {
        assessment.add_factor(Axis::Likelihood, factor(&["Prior Commitment"], "Signed", rating));
    }
    assessment.add_factor(Axis::Severity, factor(&["Financial"], "Exposure", 3));

    let report = AssessmentReport::new(&assessment, ScoringPolicy::default());
    let mut buffer = Vec::new();
    MarkdownWriter::new(&mut buffer).write_report(&report).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert!(text.contains("| Risk Value | 13.50 |"));
    assert!(text.contains("| Displayed Score | 14 |"));
    assert!(text.contains("| Assessed Risk | High |"));
    assert!(text.contains("**15 High**"));
}
