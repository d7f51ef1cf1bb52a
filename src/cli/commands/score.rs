use super::super::args::{RuleArg, ScoreFormat, ScoringArgs};
use super::super::setup::AppContext;
use crate::error::{RiskMatrixError, ValidationError};
use crate::output::json::to_pretty_json;
use crate::output::terminal::{matrix_table, score_summary, spectrum_bar};
use crate::rating::{Axis, Rating, RatingScale};
use crate::scoring::{AssessmentScore, RiskBand, ScoringPolicy};
use anyhow::Result;

/// Turn raw numbers into ratings, reporting every out-of-range value.
pub(crate) fn parse_ratings(values: &[i64]) -> std::result::Result<Vec<Rating>, RiskMatrixError> {
    let mut ratings = Vec::with_capacity(values.len());
    let mut errors: Vec<ValidationError> = Vec::new();
    for &value in values {
        match Rating::new(value) {
            Ok(rating) => ratings.push(rating),
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() {
        Ok(ratings)
    } else {
        Err(RiskMatrixError::validations(errors))
    }
}

pub(crate) fn score_values(
    policy: &ScoringPolicy,
    likelihood: &[i64],
    severity: &[i64],
) -> std::result::Result<AssessmentScore, RiskMatrixError> {
    let likelihood = parse_ratings(likelihood)?;
    let severity = parse_ratings(severity)?;
    Ok(policy.score(&likelihood, &severity))
}

pub fn handle_score(
    ctx: &AppContext,
    likelihood: &[i64],
    severity: &[i64],
    format: ScoreFormat,
    scoring: ScoringArgs,
) -> Result<()> {
    let policy = ctx.policy(scoring);
    let score = score_values(&policy, likelihood, severity)?;

    match format {
        ScoreFormat::Json => print!("{}", to_pretty_json(&score)?),
        ScoreFormat::Terminal => {
            let f = &ctx.formatting;
            println!("{}", score_summary(&score, f));
            println!();
            println!("{}", spectrum_bar(&score, f));
            println!();
            let highlight = score.is_complete().then_some(score.highlight);
            println!("{}", matrix_table(&policy.matrix(), highlight, f));
        }
    }
    Ok(())
}

pub fn handle_matrix(ctx: &AppContext, rule: Option<RuleArg>) -> Result<()> {
    let policy = ctx.policy(ScoringArgs {
        rule,
        ..ScoringArgs::default()
    });
    let f = &ctx.formatting;
    println!(
        "{}",
        f.header(&format!("Risk Matrix ({})", policy.classification.name()))
    );
    println!("{}", matrix_table(&policy.matrix(), None, f));
    println!();
    for band in RiskBand::ORDERED {
        println!("  {}", f.fill(&format!(" {:<9} ", band.label()), band.color()));
    }
    Ok(())
}

pub fn handle_ratings(ctx: &AppContext) -> Result<()> {
    let f = &ctx.formatting;
    for scale in [
        RatingScale::Likelihood,
        RatingScale::Defensibility,
        RatingScale::Severity,
    ] {
        println!("{}", f.header(scale.name()));
        for option in scale.options() {
            println!("  {}  {}", option.value, option.label);
        }
        println!();
    }

    let catalog = ctx.config.catalog();
    for axis in Axis::ALL {
        println!("{}", f.header(&format!("{} categories", axis)));
        for category in catalog.categories(axis) {
            println!("  {}", category);
        }
        println!();
    }
    if ctx.config.strict_categories() {
        println!("{}", f.dim("Categories outside these lists are rejected."));
    } else {
        println!("{}", f.dim("Other categories are accepted with a warning."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ratings_collects_every_error() {
        let err = parse_ratings(&[0, 3, 7]).unwrap_err();
        match err {
            RiskMatrixError::Validation { errors } => assert_eq!(
                errors,
                vec![
                    ValidationError::RatingOutOfRange(0),
                    ValidationError::RatingOutOfRange(7)
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_score_values_scenario() {
        let score = score_values(&ScoringPolicy::default(), &[5, 4, 4], &[3]).unwrap();
        assert!((score.composite - 13.5).abs() < 1e-9);
        assert_eq!(score.band, RiskBand::High);
    }
}
