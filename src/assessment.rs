//! Assessment records: the named unit that is saved, loaded and exported.

use crate::error::{Result, RiskMatrixError, ValidationError};
use crate::rating::{Axis, CategoryCatalog, Rating, RatingScale};
use crate::scoring::{AssessmentScore, ScoringPolicy};
use serde::Serialize;

/// One rated observation on an axis. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskFactor {
    categories: Vec<String>,
    explanation: String,
    rating: Rating,
}

impl RiskFactor {
    /// Build a factor, reporting every broken rule at once.
    ///
    /// Categories are trimmed and de-duplicated keeping the first occurrence.
    pub fn new<I, S>(categories: I, explanation: impl Into<String>, rating: Rating) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut errors = Vec::new();

        let mut unique: Vec<String> = Vec::new();
        let mut blank = false;
        for category in categories {
            let trimmed = category.as_ref().trim();
            if trimmed.is_empty() {
                blank = true;
            } else if !unique.iter().any(|c| c == trimmed) {
                unique.push(trimmed.to_string());
            }
        }
        if blank {
            errors.push(ValidationError::BlankCategory);
        }
        if unique.is_empty() {
            errors.push(ValidationError::MissingCategory);
        }

        let explanation = explanation.into();
        if explanation.trim().is_empty() {
            errors.push(ValidationError::EmptyExplanation);
        }

        if !errors.is_empty() {
            return Err(RiskMatrixError::validations(errors));
        }

        Ok(Self {
            categories: unique,
            explanation,
            rating,
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Label of the rating on the scale this factor uses for `axis`.
    pub fn rating_label(&self, axis: Axis) -> &'static str {
        RatingScale::for_factor(axis, &self.categories).label(self.rating)
    }
}

/// Check a factor's categories against the catalog.
///
/// Unknown categories are a validation error in strict mode and a logged
/// warning otherwise.
pub fn check_categories(
    catalog: &CategoryCatalog,
    axis: Axis,
    factor: &RiskFactor,
    strict: bool,
) -> Result<()> {
    let unknown = catalog.unknown(axis, factor.categories());
    if unknown.is_empty() {
        return Ok(());
    }
    if strict {
        let errors = unknown
            .into_iter()
            .map(|category| ValidationError::UnknownCategory {
                axis: axis.label().to_lowercase(),
                category: category.to_string(),
            })
            .collect();
        return Err(RiskMatrixError::validations(errors));
    }
    log::warn!(
        "{} factor uses categories outside the catalog: {}",
        axis,
        unknown.join(", ")
    );
    Ok(())
}

/// A named assessment: likelihood and severity factors in entry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    matter_name: String,
    likelihood_factors: Vec<RiskFactor>,
    severity_factors: Vec<RiskFactor>,
}

impl Assessment {
    pub fn new(matter_name: impl AsRef<str>) -> Result<Self> {
        let name = matter_name.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyMatterName.into());
        }
        Ok(Self {
            matter_name: name.to_string(),
            likelihood_factors: Vec::new(),
            severity_factors: Vec::new(),
        })
    }

    pub fn with_factors(
        matter_name: impl AsRef<str>,
        likelihood_factors: Vec<RiskFactor>,
        severity_factors: Vec<RiskFactor>,
    ) -> Result<Self> {
        let mut assessment = Self::new(matter_name)?;
        assessment.likelihood_factors = likelihood_factors;
        assessment.severity_factors = severity_factors;
        Ok(assessment)
    }

    pub fn matter_name(&self) -> &str {
        &self.matter_name
    }

    /// Append a factor. Factor lists only grow.
    pub fn add_factor(&mut self, axis: Axis, factor: RiskFactor) {
        match axis {
            Axis::Likelihood => self.likelihood_factors.push(factor),
            Axis::Severity => self.severity_factors.push(factor),
        }
    }

    pub fn factors(&self, axis: Axis) -> &[RiskFactor] {
        match axis {
            Axis::Likelihood => &self.likelihood_factors,
            Axis::Severity => &self.severity_factors,
        }
    }

    pub fn ratings(&self, axis: Axis) -> Vec<Rating> {
        self.factors(axis).iter().map(RiskFactor::rating).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.likelihood_factors.is_empty() && self.severity_factors.is_empty()
    }

    pub fn score(&self, policy: &ScoringPolicy) -> AssessmentScore {
        policy.score(
            &self.ratings(Axis::Likelihood),
            &self.ratings(Axis::Severity),
        )
    }

    /// Flat rows for table exports, likelihood factors first.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        Axis::ALL
            .into_iter()
            .flat_map(|axis| {
                self.factors(axis).iter().map(move |factor| ExportRow {
                    axis,
                    categories: factor.categories().to_vec(),
                    explanation: factor.explanation().to_string(),
                    rating_label: factor.rating_label(axis).to_string(),
                    rating: factor.rating().value(),
                })
            })
            .collect()
    }
}

/// One exported factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub axis: Axis,
    pub categories: Vec<String>,
    pub explanation: String,
    pub rating_label: String,
    pub rating: u8,
}

impl ExportRow {
    pub fn category_text(&self) -> String {
        self.categories.join(", ")
    }
}
