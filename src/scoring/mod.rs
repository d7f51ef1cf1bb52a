//! Risk scoring: per-axis aggregation, composite score, band classification
//! and placement on the matrix and spectrum.
//!
//! Everything here is a pure function of the ratings and the chosen
//! [`ScoringPolicy`].

pub mod aggregator;
pub mod classifier;
pub mod matrix;
pub mod palette;
pub mod spectrum;

pub use aggregator::AggregationStrategy;
pub use classifier::{ClassificationRule, RiskBand};
pub use matrix::{Highlight, MatrixCell, RiskMatrix};
pub use palette::{score_color, HexColor, SCORE_PALETTE};
pub use spectrum::SpectrumScale;

use crate::rating::Rating;
use serde::{Deserialize, Serialize};

/// The strategy choices that determine how an assessment is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoringPolicy {
    #[serde(default)]
    pub aggregation: AggregationStrategy,
    #[serde(default)]
    pub classification: ClassificationRule,
    #[serde(default)]
    pub spectrum: SpectrumScale,
}

impl ScoringPolicy {
    pub fn new(
        aggregation: AggregationStrategy,
        classification: ClassificationRule,
        spectrum: SpectrumScale,
    ) -> Self {
        Self {
            aggregation,
            classification,
            spectrum,
        }
    }

    pub fn score(&self, likelihood: &[Rating], severity: &[Rating]) -> AssessmentScore {
        let likelihood_value = self.aggregation.aggregate(likelihood);
        let severity_value = self.aggregation.aggregate(severity);
        let composite = likelihood_value * severity_value;
        let displayed = composite.round();

        let band = self.classification.classify(displayed);
        log::debug!(
            "scored {} likelihood / {} severity ratings: {:.3} x {:.3} = {:.3} ({})",
            likelihood.len(),
            severity.len(),
            likelihood_value,
            severity_value,
            composite,
            band
        );

        AssessmentScore {
            likelihood: likelihood_value,
            severity: severity_value,
            composite,
            displayed_score: displayed as i64,
            band,
            band_color: band.color(),
            score_color: score_color(composite),
            highlight: Highlight::from_aggregates(likelihood_value, severity_value),
            spectrum_position: self.spectrum.position(composite),
            likelihood_count: likelihood.len(),
            severity_count: severity.len(),
            has_factors: !likelihood.is_empty() || !severity.is_empty(),
        }
    }

    pub fn matrix(&self) -> RiskMatrix {
        RiskMatrix::build(self.classification)
    }
}

/// Derived scoring result. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentScore {
    /// Likelihood axis aggregate.
    pub likelihood: f64,
    /// Severity axis aggregate.
    pub severity: f64,
    /// Raw product of the axis aggregates.
    pub composite: f64,
    /// Composite rounded for display.
    pub displayed_score: i64,
    /// Band of the displayed score.
    pub band: RiskBand,
    pub band_color: HexColor,
    pub score_color: HexColor,
    pub highlight: Highlight,
    /// Fraction along the spectrum, from the raw composite.
    pub spectrum_position: f64,
    pub likelihood_count: usize,
    pub severity_count: usize,
    pub has_factors: bool,
}

impl AssessmentScore {
    /// Whether both axes carry at least one rating.
    pub fn is_complete(&self) -> bool {
        self.likelihood_count > 0 && self.severity_count > 0
    }

    /// The band label shown on the spectrum, or `N/A` before anything scores.
    pub fn spectrum_label(&self) -> &'static str {
        if !self.has_factors || self.composite <= 0.0 {
            "N/A"
        } else {
            self.band.label()
        }
    }
}
