//! Maps a numeric score to a qualitative band.
//!
//! Two threshold conventions are supported. [`ClassificationRule::Inclusive`]
//! uses upper-inclusive cut-offs every four points and never reports an
//! invalid score. [`ClassificationRule::HalfOpen`] uses lower-inclusive ranges
//! and reports anything outside `[1, 25]` as invalid.
//!
//! Displayed scores are rounded before classification; the raw score is used
//! everywhere else.

use super::palette::HexColor;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskBand {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
    Extreme,
    Invalid,
}

impl RiskBand {
    /// Bands in ascending order, excluding [`RiskBand::Invalid`].
    pub const ORDERED: [RiskBand; 6] = [
        RiskBand::VeryLow,
        RiskBand::Low,
        RiskBand::Medium,
        RiskBand::High,
        RiskBand::VeryHigh,
        RiskBand::Extreme,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::VeryLow => "Very Low",
            RiskBand::Low => "Low",
            RiskBand::Medium => "Medium",
            RiskBand::High => "High",
            RiskBand::VeryHigh => "Very High",
            RiskBand::Extreme => "Extreme",
            RiskBand::Invalid => "Invalid Risk",
        }
    }

    /// Matrix cell colour for the band.
    pub fn color(&self) -> HexColor {
        match self {
            RiskBand::VeryLow => HexColor::new("#a8e6a3"),
            RiskBand::Low => HexColor::new("#d4f7a3"),
            RiskBand::Medium => HexColor::new("#f7f7a3"),
            RiskBand::High => HexColor::new("#f7d4a3"),
            RiskBand::VeryHigh => HexColor::new("#f7b8a3"),
            RiskBand::Extreme => HexColor::new("#f7a8a8"),
            RiskBand::Invalid => HexColor::WHITE,
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationRule {
    /// `<=4` Very Low, `<=8` Low, `<=12` Medium, `<=16` High, `<=20` Very High,
    /// otherwise Extreme.
    #[default]
    Inclusive,
    /// `[1,3)` Very Low, `[3,5)` Low, `[5,10)` Medium, `[10,15)` High,
    /// `[15,20)` Very High, `[20,25]` Extreme, otherwise Invalid Risk.
    HalfOpen,
}

const INCLUSIVE_THRESHOLDS: [(f64, RiskBand); 5] = [
    (4.0, RiskBand::VeryLow),
    (8.0, RiskBand::Low),
    (12.0, RiskBand::Medium),
    (16.0, RiskBand::High),
    (20.0, RiskBand::VeryHigh),
];

const HALF_OPEN_RANGES: [(f64, f64, RiskBand); 5] = [
    (1.0, 3.0, RiskBand::VeryLow),
    (3.0, 5.0, RiskBand::Low),
    (5.0, 10.0, RiskBand::Medium),
    (10.0, 15.0, RiskBand::High),
    (15.0, 20.0, RiskBand::VeryHigh),
];

impl ClassificationRule {
    pub fn classify(&self, score: f64) -> RiskBand {
        if score.is_nan() {
            return RiskBand::Invalid;
        }
        match self {
            ClassificationRule::Inclusive => INCLUSIVE_THRESHOLDS
                .iter()
                .find(|(upper, _)| score <= *upper)
                .map_or(RiskBand::Extreme, |(_, band)| *band),
            ClassificationRule::HalfOpen => {
                if (20.0..=25.0).contains(&score) {
                    return RiskBand::Extreme;
                }
                HALF_OPEN_RANGES
                    .iter()
                    .find(|(lower, upper, _)| score >= *lower && score < *upper)
                    .map_or(RiskBand::Invalid, |(_, _, band)| *band)
            }
        }
    }

    /// Band shown next to a displayed score: the score is rounded first.
    pub fn classify_displayed(&self, score: f64) -> RiskBand {
        self.classify(score.round())
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClassificationRule::Inclusive => "inclusive",
            ClassificationRule::HalfOpen => "half-open",
        }
    }
}
