//! Rating vocabulary: axes, the 1-5 rating scale and the label catalogs.
//!
//! Two fixed catalogs map labels to ratings, one per axis. Likelihood factors
//! tagged with the `Defensibility` category use an inverted catalog in which a
//! stronger position reads as a lower risk value; the integer range is the same.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category whose likelihood factors are rated on the defensibility scale.
pub const DEFENSIBILITY: &str = "Defensibility";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// One of the two independent rating dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Likelihood,
    /// Also called "impact".
    #[serde(alias = "impact")]
    Severity,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Likelihood, Axis::Severity];

    /// Label used in tables and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Likelihood => "Likelihood",
            Axis::Severity => "Severity",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "likelihood" => Ok(Axis::Likelihood),
            "severity" | "impact" => Ok(Axis::Severity),
            other => Err(format!(
                "unknown axis '{}': expected likelihood, severity or impact",
                other
            )),
        }
    }
}

/// A rating guaranteed to lie in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: Rating = Rating(MIN_RATING);
    pub const MAX: Rating = Rating(MAX_RATING);

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(ValidationError::RatingOutOfRange(value))
        }
    }

    /// Round and clamp an aggregate axis value onto the scale.
    pub fn nearest(value: f64) -> Self {
        if value.is_nan() {
            return Rating::MIN;
        }
        let rounded = value.round().clamp(f64::from(MIN_RATING), f64::from(MAX_RATING));
        Rating(rounded as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// All ratings in ascending order.
    pub fn all() -> impl DoubleEndedIterator<Item = Rating> {
        (MIN_RATING..=MAX_RATING).map(Rating)
    }
}

impl TryFrom<i64> for Rating {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingOption {
    pub label: &'static str,
    pub value: u8,
}

const LIKELIHOOD_OPTIONS: [RatingOption; 5] = [
    RatingOption { label: "Rare", value: 1 },
    RatingOption { label: "Unlikely", value: 2 },
    RatingOption { label: "Possible", value: 3 },
    RatingOption { label: "Likely", value: 4 },
    RatingOption { label: "Almost Certain", value: 5 },
];

const SEVERITY_OPTIONS: [RatingOption; 5] = [
    RatingOption { label: "Insignificant", value: 1 },
    RatingOption { label: "Minor", value: 2 },
    RatingOption { label: "Significant", value: 3 },
    RatingOption { label: "Major", value: 4 },
    RatingOption { label: "Severe", value: 5 },
];

// Inverted perspective: a very strong defence is the lowest risk.
const DEFENSIBILITY_OPTIONS: [RatingOption; 5] = [
    RatingOption { label: "Very Strong", value: 1 },
    RatingOption { label: "Strong", value: 2 },
    RatingOption { label: "Moderate", value: 3 },
    RatingOption { label: "Weak", value: 4 },
    RatingOption { label: "Very Weak", value: 5 },
];

/// Which label catalog a rating is read against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingScale {
    Likelihood,
    Severity,
    Defensibility,
}

impl RatingScale {
    pub fn options(&self) -> &'static [RatingOption] {
        match self {
            RatingScale::Likelihood => &LIKELIHOOD_OPTIONS,
            RatingScale::Severity => &SEVERITY_OPTIONS,
            RatingScale::Defensibility => &DEFENSIBILITY_OPTIONS,
        }
    }

    /// The scale a factor on `axis` tagged with `categories` is rated against.
    pub fn for_factor<S: AsRef<str>>(axis: Axis, categories: &[S]) -> Self {
        match axis {
            Axis::Likelihood
                if categories
                    .iter()
                    .any(|c| c.as_ref().eq_ignore_ascii_case(DEFENSIBILITY)) =>
            {
                RatingScale::Defensibility
            }
            Axis::Likelihood => RatingScale::Likelihood,
            Axis::Severity => RatingScale::Severity,
        }
    }

    pub fn label(&self, rating: Rating) -> &'static str {
        self.options()
            .iter()
            .find(|opt| opt.value == rating.value())
            .map_or("Unknown", |opt| opt.label)
    }

    /// Parse either a numeric rating ("4") or a label ("Likely", case-insensitive).
    pub fn parse(&self, input: &str) -> Result<Rating, ValidationError> {
        let trimmed = input.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Rating::new(value);
        }
        self.options()
            .iter()
            .find(|opt| opt.label.eq_ignore_ascii_case(trimmed))
            .map(|opt| Rating(opt.value))
            .ok_or_else(|| ValidationError::UnknownRatingLabel(trimmed.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            RatingScale::Likelihood => "Likelihood",
            RatingScale::Severity => "Severity",
            RatingScale::Defensibility => "Defensibility",
        }
    }
}

pub const DEFAULT_LIKELIHOOD_CATEGORIES: [&str; 9] = [
    "Legal Requirements",
    "Prior Commitment",
    "3rd Party Rights",
    DEFENSIBILITY,
    "Regulatory Interest",
    "Regulatory Engagement",
    "Enforcement History",
    "Discoverability",
    "Market Practices",
];

pub const DEFAULT_SEVERITY_CATEGORIES: [&str; 6] = [
    "Financial",
    "Consumer Protection",
    "Reputational",
    "Operational",
    "Compliance",
    "Legal Exposure",
];

/// Known category names per axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    pub likelihood: Vec<String>,
    pub severity: Vec<String>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            likelihood: DEFAULT_LIKELIHOOD_CATEGORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            severity: DEFAULT_SEVERITY_CATEGORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CategoryCatalog {
    pub fn categories(&self, axis: Axis) -> &[String] {
        match axis {
            Axis::Likelihood => &self.likelihood,
            Axis::Severity => &self.severity,
        }
    }

    pub fn is_known(&self, axis: Axis, category: &str) -> bool {
        self.categories(axis)
            .iter()
            .any(|known| known.eq_ignore_ascii_case(category.trim()))
    }

    /// Categories in `candidates` that the catalog does not list for `axis`.
    pub fn unknown<'a, S: AsRef<str>>(&self, axis: Axis, candidates: &'a [S]) -> Vec<&'a str> {
        candidates
            .iter()
            .map(AsRef::as_ref)
            .filter(|c| !self.is_known(axis, c))
            .collect()
    }
}
