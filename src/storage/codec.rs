//! JSON persistence format for assessments.
//!
//! Written records carry `"version": 1`. Records without a version are read as
//! the legacy shape, which differs in field names (`likelihoodRisks`,
//! `severityRisks`), may hold a single `category` string per factor, and in
//! its oldest form stores one bare `likelihood`/`impact` pair per matter.

use crate::assessment::{Assessment, RiskFactor};
use crate::error::{Result, RiskMatrixError};
use crate::rating::{Axis, Rating};
use serde::{Deserialize, Deserializer, Serialize};

pub const CURRENT_VERSION: u32 = 1;

/// Category given to factors converted from single-rating legacy records.
pub const LEGACY_OVERALL_CATEGORY: &str = "Overall";
const LEGACY_OVERALL_EXPLANATION: &str = "Imported from single-rating assessment";

/// Key reported in errors for data that did not come from a store.
const INLINE_KEY: &str = "<inline>";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAssessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    matter_name: String,
    #[serde(default, alias = "likelihoodRisks")]
    likelihood_factors: Vec<StoredFactor>,
    #[serde(default, alias = "severityRisks")]
    severity_factors: Vec<StoredFactor>,
    #[serde(default, skip_serializing)]
    likelihood: Option<i64>,
    #[serde(default, skip_serializing)]
    impact: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredFactor {
    #[serde(default, alias = "category", deserialize_with = "one_or_many")]
    categories: Vec<String>,
    explanation: String,
    rating: i64,
    // Derived from the rating; written for readers of the raw JSON, ignored on read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating_label: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(single) => vec![single],
        OneOrMany::Many(many) => many,
    })
}

impl StoredAssessment {
    fn from_assessment(assessment: &Assessment) -> Self {
        let factors = |axis: Axis| {
            assessment
                .factors(axis)
                .iter()
                .map(|factor| StoredFactor {
                    categories: factor.categories().to_vec(),
                    explanation: factor.explanation().to_string(),
                    rating: i64::from(factor.rating().value()),
                    rating_label: Some(factor.rating_label(axis).to_string()),
                })
                .collect()
        };
        Self {
            version: Some(CURRENT_VERSION),
            matter_name: assessment.matter_name().to_string(),
            likelihood_factors: factors(Axis::Likelihood),
            severity_factors: factors(Axis::Severity),
            likelihood: None,
            impact: None,
        }
    }

    fn into_assessment(self, key: &str) -> Result<Assessment> {
        if let Some(version) = self.version {
            if version > CURRENT_VERSION {
                return Err(RiskMatrixError::malformed(
                    key,
                    format!(
                        "unsupported format version {} (newest supported is {})",
                        version, CURRENT_VERSION
                    ),
                ));
            }
        }

        let mut assessment = Assessment::new(&self.matter_name)
            .map_err(|e| RiskMatrixError::malformed(key, e.to_string()))?;

        let single_rating = self.likelihood_factors.is_empty()
            && self.severity_factors.is_empty()
            && (self.likelihood.is_some() || self.impact.is_some());
        if single_rating {
            log::info!(
                "converting single-rating legacy record '{}'",
                self.matter_name
            );
            for (axis, value) in [
                (Axis::Likelihood, self.likelihood),
                (Axis::Severity, self.impact),
            ] {
                if let Some(value) = value {
                    let factor = StoredFactor {
                        categories: vec![LEGACY_OVERALL_CATEGORY.to_string()],
                        explanation: LEGACY_OVERALL_EXPLANATION.to_string(),
                        rating: value,
                        rating_label: None,
                    };
                    assessment.add_factor(axis, factor.into_factor(key)?);
                }
            }
            return Ok(assessment);
        }

        for (axis, stored) in [
            (Axis::Likelihood, self.likelihood_factors),
            (Axis::Severity, self.severity_factors),
        ] {
            for factor in stored {
                assessment.add_factor(axis, factor.into_factor(key)?);
            }
        }
        Ok(assessment)
    }
}

impl StoredFactor {
    fn into_factor(self, key: &str) -> Result<RiskFactor> {
        let malformed = |e: RiskMatrixError| RiskMatrixError::malformed(key, e.to_string());
        let rating = Rating::new(self.rating).map_err(|e| malformed(e.into()))?;
        RiskFactor::new(&self.categories, self.explanation, rating).map_err(malformed)
    }
}

/// Encode an assessment in the current persistence format.
pub fn serialize(assessment: &Assessment) -> Result<String> {
    to_json(&StoredAssessment::from_assessment(assessment))
}

/// Encode an assessment in the current persistence format, indented.
pub fn serialize_pretty(assessment: &Assessment) -> Result<String> {
    serde_json::to_string_pretty(&StoredAssessment::from_assessment(assessment))
        .map_err(|e| RiskMatrixError::malformed(INLINE_KEY, format!("encoding failed: {}", e)))
}

/// The persistence format as a JSON value, for callers that add fields.
pub fn to_value(assessment: &Assessment) -> Result<serde_json::Value> {
    serde_json::to_value(StoredAssessment::from_assessment(assessment))
        .map_err(|e| RiskMatrixError::malformed(INLINE_KEY, format!("encoding failed: {}", e)))
}

/// Decode an assessment, accepting both the versioned and the legacy shape.
pub fn deserialize(json: &str) -> Result<Assessment> {
    decode(INLINE_KEY, json)
}

/// Encode a list of assessments for the shared-list layout.
pub fn serialize_list(assessments: &[Assessment]) -> Result<String> {
    let stored: Vec<StoredAssessment> = assessments
        .iter()
        .map(StoredAssessment::from_assessment)
        .collect();
    to_json(&stored)
}

pub(crate) fn decode(key: &str, json: &str) -> Result<Assessment> {
    let stored: StoredAssessment = serde_json::from_str(json)
        .map_err(|e| RiskMatrixError::malformed(key, e.to_string()))?;
    stored.into_assessment(key)
}

pub(crate) fn decode_list(key: &str, json: &str) -> Result<Vec<Assessment>> {
    let stored: Vec<StoredAssessment> = serde_json::from_str(json)
        .map_err(|e| RiskMatrixError::malformed(key, e.to_string()))?;
    stored
        .into_iter()
        .map(|record| record.into_assessment(key))
        .collect()
}

/// One entry of a stored list, decoded on its own.
#[derive(Debug)]
pub(crate) struct ListRecord {
    /// `matterName` as written, when the entry carries one.
    pub(crate) matter_name: Option<String>,
    pub(crate) assessment: Result<Assessment>,
}

impl ListRecord {
    /// Matter name of the decoded record, or as written for a broken one.
    pub(crate) fn name(&self) -> Option<&str> {
        match &self.assessment {
            Ok(assessment) => Some(assessment.matter_name()),
            Err(_) => self.matter_name.as_deref(),
        }
    }
}

/// Decode a stored list entry by entry so one bad record does not hide the
/// rest. Only a list that is not a JSON array at all is an error.
pub(crate) fn decode_records(key: &str, json: &str) -> Result<Vec<ListRecord>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| RiskMatrixError::malformed(key, e.to_string()))?;
    Ok(values
        .into_iter()
        .map(|value| {
            let matter_name = value
                .get("matterName")
                .and_then(serde_json::Value::as_str)
                .map(|name| name.trim().to_string());
            let assessment = serde_json::from_value::<StoredAssessment>(value)
                .map_err(|e| RiskMatrixError::malformed(key, e.to_string()))
                .and_then(|stored| stored.into_assessment(key));
            ListRecord {
                matter_name,
                assessment,
            }
        })
        .collect())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| RiskMatrixError::malformed(INLINE_KEY, format!("encoding failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn r(v: i64) -> Rating {
        Rating::new(v).unwrap()
    }

    fn sample() -> Assessment {
        let mut a = Assessment::new("Acme Supply Dispute").unwrap();
        a.add_factor(
            Axis::Likelihood,
            RiskFactor::new(["Prior Commitment"], "Signed LOI", r(4)).unwrap(),
        );
        a.add_factor(
            Axis::Likelihood,
            RiskFactor::new(["Defensibility"], "Thin record", r(2)).unwrap(),
        );
        a.add_factor(
            Axis::Severity,
            RiskFactor::new(["Financial", "Reputational"], "Press interest", r(5)).unwrap(),
        );
        a
    }

    #[test]
    fn test_round_trip() {
        let original = sample();
        let json = serialize(&original).unwrap();
        assert_eq!(deserialize(&json).unwrap(), original);
    }

    #[test]
    fn test_written_shape() {
        let json = serialize(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["matterName"], "Acme Supply Dispute");
        assert_eq!(value["likelihoodFactors"][1]["ratingLabel"], "Strong");
        assert_eq!(value["severityFactors"][0]["categories"][1], "Reputational");
        assert!(value.get("likelihood").is_none());
    }

    #[test]
    fn test_pretty_output_reads_back() {
        let pretty = serialize_pretty(&sample()).unwrap();
        assert!(pretty.contains("\n  \"matterName\": \"Acme Supply Dispute\""));
        assert_eq!(deserialize(&pretty).unwrap(), sample());
    }

    #[test]
    fn test_reads_unversioned_legacy_shape() {
        let legacy = indoc! {r#"
            {
              "matterName": "Old Matter",
              "likelihoodRisks": [
                {"categories": ["Legal Requirements"], "explanation": "Statute", "rating": 3, "ratingLabel": "Possible"}
              ],
              "severityRisks": [
                {"category": "Financial", "explanation": "Fine", "rating": 4, "ratingLabel": "Major"}
              ]
            }
        "#};
        let assessment = deserialize(legacy).unwrap();
        assert_eq!(assessment.matter_name(), "Old Matter");
        assert_eq!(assessment.factors(Axis::Likelihood).len(), 1);
        assert_eq!(
            assessment.factors(Axis::Severity)[0].categories(),
            ["Financial"]
        );
    }

    #[test]
    fn test_reads_single_rating_legacy_record() {
        let legacy = r#"{"matterName":"Quick","likelihood":4,"impact":2,"riskValue":8}"#;
        let assessment = deserialize(legacy).unwrap();
        let likelihood = &assessment.factors(Axis::Likelihood)[0];
        assert_eq!(likelihood.rating().value(), 4);
        assert_eq!(likelihood.categories(), [LEGACY_OVERALL_CATEGORY]);
        assert_eq!(assessment.factors(Axis::Severity)[0].rating().value(), 2);
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let err = deserialize("{not json").unwrap_err();
        assert!(matches!(err, RiskMatrixError::MalformedData { .. }));
    }

    #[test]
    fn test_out_of_range_rating_is_malformed() {
        let json = r#"{"version":1,"matterName":"M","likelihoodFactors":[{"categories":["Financial"],"explanation":"x","rating":9}],"severityFactors":[]}"#;
        let err = deserialize(json).unwrap_err();
        assert!(matches!(err, RiskMatrixError::MalformedData { .. }));
        assert!(err.to_string().contains("outside the range"));
    }

    #[test]
    fn test_future_version_is_rejected() {
        let json = r#"{"version":7,"matterName":"M","likelihoodFactors":[],"severityFactors":[]}"#;
        let err = deserialize(json).unwrap_err();
        assert!(err.to_string().contains("unsupported format version 7"));
    }

    #[test]
    fn test_empty_explanation_in_stored_data_is_malformed() {
        let json = r#"{"matterName":"M","likelihoodRisks":[{"categories":["A"],"explanation":" ","rating":2}]}"#;
        assert!(matches!(
            deserialize(json),
            Err(RiskMatrixError::MalformedData { .. })
        ));
    }

    #[test]
    fn test_records_decode_independently() {
        let json = r#"[{"matterName":"Good","likelihood":2,"impact":3},
                       {"matterName":"Bad","likelihood":9,"impact":3},
                       {"explanation":"no name"}]"#;
        let records = decode_records("savedAssessments", json).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].matter_name.as_deref(), Some("Good"));
        assert!(records[0].assessment.is_ok());
        assert_eq!(records[1].matter_name.as_deref(), Some("Bad"));
        assert!(matches!(
            records[1].assessment,
            Err(RiskMatrixError::MalformedData { .. })
        ));
        assert_eq!(records[2].matter_name, None);

        assert!(decode_records("savedAssessments", "{}").is_err());
    }

    #[test]
    fn test_list_round_trip() {
        let list = vec![sample(), Assessment::new("Empty").unwrap()];
        let json = serialize_list(&list).unwrap();
        assert_eq!(decode_list("savedAssessments", &json).unwrap(), list);
    }
}
