//! Reduces the ratings collected on one axis to a single representative value.

use crate::error::ValidationError;
use crate::rating::Rating;
use serde::{Deserialize, Serialize};

/// Weight given to the gap between the highest rating and the mean.
pub const MAX_BIAS: f64 = 0.25;

/// Spread at which the range-sensitive blend stops using the plain mean.
pub const RANGE_SPREAD_THRESHOLD: u8 = 3;

/// Named aggregation policies. Callers pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationStrategy {
    /// `mean + 0.25 * (max - mean)`, unrounded. Empty input yields 0.
    #[default]
    MeanBiasedTowardMax,
    /// `round((max + 2*min) / 3)` when the spread is at least 3, otherwise
    /// `round(mean)`. Empty input yields 1.
    RangeSensitiveBlend,
}

impl AggregationStrategy {
    pub fn aggregate(&self, ratings: &[Rating]) -> f64 {
        let values: Vec<u8> = ratings.iter().map(|r| r.value()).collect();
        match self {
            AggregationStrategy::MeanBiasedTowardMax => mean_biased_toward_max(&values),
            AggregationStrategy::RangeSensitiveBlend => range_sensitive_blend(&values),
        }
    }

    /// Aggregate unchecked integers, rejecting anything outside 1-5.
    pub fn aggregate_values(&self, values: &[i64]) -> Result<f64, ValidationError> {
        let ratings = values
            .iter()
            .map(|&v| Rating::new(v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.aggregate(&ratings))
    }

    /// Value returned for an axis with no ratings.
    pub fn empty_value(&self) -> f64 {
        match self {
            AggregationStrategy::MeanBiasedTowardMax => 0.0,
            AggregationStrategy::RangeSensitiveBlend => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregationStrategy::MeanBiasedTowardMax => "mean-biased-toward-max",
            AggregationStrategy::RangeSensitiveBlend => "range-sensitive-blend",
        }
    }
}

fn mean(values: &[u8]) -> f64 {
    let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
    f64::from(sum) / values.len() as f64
}

fn mean_biased_toward_max(values: &[u8]) -> f64 {
    let Some(&max) = values.iter().max() else {
        return AggregationStrategy::MeanBiasedTowardMax.empty_value();
    };
    let mean = mean(values);
    mean + MAX_BIAS * (f64::from(max) - mean)
}

fn range_sensitive_blend(values: &[u8]) -> f64 {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return AggregationStrategy::RangeSensitiveBlend.empty_value();
    };
    if max - min >= RANGE_SPREAD_THRESHOLD {
        ((f64::from(max) + 2.0 * f64::from(min)) / 3.0).round()
    } else {
        mean(values).round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(values: &[i64]) -> Vec<Rating> {
        values.iter().map(|&v| Rating::new(v).unwrap()).collect()
    }

    #[test]
    fn test_empty_defaults_differ_per_strategy() {
        assert_eq!(AggregationStrategy::MeanBiasedTowardMax.aggregate(&[]), 0.0);
        assert_eq!(AggregationStrategy::RangeSensitiveBlend.aggregate(&[]), 1.0);
    }

    #[test]
    fn test_single_element_is_identity() {
        for v in 1..=5 {
            let input = ratings(&[v]);
            assert_eq!(
                AggregationStrategy::MeanBiasedTowardMax.aggregate(&input),
                v as f64
            );
            assert_eq!(
                AggregationStrategy::RangeSensitiveBlend.aggregate(&input),
                v as f64
            );
        }
    }

    #[test]
    fn test_mean_biased_scenario() {
        let value = AggregationStrategy::MeanBiasedTowardMax.aggregate(&ratings(&[5, 4, 4]));
        assert!((value - 4.5).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn test_mean_biased_is_not_rounded() {
        let value = AggregationStrategy::MeanBiasedTowardMax.aggregate(&ratings(&[1, 2]));
        // mean 1.5, max 2 -> 1.625
        assert!((value - 1.625).abs() < 1e-9);
    }

    #[test]
    fn test_range_sensitive_wide_spread() {
        let strategy = AggregationStrategy::RangeSensitiveBlend;
        assert_eq!(strategy.aggregate(&ratings(&[1, 5])), 2.0);
        // (4 + 2) / 3 = 2
        assert_eq!(strategy.aggregate(&ratings(&[1, 4, 4, 4])), 2.0);
    }

    #[test]
    fn test_range_sensitive_narrow_spread_uses_mean() {
        let strategy = AggregationStrategy::RangeSensitiveBlend;
        assert_eq!(strategy.aggregate(&ratings(&[3, 3, 3])), 3.0);
        // mean 3.5 rounds up
        assert_eq!(strategy.aggregate(&ratings(&[3, 4])), 4.0);
        assert_eq!(strategy.aggregate(&ratings(&[2, 3, 4])), 3.0);
    }

    #[test]
    fn test_aggregate_values_rejects_out_of_range() {
        let result = AggregationStrategy::MeanBiasedTowardMax.aggregate_values(&[3, 6]);
        assert_eq!(result, Err(ValidationError::RatingOutOfRange(6)));
        let ok = AggregationStrategy::RangeSensitiveBlend.aggregate_values(&[1, 5]);
        assert_eq!(ok, Ok(2.0));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&AggregationStrategy::RangeSensitiveBlend).unwrap();
        assert_eq!(json, "\"range-sensitive-blend\"");
        assert_eq!(
            AggregationStrategy::MeanBiasedTowardMax.name(),
            "mean-biased-toward-max"
        );
    }
}
