use serde::{Deserialize, Serialize};

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 25.0;

/// Anchor points (score, percent along the spectrum) for the calibrated scale.
/// Band boundaries sit closer together at the low end than a linear scale puts them.
const CALIBRATED_ANCHORS: [(f64, f64); 14] = [
    (1.0, 0.0),
    (2.0, 10.0),
    (3.0, 21.0),
    (4.0, 21.6),
    (5.0, 39.6),
    (6.0, 40.0),
    (8.0, 45.0),
    (9.0, 49.0),
    (10.0, 58.0),
    (12.0, 59.0),
    (15.0, 77.0),
    (16.0, 82.0),
    (20.0, 90.0),
    (25.0, 100.0),
];

/// How a raw score is placed along the continuous risk spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpectrumScale {
    /// Evenly spaced from 1 to 25.
    #[default]
    Linear,
    /// Piecewise-linear through fixed anchor points.
    Calibrated,
}

impl SpectrumScale {
    /// Fraction in `[0, 1]` along the spectrum. Out-of-domain scores clamp to
    /// the nearest end; NaN sits at the start.
    pub fn position(&self, score: f64) -> f64 {
        if score.is_nan() {
            return 0.0;
        }
        let score = score.clamp(MIN_SCORE, MAX_SCORE);
        match self {
            SpectrumScale::Linear => (score - MIN_SCORE) / (MAX_SCORE - MIN_SCORE),
            SpectrumScale::Calibrated => calibrated_percent(score) / 100.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpectrumScale::Linear => "linear",
            SpectrumScale::Calibrated => "calibrated",
        }
    }
}

fn calibrated_percent(score: f64) -> f64 {
    CALIBRATED_ANCHORS
        .windows(2)
        .find(|pair| score <= pair[1].0)
        .map_or(100.0, |pair| {
            let (lo_score, lo_pct) = pair[0];
            let (hi_score, hi_pct) = pair[1];
            lo_pct + (score - lo_score) / (hi_score - lo_score) * (hi_pct - lo_pct)
        })
}
