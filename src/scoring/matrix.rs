use super::classifier::{ClassificationRule, RiskBand};
use super::palette::HexColor;
use crate::rating::Rating;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatrixCell {
    pub likelihood: Rating,
    pub severity: Rating,
    pub score: u8,
    pub band: RiskBand,
    pub color: HexColor,
}

/// The 5x5 likelihood/severity grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMatrix {
    /// Rows from likelihood 5 (top) down to 1, columns severity 1..=5.
    pub rows: Vec<Vec<MatrixCell>>,
}

impl RiskMatrix {
    pub fn build(rule: ClassificationRule) -> Self {
        let rows = Rating::all()
            .rev()
            .map(|likelihood| {
                Rating::all()
                    .map(|severity| {
                        let score = likelihood.value() * severity.value();
                        let band = rule.classify(f64::from(score));
                        MatrixCell {
                            likelihood,
                            severity,
                            score,
                            band,
                            color: band.color(),
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn cell(&self, likelihood: Rating, severity: Rating) -> Option<&MatrixCell> {
        self.cells()
            .find(|c| c.likelihood == likelihood && c.severity == severity)
    }

    pub fn cells(&self) -> impl Iterator<Item = &MatrixCell> {
        self.rows.iter().flatten()
    }
}

/// Matrix coordinates highlighted for a pair of axis aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub likelihood: Rating,
    pub severity: Rating,
}

impl Highlight {
    pub fn from_aggregates(likelihood: f64, severity: f64) -> Self {
        Self {
            likelihood: Rating::nearest(likelihood),
            severity: Rating::nearest(severity),
        }
    }

    pub fn matches(&self, cell: &MatrixCell) -> bool {
        self.likelihood == cell.likelihood && self.severity == cell.severity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(v: i64) -> Rating {
        Rating::new(v).unwrap()
    }

    #[test]
    fn test_matrix_shape_and_order() {
        let matrix = RiskMatrix::build(ClassificationRule::Inclusive);
        assert_eq!(matrix.rows.len(), 5);
        assert!(matrix.rows.iter().all(|row| row.len() == 5));
        assert_eq!(matrix.rows[0][0].likelihood, r(5));
        assert_eq!(matrix.rows[4][0].likelihood, r(1));
        assert_eq!(matrix.rows[0][4].score, 25);
        assert_eq!(matrix.rows[4][0].score, 1);
    }

    #[test]
    fn test_matrix_bands_follow_rule() {
        let inclusive = RiskMatrix::build(ClassificationRule::Inclusive);
        let cell = inclusive.cell(r(5), r(1)).unwrap();
        assert_eq!(cell.band, RiskBand::Low);

        let half_open = RiskMatrix::build(ClassificationRule::HalfOpen);
        let cell = half_open.cell(r(5), r(1)).unwrap();
        assert_eq!(cell.band, RiskBand::Medium);
        assert!(half_open.cells().all(|c| c.band != RiskBand::Invalid));
    }

    #[test]
    fn test_highlight_rounds_and_clamps() {
        let h = Highlight::from_aggregates(4.5, 0.0);
        assert_eq!(h.likelihood, r(5));
        assert_eq!(h.severity, r(1));

        let matrix = RiskMatrix::build(ClassificationRule::Inclusive);
        let highlighted: Vec<_> = matrix.cells().filter(|c| h.matches(c)).collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].score, 5);
    }
}
