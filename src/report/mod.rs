//! Reporting utilities: equation text, residuals, and formatted summaries.

pub mod equation;
pub mod format;

pub use equation::*;
pub use format::*;

use chrono::NaiveDate;

use crate::domain::{FittedModel, ObservationSet};
use crate::error::{BaselineError, Result};
use crate::fit::RegressionEngine;

/// A per-day fitted result.
#[derive(Debug, Clone, PartialEq)]
pub struct DayResidual {
    pub date: NaiveDate,
    pub actual: f64,
    pub fitted: f64,
    pub residual: f64,
}

/// Compute fitted values and residuals for each training day.
pub fn compute_residuals(set: &ObservationSet, model: &FittedModel) -> Result<Vec<DayResidual>> {
    let (x, y) = set.split(model.target())?;
    let fitted = RegressionEngine::new().predict_rows(model, &x)?;
    let actual = y
        .get(model.target())
        .ok_or_else(|| BaselineError::MissingFeature(model.target().to_string()))?;

    let mut out = Vec::with_capacity(set.len());
    for ((record, a), f) in set.records().iter().zip(actual).zip(fitted) {
        if !f.is_finite() {
            return Err(BaselineError::NonFiniteValue {
                column: model.target().to_string(),
                row: out.len(),
            });
        }
        out.push(DayResidual {
            date: record.date,
            actual: *a,
            fitted: f,
            residual: a - f,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residuals_follow_training_rows() {
        let mut set = ObservationSet::new(["temperature", "consumption"]).unwrap();
        for (d, t, c) in [(1, 1.0, 6.0), (2, 2.0, 6.0), (3, 3.0, 8.0), (4, 4.0, 12.0)] {
            set.push(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), vec![t, c]).unwrap();
        }
        let (x, y) = set.split("consumption").unwrap();
        let model = RegressionEngine::new().fit(&x, &y).unwrap();

        let residuals = compute_residuals(&set, &model).unwrap();
        // Least squares line is y = 3 + 2t.
        let want = [(5.0, 1.0), (7.0, -1.0), (9.0, -1.0), (11.0, 1.0)];
        assert_eq!(residuals.len(), 4);
        for (r, (fitted, residual)) in residuals.iter().zip(want) {
            assert!((r.fitted - fitted).abs() < 1e-9);
            assert!((r.residual - residual).abs() < 1e-9);
        }
        assert_eq!(residuals[2].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }
}
