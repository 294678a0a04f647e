//! Multiple linear regression for energy baselines.
//!
//! Given:
//! - feature columns `x_1 .. x_K` (temperature, humidity, dew point, ...)
//! - one target column `y` (daily consumption)
//!
//! we fit `y = b0 + Σ b_k x_k` by ordinary least squares and report r2,
//! NMBE and MAPE on the training rows.
//!
//! The fit works on mean-centered data: the slope problem is solved without
//! an intercept column and `b0` is recovered from the means afterwards. For
//! full-rank designs this is plain OLS. When features are collinear (a
//! perfectly linear dew point, a short baseline period) the pseudo-inverse
//! gives the minimum-norm slopes and the model records its reduced rank.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, info, warn};

use crate::domain::{Columns, FitMetrics, FittedModel, PredictionInput};
use crate::error::{BaselineError, Result};
use crate::math::{mape, nmbe, r2, solve_least_squares};

/// Stateless fit/predict entry point.
///
/// Every call works only on its arguments, so one engine can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionEngine;

impl RegressionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Fit `y ~ x` where `y` holds exactly one target column.
    pub fn fit(&self, x: &Columns, y: &Columns) -> Result<FittedModel> {
        let n = validate_inputs(x, y)?;
        let k = x.len();
        let (target, y_values) = match y.iter().next() {
            Some(col) => (col.name.clone(), col.values.as_slice()),
            None => return Err(BaselineError::InvalidTarget { found: 0 }),
        };

        debug!(response = %target, features = k, samples = n, "fitting baseline regression");

        let x_means: Vec<f64> = x.iter().map(|c| mean(&c.values)).collect();
        let y_mean = mean(y_values);

        // Constant columns are zeroed exactly so that rounding in their mean
        // cannot masquerade as a tiny amount of variation.
        let constant: Vec<bool> = x.iter().map(|c| is_constant(&c.values)).collect();
        if constant.iter().all(|c| *c) {
            return Err(BaselineError::SingularDesign { rank: 0, features: k });
        }

        let columns: Vec<&[f64]> = x.iter().map(|c| c.values.as_slice()).collect();
        let xc = DMatrix::from_fn(n, k, |i, j| {
            if constant[j] { 0.0 } else { columns[j][i] - x_means[j] }
        });
        let yc = DVector::from_iterator(n, y_values.iter().map(|v| v - y_mean));

        let solution = solve_least_squares(&xc, &yc)
            .ok_or(BaselineError::SingularDesign { rank: 0, features: k })?;
        if solution.rank == 0 {
            return Err(BaselineError::SingularDesign { rank: 0, features: k });
        }
        if solution.rank < k {
            warn!(
                rank = solution.rank,
                features = k,
                "rank-deficient design, coefficients are not unique (minimum-norm solution)"
            );
        }

        let slopes: Vec<f64> = solution.beta.iter().copied().collect();
        let intercept = y_mean
            - x_means
                .iter()
                .zip(&slopes)
                .map(|(m, b)| m * b)
                .sum::<f64>();
        if !intercept.is_finite() {
            return Err(BaselineError::SingularDesign {
                rank: solution.rank,
                features: k,
            });
        }

        let predicted: Vec<f64> = (0..n)
            .map(|i| intercept + columns.iter().zip(&slopes).map(|(c, b)| b * c[i]).sum::<f64>())
            .collect();

        let metrics = FitMetrics {
            r2: r2(y_values, &predicted),
            nmbe: nmbe(y_values, &predicted),
            mape: mape(y_values, &predicted),
        };

        let coefficients = x.names().map(str::to_string).zip(slopes).collect();
        let model = FittedModel::new(target, intercept, coefficients, metrics, n, solution.rank);

        info!(
            equation = %model.equation(),
            r2 = metrics.r2,
            nmbe = metrics.nmbe,
            mape = metrics.mape,
            "baseline regression fitted"
        );

        Ok(model)
    }

    /// `intercept + Σ coef[name] · inputs[name]`; keys the model does not use are ignored.
    pub fn predict(&self, model: &FittedModel, inputs: &PredictionInput) -> Result<f64> {
        let mut value = model.intercept();
        for (name, coef) in model.coefficients() {
            let x = *inputs
                .get(name)
                .ok_or_else(|| BaselineError::MissingFeature(name.clone()))?;
            if !x.is_finite() {
                return Err(BaselineError::NonFiniteInput(name.clone()));
            }
            value += coef * x;
        }
        Ok(value)
    }

    /// Predict every row of a feature table.
    pub fn predict_rows(&self, model: &FittedModel, x: &Columns) -> Result<Vec<f64>> {
        let mut columns = Vec::with_capacity(model.coefficients().len());
        for (name, coef) in model.coefficients() {
            let values = x
                .get(name)
                .ok_or_else(|| BaselineError::MissingFeature(name.clone()))?;
            columns.push((name.as_str(), *coef, values));
        }

        let n = columns.first().map(|(_, _, v)| v.len()).unwrap_or(0);
        for (name, _, values) in &columns {
            if values.len() != n {
                return Err(BaselineError::DimensionMismatch {
                    column: name.to_string(),
                    expected: n,
                    found: values.len(),
                });
            }
        }

        Ok((0..n)
            .map(|i| {
                model.intercept()
                    + columns
                        .iter()
                        .map(|(_, coef, values)| coef * values[i])
                        .sum::<f64>()
            })
            .collect())
    }
}

/// Check shapes and values; returns the common row count.
///
/// Lengths are compared before emptiness, so `EmptyInput("no samples")`
/// means every column is empty.
fn validate_inputs(x: &Columns, y: &Columns) -> Result<usize> {
    let n = x
        .n_rows()
        .ok_or(BaselineError::EmptyInput("no feature columns"))?;
    if y.len() != 1 {
        return Err(BaselineError::InvalidTarget { found: y.len() });
    }

    for col in x.iter().chain(y.iter()) {
        if col.values.len() != n {
            return Err(BaselineError::DimensionMismatch {
                column: col.name.clone(),
                expected: n,
                found: col.values.len(),
            });
        }
    }
    if n == 0 {
        return Err(BaselineError::EmptyInput("no samples"));
    }

    for col in x.iter().chain(y.iter()) {
        if let Some(row) = col.values.iter().position(|v| !v.is_finite()) {
            return Err(BaselineError::NonFiniteValue {
                column: col.name.clone(),
                row,
            });
        }
    }
    Ok(n)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
