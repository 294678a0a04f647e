//! Goodness-of-fit metrics for baseline models.
//!
//! All three return `NaN` when the metric is undefined for the data rather
//! than letting a division by zero leak `inf` into reports.

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// `NaN` when the actuals have no variance.
pub fn r2(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len();
    if n == 0 || n != predicted.len() {
        return f64::NAN;
    }
    let mean = actual.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return f64::NAN;
    }
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    1.0 - ss_res / ss_tot
}

/// Mean absolute percentage error as a fraction.
///
/// Rows with a zero actual are left out of the mean; `NaN` if every actual is zero.
pub fn mape(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() {
        return f64::NAN;
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for (a, p) in actual.iter().zip(predicted) {
        if *a == 0.0 {
            continue;
        }
        sum += (a - p).abs() / a.abs();
        count += 1;
    }
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// Normalized mean bias error, `mean(actual - predicted) / mean(actual)`.
///
/// Positive when the model under-predicts. `NaN` when the mean actual is zero.
pub fn nmbe(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len();
    if n == 0 || n != predicted.len() {
        return f64::NAN;
    }
    let mean_actual = actual.iter().sum::<f64>() / n as f64;
    if mean_actual == 0.0 {
        return f64::NAN;
    }
    let mean_bias = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| a - p)
        .sum::<f64>()
        / n as f64;
    mean_bias / mean_actual
}
