//! Formatted terminal/log output for fitted baselines.
//!
//! We keep formatting code in one place so the fitting code stays clean and
//! output changes are localized.

use chrono::NaiveDate;

use crate::domain::FittedModel;
use crate::report::DayResidual;

/// Format the fit summary: equation, metrics and coefficient table.
pub fn format_fit_summary(model: &FittedModel) -> String {
    let mut out = String::new();

    out.push_str("=== Energy baseline ===\n");
    out.push_str(&format!("Record date: {}\n", model.record_date()));
    out.push_str(&format!("Samples: n={}\n", model.n_samples()));
    out.push_str(&format!("Equation: {}\n", model.equation()));

    let m = model.metrics();
    out.push_str("\nAccuracy:\n");
    out.push_str(&format!("- R2  : {}\n", fmt_metric(m.r2, 4)));
    out.push_str(&format!("- NMBE: {}\n", fmt_percent(m.nmbe)));
    out.push_str(&format!("- MAPE: {}\n", fmt_percent(m.mape)));

    out.push_str("\nCoefficients:\n");
    out.push_str(&format!("  {:<14} {:>12.4}\n", "(intercept)", model.intercept()));
    for (name, coef) in model.coefficients() {
        out.push_str(&format!("  {name:<14} {coef:>12.4}\n"));
    }
    if !model.is_unique() {
        out.push_str(&format!(
            "  note: rank {} < {} features; coefficients are not unique\n",
            model.rank(),
            model.coefficients().len()
        ));
    }

    out
}

/// Format a single-day prediction line.
pub fn format_prediction(model: &FittedModel, date: NaiveDate, value: f64) -> String {
    format!("Predicted {} for {date}: {value:.2}", model.target())
}

/// Format the per-day residual table.
pub fn format_residuals(residuals: &[DayResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:>12} {:>12} {:>10}\n",
        "date", "actual", "fitted", "residual"
    ));
    for r in residuals {
        out.push_str(&format!(
            "{:<10} {:>12.2} {:>12.2} {:>10.2}\n",
            r.date, r.actual, r.fitted, r.residual
        ));
    }
    out
}

fn fmt_metric(v: f64, decimals: usize) -> String {
    if v.is_finite() {
        format!("{v:.decimals$}")
    } else {
        "n/a".to_string()
    }
}

fn fmt_percent(v: f64) -> String {
    if v.is_finite() {
        format!("{:.2}%", v * 100.0)
    } else {
        "n/a".to_string()
    }
}
