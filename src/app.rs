//! Top-level application orchestration.
//!
//! This module is the "real main" for hosts embedding the library:
//! - loads configuration from the environment
//! - installs logging
//! - runs the baseline pipeline against Open-Meteo
//! - prints the fit summary, per-day residuals and next-day prediction

use crate::config::BaselineConfig;
use crate::data::OpenMeteoClient;
use crate::error::Result;

pub mod pipeline;

pub use pipeline::{BaselineReport, BaselineRequest, run_baseline, run_baseline_with_data};

/// Run one baseline for `request` with settings from the environment.
pub fn run(request: &BaselineRequest) -> Result<BaselineReport> {
    let config = BaselineConfig::from_env()?;
    crate::telemetry::init(&config.log_filter);

    let client = OpenMeteoClient::from_config(&config)?;
    let report = run_baseline(&client, request, &config)?;

    println!("{}", crate::report::format_fit_summary(&report.model));
    println!("{}", crate::report::format_residuals(&report.residuals));
    println!(
        "{}",
        crate::report::format_prediction(&report.model, report.next_day, report.prediction)
    );

    Ok(report)
}
