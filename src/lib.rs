//! `energy-baseline` library crate.
//!
//! Fits daily energy consumption against weather and validates the date
//! range a baseline is built from. Modules are split so that:
//!
//! - core logic (dates, regression, metrics) is testable without network access
//! - the weather source is swappable behind a trait
//! - hosts only need `app::run` or the pipeline functions

pub mod app;
pub mod config;
pub mod data;
pub mod dates;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod report;
pub mod telemetry;

pub use dates::DateRangeValidator;
pub use domain::{Columns, FittedModel, PredictionInput};
pub use error::{BaselineError, Result};
pub use fit::RegressionEngine;
