//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - tabular inputs (`Columns`, `ObservationSet`)
//! - fit outputs (`FittedModel`, `FitMetrics`)
//! - acquisition records (`WeatherRecord`, `ConsumptionRecord`, `GeoLocation`, `DateRange`)

pub mod types;

pub use types::*;
