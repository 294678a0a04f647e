//! Mathematical utilities: least squares and fit metrics.

pub mod metrics;
pub mod ols;

pub use metrics::*;
pub use ols::*;
