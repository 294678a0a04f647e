//! Baseline model fitting.
//!
//! Responsibilities:
//!
//! - validate the feature/target tables
//! - solve the least squares problem
//! - score the fit (r2 / NMBE / MAPE) and predict new days

pub mod engine;

pub use engine::*;
