//! Baseline date handling.

pub mod validator;

pub use validator::*;
