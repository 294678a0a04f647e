//! Input/output helpers.
//!
//! - fitted model JSON read/write (`model`)
//! - training table exports (`export`)

pub mod export;
pub mod model;

pub use export::*;
pub use model::*;
