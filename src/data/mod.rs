//! Data acquisition: weather, consumption, and joining them for a fit.

pub mod align;
pub mod sample;
pub mod weather;

pub use align::align;
pub use sample::{SampleConfig, expected_consumption, generate_consumption};
pub use weather::{OpenMeteoClient, WeatherSource};
