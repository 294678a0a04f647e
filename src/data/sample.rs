//! Synthetic daily consumption driven by observed weather.
//!
//! Stands in for a metering feed when none is connected. Daily use follows a
//! degree-day model:
//!
//! ```text
//! kWh = base
//!     + heating_slope · max(0, heating_balance − T)
//!     + cooling_slope · max(0, T − cooling_balance)
//!     + humidity_slope · (H − 50)
//! ```
//!
//! scaled down on weekends and multiplied by mean-one log-normal noise.

use chrono::{Datelike, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{ConsumptionRecord, WeatherRecord};
use crate::error::{BaselineError, Result};

/// Floor so generated days stay strictly positive (keeps MAPE defined).
const MIN_KWH: f64 = 0.1;

/// Degree-day model parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub seed: u64,
    pub base_kwh: f64,
    pub heating_balance_c: f64,
    pub heating_kwh_per_degree: f64,
    pub cooling_balance_c: f64,
    pub cooling_kwh_per_degree: f64,
    pub humidity_kwh_per_pct: f64,
    pub weekend_factor: f64,
    /// Log-space standard deviation of the daily noise.
    pub noise_sigma: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            base_kwh: 30.0,
            heating_balance_c: 18.0,
            heating_kwh_per_degree: 2.5,
            cooling_balance_c: 22.0,
            cooling_kwh_per_degree: 3.0,
            humidity_kwh_per_pct: 0.05,
            weekend_factor: 0.9,
            noise_sigma: 0.05,
        }
    }
}

impl SampleConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        let checks: [(&'static str, bool); 3] = [
            ("base_kwh", self.base_kwh.is_finite() && self.base_kwh > 0.0),
            (
                "weekend_factor",
                self.weekend_factor.is_finite() && self.weekend_factor > 0.0,
            ),
            (
                "noise_sigma",
                self.noise_sigma.is_finite() && self.noise_sigma >= 0.0,
            ),
        ];
        for (key, ok) in checks {
            if !ok {
                return Err(BaselineError::Config {
                    key,
                    message: "invalid synthetic consumption setting".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Expected (noise-free) consumption for one day of weather.
pub fn expected_consumption(weather: &WeatherRecord, config: &SampleConfig) -> f64 {
    let heating = (config.heating_balance_c - weather.temperature).max(0.0);
    let cooling = (weather.temperature - config.cooling_balance_c).max(0.0);
    let mut kwh = config.base_kwh
        + config.heating_kwh_per_degree * heating
        + config.cooling_kwh_per_degree * cooling
        + config.humidity_kwh_per_pct * (weather.humidity - 50.0);

    if matches!(weather.date.weekday(), Weekday::Sat | Weekday::Sun) {
        kwh *= config.weekend_factor;
    }
    kwh.max(MIN_KWH)
}

/// Generate one consumption record per weather record, in the same order.
pub fn generate_consumption(
    weather: &[WeatherRecord],
    config: &SampleConfig,
) -> Result<Vec<ConsumptionRecord>> {
    if weather.is_empty() {
        return Err(BaselineError::EmptyInput("no weather records to drive consumption"));
    }
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(sample_seed(weather, config));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| BaselineError::Config { key: "noise_sigma", message: e.to_string() })?;

    // Mean correction so E[exp(σz − σ²/2)] == 1 (keeps the expected level unbiased).
    let sigma = config.noise_sigma;
    let correction = 0.5 * sigma * sigma;

    Ok(weather
        .iter()
        .map(|w| {
            let z: f64 = normal.sample(&mut rng);
            let kwh = expected_consumption(w, config) * (sigma * z - correction).exp();
            ConsumptionRecord {
                date: w.date,
                consumption_kwh: kwh.max(MIN_KWH),
            }
        })
        .collect())
}

/// Mix the configured seed with the series length and its first and last
/// day numbers. The mix is fixed so a range and seed map to the same stream
/// on every build.
fn sample_seed(weather: &[WeatherRecord], config: &SampleConfig) -> u64 {
    let day = |w: Option<&WeatherRecord>| w.map_or(0, |w| w.date.num_days_from_ce() as i64 as u64);
    config.seed
        ^ day(weather.first()).rotate_left(21)
        ^ day(weather.last()).rotate_left(42)
        ^ weather.len() as u64
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn weather(days: u32) -> Vec<WeatherRecord> {
        (0..days)
            .map(|i| WeatherRecord {
                // 2024-01-01 is a Monday.
                date: NaiveDate::from_ymd_opt(2024, 1, 1 + i).unwrap(),
                temperature: 2.0 + i as f64,
                humidity: 70.0,
                dewpoint: -1.0,
            })
            .collect()
    }

    #[test]
    fn same_inputs_give_same_series() {
        let w = weather(10);
        let a = generate_consumption(&w, &SampleConfig::default()).unwrap();
        let b = generate_consumption(&w, &SampleConfig::default()).unwrap();
        assert_eq!(a, b);

        let c = generate_consumption(&w, &SampleConfig::with_seed(7)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn seed_mix_is_fixed() {
        // Day numbers 738886 (2024-01-01) and 738895 (2024-01-10), 10 records.
        assert_eq!(sample_seed(&weather(10), &SampleConfig::default()), 3249696126378442784);
        assert_ne!(
            sample_seed(&weather(10), &SampleConfig::default()),
            sample_seed(&weather(11), &SampleConfig::default())
        );
    }

    #[test]
    fn series_is_positive_and_dated_like_weather() {
        let w = weather(16);
        let series = generate_consumption(&w, &SampleConfig::default()).unwrap();
        assert_eq!(series.len(), 16);
        for (rec, day) in series.iter().zip(&w) {
            assert_eq!(rec.date, day.date);
            assert!(rec.consumption_kwh > 0.0);
        }
    }

    #[test]
    fn colder_days_use_more_energy() {
        let config = SampleConfig::default();
        let w = weather(3);
        // Mon 2024-01-01 at 2°C vs Wed 2024-01-03 at 4°C.
        assert!(expected_consumption(&w[0], &config) > expected_consumption(&w[2], &config));
        // 30 + 2.5 * 16 + 0.05 * 20
        assert!((expected_consumption(&w[0], &config) - 71.0).abs() < 1e-12);
    }

    #[test]
    fn noise_free_series_matches_expectation() {
        let config = SampleConfig {
            noise_sigma: 0.0,
            ..SampleConfig::default()
        };
        let w = weather(7);
        let series = generate_consumption(&w, &config).unwrap();
        for (rec, day) in series.iter().zip(&w) {
            assert!((rec.consumption_kwh - expected_consumption(day, &config)).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_weather_is_rejected() {
        assert!(matches!(
            generate_consumption(&[], &SampleConfig::default()),
            Err(BaselineError::EmptyInput(_))
        ));
    }
}
