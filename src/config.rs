//! Runtime configuration loaded from the environment (and `.env`, if present).

use std::str::FromStr;
use std::time::Duration;

use crate::dates::DEFAULT_REQUIRED_DAYS;
use crate::error::{BaselineError, Result};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Settings for one baseline run.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineConfig {
    /// Required distance between the two baseline dates.
    pub required_days: i64,
    pub forecast_url: String,
    pub geocoding_url: String,
    pub http_timeout: Duration,
    /// Seed for synthetic consumption (mixed with the baseline dates).
    pub sample_seed: u64,
    /// `tracing` filter directive, e.g. `info` or `energy_baseline=debug`.
    pub log_filter: String,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            required_days: DEFAULT_REQUIRED_DAYS,
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            http_timeout: Duration::from_secs(30),
            sample_seed: 42,
            log_filter: "info".to_string(),
        }
    }
}

impl BaselineConfig {
    /// Read `BASELINE_*` variables over the defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let required_days =
            parsed(&lookup, "BASELINE_REQUIRED_DAYS")?.unwrap_or(defaults.required_days);
        if required_days <= 0 {
            return Err(BaselineError::Config {
                key: "BASELINE_REQUIRED_DAYS",
                message: format!("must be positive, got {required_days}"),
            });
        }

        let timeout_secs: u64 =
            parsed(&lookup, "BASELINE_HTTP_TIMEOUT_SECS")?
                .unwrap_or(defaults.http_timeout.as_secs());

        Ok(Self {
            required_days,
            forecast_url: lookup("BASELINE_FORECAST_URL").unwrap_or(defaults.forecast_url),
            geocoding_url: lookup("BASELINE_GEOCODING_URL").unwrap_or(defaults.geocoding_url),
            http_timeout: Duration::from_secs(timeout_secs),
            sample_seed: parsed(&lookup, "BASELINE_SAMPLE_SEED")?.unwrap_or(defaults.sample_seed),
            log_filter: lookup("BASELINE_LOG").unwrap_or(defaults.log_filter),
        })
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| BaselineError::Config {
            key,
            message: format!("invalid value `{raw}`: {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = BaselineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BaselineConfig::default());
        assert_eq!(config.required_days, 15);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = BaselineConfig::from_lookup(lookup(&[
            ("BASELINE_REQUIRED_DAYS", "30"),
            ("BASELINE_HTTP_TIMEOUT_SECS", "5"),
            ("BASELINE_FORECAST_URL", "http://localhost:9000/v1/forecast"),
        ]))
        .unwrap();
        assert_eq!(config.required_days, 30);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.forecast_url, "http://localhost:9000/v1/forecast");
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err =
            BaselineConfig::from_lookup(lookup(&[("BASELINE_SAMPLE_SEED", "abc")])).unwrap_err();
        assert!(matches!(err, BaselineError::Config { key: "BASELINE_SAMPLE_SEED", .. }));

        let err =
            BaselineConfig::from_lookup(lookup(&[("BASELINE_REQUIRED_DAYS", "0")])).unwrap_err();
        assert!(matches!(err, BaselineError::Config { key: "BASELINE_REQUIRED_DAYS", .. }));
    }
}
