//! Open-Meteo integration: city geocoding and daily mean weather.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::BaselineConfig;
use crate::domain::{DateRange, GeoLocation, WeatherRecord};
use crate::error::{BaselineError, Result};

const DAILY_FIELDS: &str = "temperature_2m_mean,relative_humidity_2m_mean,dew_point_2m_mean";

/// Where weather observations come from.
///
/// The pipeline only talks to this trait, so tests and offline hosts can
/// feed recorded tables instead of the live API.
pub trait WeatherSource {
    /// Resolve a city name to coordinates.
    fn locate(&self, city: &str) -> Result<GeoLocation>;

    /// Daily records for every day of `range` the source has data for.
    fn daily(&self, location: GeoLocation, range: DateRange) -> Result<Vec<WeatherRecord>>;
}

pub struct OpenMeteoClient {
    client: Client,
    forecast_url: String,
    geocoding_url: String,
}

impl OpenMeteoClient {
    pub fn new(
        forecast_url: impl Into<String>,
        geocoding_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BaselineError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            forecast_url: forecast_url.into(),
            geocoding_url: geocoding_url.into(),
        })
    }

    pub fn from_config(config: &BaselineConfig) -> Result<Self> {
        Self::new(&config.forecast_url, &config.geocoding_url, config.http_timeout)
    }

    fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(url, ?query, "open-meteo request");
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| BaselineError::Http(format!("request to {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(BaselineError::Http(format!(
                "request to {url} failed with status {}",
                resp.status()
            )));
        }

        resp.json()
            .map_err(|e| BaselineError::Parse(format!("unexpected response from {url}: {e}")))
    }
}

impl WeatherSource for OpenMeteoClient {
    fn locate(&self, city: &str) -> Result<GeoLocation> {
        let city = city.trim();
        if city.is_empty() {
            return Err(BaselineError::EmptyInput("city name"));
        }
        info!(city, "geocoding city");

        let body: GeocodingResponse = self.get_json(
            &self.geocoding_url,
            &[
                ("name", city.to_string()),
                ("count", "1".to_string()),
                ("format", "json".to_string()),
            ],
        )?;
        decode_location(city, body)
    }

    fn daily(&self, location: GeoLocation, range: DateRange) -> Result<Vec<WeatherRecord>> {
        location.validate()?;
        info!(
            latitude = location.latitude,
            longitude = location.longitude,
            start = %range.start,
            end = %range.end,
            "fetching daily weather"
        );

        let body: ForecastResponse = self.get_json(
            &self.forecast_url,
            &[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("start_date", range.start.to_string()),
                ("end_date", range.end.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ],
        )?;
        decode_daily(body.daily)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailySeries,
}

/// Column-oriented daily block; missing days come back as `null`.
#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<String>,
    temperature_2m_mean: Vec<Option<f64>>,
    relative_humidity_2m_mean: Vec<Option<f64>>,
    dew_point_2m_mean: Vec<Option<f64>>,
}

fn decode_location(city: &str, body: GeocodingResponse) -> Result<GeoLocation> {
    let hit = body
        .results
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| BaselineError::CityNotFound(city.to_string()))?;
    let location = GeoLocation::new(hit.latitude, hit.longitude)?;
    info!(
        city,
        matched = hit.name.as_deref().unwrap_or(city),
        latitude = location.latitude,
        longitude = location.longitude,
        "city located"
    );
    Ok(location)
}

fn decode_daily(daily: DailySeries) -> Result<Vec<WeatherRecord>> {
    let n = daily.time.len();
    for (name, len) in [
        ("temperature_2m_mean", daily.temperature_2m_mean.len()),
        ("relative_humidity_2m_mean", daily.relative_humidity_2m_mean.len()),
        ("dew_point_2m_mean", daily.dew_point_2m_mean.len()),
    ] {
        if len != n {
            return Err(BaselineError::DimensionMismatch {
                column: name.to_string(),
                expected: n,
                found: len,
            });
        }
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let raw = &daily.time[i];
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| BaselineError::Parse(format!("invalid weather date '{raw}': {e}")))?;
        let (Some(temperature), Some(humidity), Some(dewpoint)) = (
            daily.temperature_2m_mean[i],
            daily.relative_humidity_2m_mean[i],
            daily.dew_point_2m_mean[i],
        ) else {
            debug!(%date, "skipping day with incomplete weather");
            continue;
        };
        out.push(WeatherRecord {
            date,
            temperature,
            humidity,
            dewpoint,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_block_skips_null_days() {
        let json = r#"{
            "latitude": 52.52,
            "daily": {
                "time": ["2024-01-01", "2024-01-02", "2024-01-03"],
                "temperature_2m_mean": [1.5, null, 3.0],
                "relative_humidity_2m_mean": [80.0, 82.0, 75.0],
                "dew_point_2m_mean": [-1.0, 0.0, -0.5]
            }
        }"#;
        let body: ForecastResponse = serde_json::from_str(json).unwrap();
        let records = decode_daily(body.daily).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(records[1].temperature, 3.0);
        assert_eq!(records[1].humidity, 75.0);
    }

    #[test]
    fn ragged_daily_block_is_rejected() {
        let json = r#"{"daily": {
            "time": ["2024-01-01", "2024-01-02"],
            "temperature_2m_mean": [1.5],
            "relative_humidity_2m_mean": [80.0, 82.0],
            "dew_point_2m_mean": [-1.0, 0.0]
        }}"#;
        let body: ForecastResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            decode_daily(body.daily),
            Err(BaselineError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn geocoding_takes_first_hit() {
        let body: GeocodingResponse = serde_json::from_str(
            r#"{"results": [
                {"name": "San Francisco", "latitude": 37.7749, "longitude": -122.4194}
            ]}"#,
        )
        .unwrap();
        let loc = decode_location("San Francisco", body).unwrap();
        assert_eq!(loc, GeoLocation { latitude: 37.7749, longitude: -122.4194 });
    }

    #[test]
    fn geocoding_without_results_is_city_not_found() {
        let body: GeocodingResponse =
            serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert_eq!(
            decode_location("Atlantis", body).unwrap_err(),
            BaselineError::CityNotFound("Atlantis".into())
        );
    }

    #[test]
    fn geocoding_rejects_out_of_range_coordinates() {
        let body: GeocodingResponse =
            serde_json::from_str(r#"{"results": [{"latitude": 123.0, "longitude": 0.0}]}"#)
                .unwrap();
        assert!(matches!(
            decode_location("Nowhere", body),
            Err(BaselineError::InvalidLocation { .. })
        ));
    }
}
