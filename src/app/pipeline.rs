//! Shared baseline pipeline.
//!
//! dates -> location -> weather -> consumption -> align -> fit -> next-day prediction
//!
//! The weather source is injected so the same workflow runs against the live
//! API or against recorded tables.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::config::BaselineConfig;
use crate::data::{SampleConfig, WeatherSource, align, generate_consumption};
use crate::dates::DateRangeValidator;
use crate::domain::{
    CONSUMPTION, ConsumptionRecord, DateRange, FittedModel, GeoLocation, ObservationSet,
    PredictionInput, WeatherRecord,
};
use crate::error::{BaselineError, Result};
use crate::fit::RegressionEngine;
use crate::report::{DayResidual, compute_residuals};

/// What the user asked for: a city and free text holding the two baseline dates.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineRequest {
    pub city: String,
    pub text: String,
    /// Dates on or after this day are not accepted as baseline dates.
    pub today: NaiveDate,
}

impl BaselineRequest {
    pub fn new(city: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            text: text.into(),
            today: Local::now().date_naive(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// All computed outputs of one baseline run.
#[derive(Debug, Clone)]
pub struct BaselineReport {
    pub range: DateRange,
    pub location: GeoLocation,
    /// Weather for `[start, end + 1]`.
    pub weather: Vec<WeatherRecord>,
    /// Consumption for `[start, end]`.
    pub consumption: Vec<ConsumptionRecord>,
    pub observations: ObservationSet,
    pub model: FittedModel,
    /// Fitted value and residual for each training day.
    pub residuals: Vec<DayResidual>,
    pub next_day: NaiveDate,
    pub next_day_inputs: PredictionInput,
    pub prediction: f64,
}

/// Execute the full pipeline against `source`.
pub fn run_baseline(
    source: &impl WeatherSource,
    request: &BaselineRequest,
    config: &BaselineConfig,
) -> Result<BaselineReport> {
    // 1) Baseline dates from the request text.
    let validator = DateRangeValidator::new(config.required_days);
    let range = validator.validate(&request.text, request.today)?;

    // 2) Location and weather, including the day to predict.
    let location = source.locate(&request.city)?;
    let weather = source.daily(location, DateRange::new(range.start, range.next_day()))?;

    run_baseline_with_data(range, location, weather, config)
}

/// Execute the pipeline with pre-fetched weather.
///
/// `weather` must cover the day after `range.end`; the training rows are the
/// records inside `range`.
pub fn run_baseline_with_data(
    range: DateRange,
    location: GeoLocation,
    weather: Vec<WeatherRecord>,
    config: &BaselineConfig,
) -> Result<BaselineReport> {
    let next_day = range.next_day();

    // 3) Synthetic consumption for the baseline days.
    let training: Vec<WeatherRecord> = weather
        .iter()
        .filter(|w| w.date >= range.start && w.date <= range.end)
        .cloned()
        .collect();
    let sample_config = SampleConfig::with_seed(config.sample_seed);
    let consumption = generate_consumption(&training, &sample_config)?;

    // 4) Join and fit.
    let observations = align(&training, &consumption)?;
    let (x, y) = observations.split(CONSUMPTION)?;

    let engine = RegressionEngine::new();
    let model = engine.fit(&x, &y)?;
    let residuals = compute_residuals(&observations, &model)?;

    // 5) Predict the day after the baseline.
    let next_day_inputs = weather
        .iter()
        .find(|w| w.date == next_day)
        .map(WeatherRecord::to_input)
        .ok_or(BaselineError::EmptyInput("no weather for the day after the baseline"))?;
    let prediction = engine.predict(&model, &next_day_inputs)?;

    info!(
        date = %next_day,
        prediction,
        rows = observations.len(),
        "baseline prediction"
    );

    Ok(BaselineReport {
        range,
        location,
        weather,
        consumption,
        observations,
        model,
        residuals,
        next_day,
        next_day_inputs,
        prediction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_for(range: DateRange) -> Vec<WeatherRecord> {
        range
            .days()
            .enumerate()
            .map(|(i, date)| {
                let t = 4.0 + (i as f64 * 1.7) % 15.0;
                WeatherRecord {
                    date,
                    temperature: t,
                    humidity: 55.0 + (i as f64 * 3.1) % 30.0,
                    dewpoint: t - 3.0 - (i % 4) as f64,
                }
            })
            .collect()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn pre_fetched_tables_produce_a_prediction() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 16));
        let weather = weather_for(DateRange::new(range.start, range.next_day()));
        let location = GeoLocation::new(52.52, 13.41).unwrap();

        let report =
            run_baseline_with_data(range, location, weather, &BaselineConfig::default()).unwrap();

        assert_eq!(report.consumption.len(), 16);
        assert_eq!(report.observations.len(), 16);
        assert_eq!(report.next_day, d(2024, 1, 17));
        assert_eq!(report.model.target(), CONSUMPTION);
        assert_eq!(report.model.n_samples(), 16);
        assert!(report.prediction.is_finite());

        assert_eq!(report.residuals.len(), 16);
        for (r, c) in report.residuals.iter().zip(&report.consumption) {
            assert_eq!(r.date, c.date);
            assert_eq!(r.actual, c.consumption_kwh);
            assert!((r.actual - r.fitted - r.residual).abs() < 1e-12);
        }
        // OLS with an intercept leaves residuals summing to zero.
        let total: f64 = report.residuals.iter().map(|r| r.residual).sum();
        assert!(total.abs() < 1e-6);
    }

    #[test]
    fn missing_next_day_weather_fails() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 16));
        let weather = weather_for(range);
        let location = GeoLocation::new(0.0, 0.0).unwrap();

        let err = run_baseline_with_data(range, location, weather, &BaselineConfig::default())
            .unwrap_err();
        assert!(matches!(err, BaselineError::EmptyInput(_)));
    }

    #[test]
    fn no_weather_inside_the_baseline_fails() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 16));
        let weather = weather_for(DateRange::new(range.next_day(), range.next_day()));
        let location = GeoLocation::new(0.0, 0.0).unwrap();

        let err = run_baseline_with_data(range, location, weather, &BaselineConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            BaselineError::EmptyInput("no weather records to drive consumption")
        );
    }
}
