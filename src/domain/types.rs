//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed by value between pipeline stages
//! - exported to JSON/CSV
//! - reloaded later for prediction

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BaselineError, Result};

pub const TEMPERATURE: &str = "temperature";
pub const HUMIDITY: &str = "humidity";
pub const DEWPOINT: &str = "dewpoint";
pub const CONSUMPTION: &str = "consumption";

/// Feature names carried by a [`WeatherRecord`], in column order.
pub const WEATHER_FEATURES: [&str; 3] = [TEMPERATURE, HUMIDITY, DEWPOINT];

/// Feature values keyed by name, as handed to `predict`.
///
/// Keys beyond the model's feature set are ignored.
pub type PredictionInput = HashMap<String, f64>;

/// A named sequence of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Ordered mapping from column name to samples.
///
/// Column order is insertion order and is what the regression uses for the
/// design matrix, the coefficient list and the equation string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Columns {
    columns: Vec<Column>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding one column, typically the regression target.
    pub fn single(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            columns: vec![Column {
                name: name.into(),
                values,
            }],
        }
    }

    /// Build from `(name, values)` pairs, rejecting repeated names.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut out = Self::new();
        for (name, values) in pairs {
            out.insert(name, values)?;
        }
        Ok(out)
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(BaselineError::DuplicateColumn(name));
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Length of the first column (`None` for an empty table).
    pub fn n_rows(&self) -> Option<usize> {
        self.columns.first().map(|c| c.values.len())
    }
}

/// One dated row of an [`ObservationSet`]; `values` follows the set's feature order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

/// Ordered `(date, value-per-feature)` records sharing one feature set.
///
/// Duplicate dates are independent rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObservationSet")]
pub struct ObservationSet {
    features: Vec<String>,
    records: Vec<Observation>,
}

/// Unchecked wire form; deserialization replays it through `new` and `push`.
#[derive(Deserialize)]
struct RawObservationSet {
    features: Vec<String>,
    records: Vec<Observation>,
}

impl TryFrom<RawObservationSet> for ObservationSet {
    type Error = BaselineError;

    fn try_from(raw: RawObservationSet) -> Result<Self> {
        let mut set = Self::new(raw.features)?;
        for record in raw.records {
            set.push(record.date, record.values)?;
        }
        Ok(set)
    }
}

impl ObservationSet {
    pub fn new<S: Into<String>>(features: impl IntoIterator<Item = S>) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        for name in features {
            let name = name.into();
            if names.contains(&name) {
                return Err(BaselineError::DuplicateColumn(name));
            }
            names.push(name);
        }
        if names.is_empty() {
            return Err(BaselineError::EmptyInput("observation set has no features"));
        }
        Ok(Self {
            features: names,
            records: Vec::new(),
        })
    }

    /// Append a record; `values` must carry one value per feature.
    pub fn push(&mut self, date: NaiveDate, values: Vec<f64>) -> Result<()> {
        if values.len() != self.features.len() {
            return Err(BaselineError::DimensionMismatch {
                column: format!("record {date}"),
                expected: self.features.len(),
                found: values.len(),
            });
        }
        self.records.push(Observation { date, values });
        Ok(())
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn records(&self) -> &[Observation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.features.iter().position(|f| f == name)?;
        Some(self.records.iter().map(|r| r.values[idx]).collect())
    }

    /// Split into regression inputs: every other feature becomes X, `target` becomes Y.
    pub fn split(&self, target: &str) -> Result<(Columns, Columns)> {
        let y = self
            .column(target)
            .ok_or_else(|| BaselineError::MissingFeature(target.to_string()))?;

        let mut x = Columns::new();
        for (idx, name) in self.features.iter().enumerate() {
            if name == target {
                continue;
            }
            x.insert(name.clone(), self.records.iter().map(|r| r.values[idx]).collect())?;
        }
        Ok((x, Columns::single(target, y)))
    }
}

/// Regression accuracy on the training rows.
///
/// Undefined metrics are `NaN` (serialized as `null`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    #[serde(with = "nan_as_null")]
    pub r2: f64,
    #[serde(with = "nan_as_null")]
    pub nmbe: f64,
    /// Fraction, not percent.
    #[serde(with = "nan_as_null")]
    pub mape: f64,
}

/// An immutable fitted linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    target: String,
    intercept: f64,
    coefficients: Vec<(String, f64)>,
    fitted_at: DateTime<Utc>,
    metrics: FitMetrics,
    n_samples: usize,
    rank: usize,
}

impl FittedModel {
    pub(crate) fn new(
        target: String,
        intercept: f64,
        coefficients: Vec<(String, f64)>,
        metrics: FitMetrics,
        n_samples: usize,
        rank: usize,
    ) -> Self {
        Self {
            target,
            intercept,
            coefficients,
            fitted_at: Utc::now(),
            metrics,
            n_samples,
            rank,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// `(feature, coefficient)` pairs in fit order.
    pub fn coefficients(&self) -> &[(String, f64)] {
        &self.coefficients
    }

    pub fn coefficient(&self, feature: &str) -> Option<f64> {
        self.coefficients
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, c)| *c)
    }

    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.coefficients.iter().map(|(name, _)| name.as_str())
    }

    pub fn fitted_at(&self) -> DateTime<Utc> {
        self.fitted_at
    }

    pub fn record_date(&self) -> NaiveDate {
        self.fitted_at.date_naive()
    }

    pub fn metrics(&self) -> &FitMetrics {
        &self.metrics
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Numerical rank of the centered design matrix.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// `false` when the design was rank-deficient and the coefficients are
    /// the minimum-norm member of a family of equally good solutions.
    pub fn is_unique(&self) -> bool {
        self.rank == self.coefficients.len()
    }

    /// `"<target> = <b0> + (<b1> * <x1>) + ..."` with four decimals.
    pub fn equation(&self) -> String {
        crate::report::render_equation(&self.target, self.intercept, &self.coefficients)
    }
}

/// A geocoded point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let loc = Self { latitude, longitude };
        loc.validate()?;
        Ok(loc)
    }

    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(BaselineError::InvalidLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// Daily mean weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    /// °C
    pub temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    /// °C
    pub dewpoint: f64,
}

impl WeatherRecord {
    /// Values in [`WEATHER_FEATURES`] order.
    pub fn values(&self) -> [f64; 3] {
        [self.temperature, self.humidity, self.dewpoint]
    }

    pub fn to_input(&self) -> PredictionInput {
        WEATHER_FEATURES
            .iter()
            .zip(self.values())
            .map(|(name, v)| (name.to_string(), v))
            .collect()
    }
}

/// Daily energy use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub date: NaiveDate,
    pub consumption_kwh: f64,
}

/// An inclusive, ordered date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Order the two dates so that `start <= end`.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Whole days between `start` and `end`.
    pub fn gap_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// The day after `end`.
    pub fn next_day(&self) -> NaiveDate {
        self.end + Duration::days(1)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Serialize non-finite floats as `null` and read `null` back as `NaN`.
///
/// `serde_json` cannot represent NaN, and undefined metrics are NaN.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
