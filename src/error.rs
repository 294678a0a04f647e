//! Crate-wide error type.
//!
//! Every failure is scoped to a single call and returned to the caller; the
//! library never recovers locally and never aborts the process.

use thiserror::Error;

/// Simplified `Result` using [`BaselineError`] as error type.
pub type Result<T> = std::result::Result<T, BaselineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BaselineError {
    /// A column's length disagrees with the rest of the table.
    #[error("column `{column}` has {found} samples, expected {expected}")]
    DimensionMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
    /// The centered design carries no usable variation.
    #[error("singular design: rank {rank} for {features} feature(s)")]
    SingularDesign { rank: usize, features: usize },
    #[error("missing feature `{0}`")]
    MissingFeature(String),
    #[error("target must contain exactly one column, got {found}")]
    InvalidTarget { found: usize },
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
    #[error("non-finite value in `{column}` at row {row}")]
    NonFiniteValue { column: String, row: usize },
    /// A prediction input for a model feature is NaN or infinite.
    #[error("non-finite prediction input `{0}`")]
    NonFiniteInput(String),

    #[error("could not parse `{0}` as a calendar date")]
    DateParseFailure(String),
    #[error("expected exactly two past dates, found {found}")]
    DateCountMismatch { found: usize },
    #[error("dates must be {expected_days} days apart, got {found_days}")]
    DateGapMismatch { expected_days: i64, found_days: i64 },

    #[error("invalid location: latitude {latitude}, longitude {longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },
    #[error("no geocoding result for `{0}`")]
    CityNotFound(String),
    #[error("weather and consumption tables share no date")]
    NoOverlap,

    #[error("http: {0}")]
    Http(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("io: {0}")]
    Io(String),
    #[error("config `{key}`: {message}")]
    Config { key: &'static str, message: String },
}

impl From<std::io::Error> for BaselineError {
    fn from(err: std::io::Error) -> Self {
        BaselineError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BaselineError {
    fn from(err: serde_json::Error) -> Self {
        BaselineError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_column() {
        let err = BaselineError::DimensionMismatch {
            column: "consumption".into(),
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "column `consumption` has 2 samples, expected 3");
        assert_eq!(
            BaselineError::MissingFeature("humidity".into()).to_string(),
            "missing feature `humidity`"
        );
    }
}
