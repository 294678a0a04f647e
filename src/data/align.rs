//! Join weather and consumption tables into one training set.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{
    CONSUMPTION, ConsumptionRecord, ObservationSet, WEATHER_FEATURES, WeatherRecord,
};
use crate::error::{BaselineError, Result};

/// Inner join on date.
///
/// Rows follow the consumption table's order. A date that appears more than
/// once on either side yields every pairing, each as its own row. Dates
/// present on only one side are dropped.
pub fn align(
    weather: &[WeatherRecord],
    consumption: &[ConsumptionRecord],
) -> Result<ObservationSet> {
    let mut by_date: HashMap<NaiveDate, Vec<&WeatherRecord>> = HashMap::new();
    for w in weather {
        by_date.entry(w.date).or_default().push(w);
    }

    let mut features: Vec<&str> = WEATHER_FEATURES.to_vec();
    features.push(CONSUMPTION);
    let mut set = ObservationSet::new(features)?;

    for c in consumption {
        let Some(matches) = by_date.get(&c.date) else {
            continue;
        };
        for w in matches {
            let [t, h, d] = w.values();
            set.push(c.date, vec![t, h, d, c.consumption_kwh])?;
        }
    }

    debug!(
        weather = weather.len(),
        consumption = consumption.len(),
        rows = set.len(),
        "aligned tables"
    );

    if set.is_empty() {
        return Err(BaselineError::NoOverlap);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn w(d: u32, t: f64) -> WeatherRecord {
        WeatherRecord {
            date: day(d),
            temperature: t,
            humidity: 60.0,
            dewpoint: 5.0,
        }
    }

    fn c(d: u32, kwh: f64) -> ConsumptionRecord {
        ConsumptionRecord {
            date: day(d),
            consumption_kwh: kwh,
        }
    }

    #[test]
    fn joins_on_date_in_consumption_order() {
        let weather = [w(1, 10.0), w(2, 11.0), w(3, 12.0)];
        let consumption = [c(3, 30.0), c(1, 10.0), c(9, 90.0)];

        let set = align(&weather, &consumption).unwrap();
        assert_eq!(set.dates(), vec![day(3), day(1)]);
        assert_eq!(set.column("temperature").unwrap(), vec![12.0, 10.0]);
        assert_eq!(set.column("consumption").unwrap(), vec![30.0, 10.0]);
    }

    #[test]
    fn duplicate_dates_stay_independent_rows() {
        let weather = [w(1, 10.0), w(2, 11.0)];
        let consumption = [c(1, 10.0), c(1, 12.0), c(2, 20.0)];

        let set = align(&weather, &consumption).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.column("consumption").unwrap(), vec![10.0, 12.0, 20.0]);
    }

    #[test]
    fn disjoint_tables_fail() {
        assert_eq!(
            align(&[w(1, 10.0)], &[c(2, 20.0)]).unwrap_err(),
            BaselineError::NoOverlap
        );
    }
}
