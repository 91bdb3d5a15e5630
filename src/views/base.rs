//! The base view every derived view reads from.

use crate::types::reading::{NormalizedReading, WeatherReading};
use std::collections::{BTreeMap, HashMap};

/// Normalizes raw readings: per region, ordered by timestamp ascending, a missing
/// `temperature_celsius` / `temperature_fahrenheit` takes the most recent prior
/// non-null value of the same field. Nothing else is filled.
///
/// Output is ordered by region, then timestamp. Readings sharing a timestamp within a
/// region keep their input order, which makes "preceding" for them depend on the order
/// objects were loaded in.
pub fn forecast_view(readings: &[WeatherReading]) -> Vec<NormalizedReading> {
    let mut by_region: BTreeMap<&str, Vec<&WeatherReading>> = BTreeMap::new();
    for reading in readings {
        by_region
            .entry(reading.region.as_str())
            .or_default()
            .push(reading);
    }

    let mut normalized = Vec::with_capacity(readings.len());
    for (_, mut sequence) in by_region {
        // stable: ties keep load order
        sequence.sort_by_key(|r| r.timestamp);

        let mut last_celsius = None;
        let mut last_fahrenheit = None;
        for reading in sequence {
            let mut filled = reading.clone();
            filled.temperature_celsius =
                carry_forward(filled.temperature_celsius, &mut last_celsius);
            filled.temperature_fahrenheit =
                carry_forward(filled.temperature_fahrenheit, &mut last_fahrenheit);
            normalized.push(NormalizedReading(filled));
        }
    }
    normalized
}

fn carry_forward(value: Option<f64>, last: &mut Option<f64>) -> Option<f64> {
    match value {
        Some(v) => {
            *last = Some(v);
            Some(v)
        }
        None => *last,
    }
}

/// Latest normalized reading(s) per region, ordered by region.
///
/// Every reading whose timestamp equals its region's maximum is returned. When the
/// feed holds two readings for the same region at that instant both appear; no
/// tie-break is applied.
pub fn current_weather(view: &[NormalizedReading]) -> Vec<NormalizedReading> {
    let mut latest = HashMap::new();
    for reading in view {
        latest
            .entry(reading.region.as_str())
            .and_modify(|ts| {
                if reading.timestamp > *ts {
                    *ts = reading.timestamp;
                }
            })
            .or_insert(reading.timestamp);
    }

    let mut current: Vec<NormalizedReading> = view
        .iter()
        .filter(|r| latest.get(r.region.as_str()) == Some(&r.timestamp))
        .cloned()
        .collect();
    current.sort_by(|a, b| a.region.cmp(&b.region));
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn reading(region: &str, hour: u32, celsius: Option<f64>) -> WeatherReading {
        WeatherReading::builder()
            .region(region)
            .timestamp(at(hour))
            .maybe_temperature_celsius(celsius)
            .maybe_temperature_fahrenheit(celsius.map(|c| c * 9.0 / 5.0 + 32.0))
            .build()
    }

    #[test]
    fn fills_from_most_recent_prior_value_in_timestamp_order() {
        // Deliberately out of order: the fill must follow timestamps, not input order.
        let readings = vec![
            reading("R1", 3, None),
            reading("R1", 1, Some(10.0)),
            reading("R1", 4, None),
            reading("R1", 2, None),
            reading("R1", 5, Some(12.0)),
            reading("R1", 6, None),
        ];

        let view = forecast_view(&readings);
        let temps: Vec<_> = view.iter().map(|r| r.temperature_celsius).collect();
        let hours: Vec<_> = view.iter().map(|r| r.timestamp).collect();

        assert_eq!(hours, (1..=6).map(at).collect::<Vec<_>>());
        assert_eq!(
            temps,
            vec![
                Some(10.0),
                Some(10.0),
                Some(10.0),
                Some(10.0),
                Some(12.0),
                Some(12.0)
            ]
        );
        assert_eq!(view[5].temperature_fahrenheit, Some(12.0 * 9.0 / 5.0 + 32.0));
    }

    #[test]
    fn leading_nulls_stay_null_and_regions_do_not_leak() {
        let readings = vec![
            reading("A", 1, Some(-4.0)),
            reading("B", 2, None),
            reading("B", 3, Some(7.0)),
            reading("A", 4, None),
        ];

        let view = forecast_view(&readings);

        assert_eq!(view.len(), 4);
        assert_eq!(view[0].region, "A");
        assert_eq!(view[1].temperature_celsius, Some(-4.0));
        assert_eq!(view[2].region, "B");
        assert_eq!(view[2].temperature_celsius, None);
        assert_eq!(view[3].temperature_celsius, Some(7.0));
    }

    #[test]
    fn only_temperature_fields_are_filled() {
        let mut first = reading("R1", 1, Some(3.0));
        first.humidity = Some(80.0);
        first.barometric_pressure = Some(101_000.0);
        let second = reading("R1", 2, None);

        let view = forecast_view(&[first, second]);

        assert_eq!(view[1].temperature_celsius, Some(3.0));
        assert_eq!(view[1].humidity, None);
        assert_eq!(view[1].barometric_pressure, None);
    }

    #[test]
    fn fahrenheit_fills_independently_of_celsius() {
        let mut first = reading("R1", 1, None);
        first.temperature_fahrenheit = Some(50.0);
        let mut second = reading("R1", 2, Some(11.0));
        second.temperature_fahrenheit = None;

        let view = forecast_view(&[first, second]);

        assert_eq!(view[0].temperature_celsius, None);
        assert_eq!(view[1].temperature_celsius, Some(11.0));
        assert_eq!(view[1].temperature_fahrenheit, Some(50.0));
    }

    #[test]
    fn current_weather_has_one_row_per_region_at_its_max_timestamp() {
        let readings = vec![
            reading("Miami_FL", 1, Some(25.0)),
            reading("Chicago_IL", 5, Some(-2.0)),
            reading("Miami_FL", 9, None),
            reading("Chicago_IL", 3, Some(-1.0)),
        ];
        let view = forecast_view(&readings);

        let current = current_weather(&view);

        assert_eq!(current.len(), 2);
        assert_eq!(current[0].region, "Chicago_IL");
        assert_eq!(current[0].timestamp, at(5));
        assert_eq!(current[1].region, "Miami_FL");
        assert_eq!(current[1].timestamp, at(9));
        // Latest row carries the forward-filled value.
        assert_eq!(current[1].temperature_celsius, Some(25.0));
    }

    #[test]
    fn current_weather_keeps_ties_at_the_max_timestamp() {
        let readings = vec![reading("R1", 4, Some(1.0)), reading("R1", 4, Some(2.0))];
        let current = current_weather(&forecast_view(&readings));
        assert_eq!(current.len(), 2);
        assert!(current.iter().all(|r| r.timestamp == at(4)));
    }

    #[test]
    fn empty_input_gives_empty_views() {
        assert!(forecast_view(&[]).is_empty());
        assert!(current_weather(&[]).is_empty());
    }
}
