//! Row types for collector readings before and after normalization.

use crate::types::schema::ALERT_FLAG_YES;
use bon::Builder;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::ops::Deref;

/// One collector row: a region's weather at a point in time.
///
/// Every measurement is optional. The collector writes an empty field whenever the
/// upstream API had no value, and `(region, timestamp)` is not guaranteed to be unique.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use forecast_views::WeatherReading;
///
/// let ts = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let reading = WeatherReading::builder()
///     .region("Phoenix_AZ")
///     .timestamp(ts)
///     .temperature_fahrenheit(109.0)
///     .has_alerts("Yes")
///     .build();
///
/// assert!(reading.has_upstream_alert());
/// assert_eq!(reading.temperature_celsius, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
pub struct WeatherReading {
    #[builder(into)]
    pub region: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub temperature_celsius: Option<f64>,
    pub temperature_fahrenheit: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub wind_direction: Option<i64>,
    pub barometric_pressure: Option<f64>,
    pub visibility: Option<f64>,
    pub dew_point: Option<f64>,
    pub heat_index: Option<f64>,
    pub wind_chill: Option<f64>,
    #[builder(into)]
    pub present_weather: Option<String>,
    pub forecast_temp: Option<i64>,
    #[builder(into)]
    pub short_forecast: Option<String>,
    #[builder(into)]
    pub detailed_forecast: Option<String>,
    pub snow_level: Option<f64>,
    pub ice_accumulation: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub max_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub uv_index: Option<f64>,
    #[builder(into)]
    pub has_alerts: Option<String>,
}

impl WeatherReading {
    /// `true` when the collector saw at least one active NWS alert for the region.
    pub fn has_upstream_alert(&self) -> bool {
        self.has_alerts.as_deref() == Some(ALERT_FLAG_YES)
    }
}

/// A [`WeatherReading`] whose temperature fields were forward filled within its region.
///
/// Only produced by [`crate::views::base::forecast_view`]; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedReading(pub(crate) WeatherReading);

impl NormalizedReading {
    pub fn into_inner(self) -> WeatherReading {
        self.0
    }
}

impl Deref for NormalizedReading {
    type Target = WeatherReading;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub(crate) mod timestamp_format {
    use crate::types::schema::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn upstream_alert_flag_is_exact_yes() {
        let flagged = WeatherReading::builder()
            .region("R1")
            .timestamp(ts())
            .has_alerts("Yes")
            .build();
        let lowercase = WeatherReading::builder()
            .region("R1")
            .timestamp(ts())
            .has_alerts("yes")
            .build();
        let missing = WeatherReading::builder().region("R1").timestamp(ts()).build();

        assert!(flagged.has_upstream_alert());
        assert!(!lowercase.has_upstream_alert());
        assert!(!missing.has_upstream_alert());
    }

    #[test]
    fn json_uses_collector_timestamp_layout() {
        let reading = WeatherReading::builder()
            .region("Chicago_IL")
            .timestamp(ts())
            .build();
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["timestamp"], "2024-12-01 08:00:00");
        assert_eq!(json["region"], "Chicago_IL");
        assert!(json["temperature_celsius"].is_null());
    }
}
