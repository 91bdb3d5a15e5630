//! Extreme-condition audit over the base view (Celsius and m/s thresholds).

use crate::types::alert_labels::{PrecipitationAlert, TemperatureAlert, WindAlert};
use crate::types::reading::{timestamp_format, NormalizedReading, WeatherReading};
use chrono::NaiveDateTime;
use serde::Serialize;

pub const EXTREME_HEAT_C: f64 = 35.0;
pub const FREEZING_C: f64 = 0.0;
pub const HIGH_WIND_MS: f64 = 20.0;

pub fn temperature_alert(reading: &WeatherReading) -> TemperatureAlert {
    match reading.temperature_celsius {
        Some(t) if t >= EXTREME_HEAT_C => TemperatureAlert::ExtremeHeat,
        Some(t) if t <= FREEZING_C => TemperatureAlert::Freezing,
        _ => TemperatureAlert::Normal,
    }
}

pub fn wind_alert(reading: &WeatherReading) -> WindAlert {
    match reading.wind_speed_ms {
        Some(w) if w >= HIGH_WIND_MS => WindAlert::HighWind,
        _ => WindAlert::Normal,
    }
}

pub fn precipitation_alert(reading: &WeatherReading) -> PrecipitationAlert {
    if reading.snow_level.is_some_and(|s| s > 0.0) {
        PrecipitationAlert::SnowPresent
    } else if reading.ice_accumulation.is_some_and(|i| i > 0.0) {
        PrecipitationAlert::IcePresent
    } else {
        PrecipitationAlert::None
    }
}

/// Whether a reading belongs in the audit at all.
pub fn is_extreme(reading: &WeatherReading) -> bool {
    temperature_alert(reading) != TemperatureAlert::Normal
        || wind_alert(reading) == WindAlert::HighWind
        || precipitation_alert(reading) != PrecipitationAlert::None
        || reading.has_upstream_alert()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeWeatherAlert {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub region: String,
    pub temperature_celsius: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub snow_level: Option<f64>,
    pub ice_accumulation: Option<f64>,
    pub has_alerts: Option<String>,
    pub temperature_alert: TemperatureAlert,
    pub wind_alert: WindAlert,
    pub precipitation_alert: PrecipitationAlert,
}

/// Rows meeting any extreme condition, in base-view order.
pub fn extreme_weather_alerts(view: &[NormalizedReading]) -> Vec<ExtremeWeatherAlert> {
    view.iter()
        .filter(|r| is_extreme(r))
        .map(|r| ExtremeWeatherAlert {
            timestamp: r.timestamp,
            region: r.region.clone(),
            temperature_celsius: r.temperature_celsius,
            wind_speed_ms: r.wind_speed_ms,
            snow_level: r.snow_level,
            ice_accumulation: r.ice_accumulation,
            has_alerts: r.has_alerts.clone(),
            temperature_alert: temperature_alert(r),
            wind_alert: wind_alert(r),
            precipitation_alert: precipitation_alert(r),
        })
        .collect()
}
