//! Internal severity triage. Unlike the alert views, every reading is classified.

use crate::types::alert_labels::SeverityLevel;
use crate::types::reading::{timestamp_format, NormalizedReading, WeatherReading};
use chrono::NaiveDateTime;
use serde::Serialize;

/// One tier of the triage table. A reading matches a tier when any bound holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityTier {
    pub hot_f: f64,
    pub cold_f: f64,
    pub wind_ms: f64,
    pub precipitation_pct: f64,
}

impl SeverityTier {
    pub fn matches(&self, reading: &WeatherReading) -> bool {
        reading
            .temperature_fahrenheit
            .is_some_and(|t| t >= self.hot_f || t <= self.cold_f)
            || reading.wind_speed_ms.is_some_and(|w| w >= self.wind_ms)
            || reading
                .precipitation_probability
                .is_some_and(|p| p >= self.precipitation_pct)
    }
}

pub const CRITICAL: SeverityTier = SeverityTier {
    hot_f: 95.0,
    cold_f: 20.0,
    // 45 mph
    wind_ms: 20.12,
    precipitation_pct: 80.0,
};

pub const WARNING: SeverityTier = SeverityTier {
    hot_f: 85.0,
    cold_f: 32.0,
    // 30 mph
    wind_ms: 13.41,
    precipitation_pct: 60.0,
};

/// First matching tier wins; the upstream flag alone only reaches `Advisory`.
pub fn severity_level(reading: &WeatherReading) -> SeverityLevel {
    if CRITICAL.matches(reading) {
        SeverityLevel::Critical
    } else if WARNING.matches(reading) {
        SeverityLevel::Warning
    } else if reading.has_upstream_alert() {
        SeverityLevel::Advisory
    } else {
        SeverityLevel::Normal
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityRow {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub region: String,
    pub temperature_fahrenheit: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub has_alerts: Option<String>,
    pub severity_level: SeverityLevel,
}

/// One row per base-view reading, same order.
pub fn alert_severity_levels(view: &[NormalizedReading]) -> Vec<SeverityRow> {
    view.iter()
        .map(|r| SeverityRow {
            timestamp: r.timestamp,
            region: r.region.clone(),
            temperature_fahrenheit: r.temperature_fahrenheit,
            wind_speed_ms: r.wind_speed_ms,
            precipitation_probability: r.precipitation_probability,
            has_alerts: r.has_alerts.clone(),
            severity_level: severity_level(r),
        })
        .collect()
}
