//! Public-facing active alerts: one highest-priority label per reading.

use crate::types::alert_labels::ActiveAlertType;
use crate::types::reading::{timestamp_format, NormalizedReading, WeatherReading};
use chrono::NaiveDateTime;
use serde::Serialize;

pub const EXTREME_HEAT_F: f64 = 95.0;
pub const FREEZE_WARNING_F: f64 = 32.0;
/// 30 mph.
pub const HIGH_WIND_MS: f64 = 13.41;
pub const PRECIPITATION_PCT: f64 = 60.0;

/// Any raw threshold holds, or the collector saw an upstream alert.
pub fn is_alert_candidate(reading: &WeatherReading) -> bool {
    reading.temperature_fahrenheit.is_some_and(|t| t >= EXTREME_HEAT_F)
        || reading.temperature_fahrenheit.is_some_and(|t| t <= FREEZE_WARNING_F)
        || reading.wind_speed_ms.is_some_and(|w| w >= HIGH_WIND_MS)
        || reading
            .precipitation_probability
            .is_some_and(|p| p >= PRECIPITATION_PCT)
        || reading.has_upstream_alert()
}

/// First matching label in priority order, or `None` when no threshold holds.
///
/// The upstream alert flag alone never produces a label.
pub fn active_alert_type(reading: &WeatherReading) -> Option<ActiveAlertType> {
    let temp_f = reading.temperature_fahrenheit;
    if temp_f.is_some_and(|t| t >= EXTREME_HEAT_F) {
        Some(ActiveAlertType::ExtremeHeat)
    } else if temp_f.is_some_and(|t| t <= FREEZE_WARNING_F) {
        Some(ActiveAlertType::FreezeWarning)
    } else if reading.wind_speed_ms.is_some_and(|w| w >= HIGH_WIND_MS) {
        Some(ActiveAlertType::HighWind)
    } else if reading
        .precipitation_probability
        .is_some_and(|p| p >= PRECIPITATION_PCT)
    {
        Some(ActiveAlertType::Precipitation)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveAlert {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub region: String,
    pub alert_type: ActiveAlertType,
    pub temperature_fahrenheit: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub short_forecast: Option<String>,
    pub has_alerts: Option<String>,
}

/// Candidate rows that end up with a label, in base-view order.
pub fn current_active_alerts(view: &[NormalizedReading]) -> Vec<ActiveAlert> {
    view.iter()
        .filter(|r| is_alert_candidate(r))
        .filter_map(|r| {
            active_alert_type(r).map(|alert_type| ActiveAlert {
                timestamp: r.timestamp,
                region: r.region.clone(),
                alert_type,
                temperature_fahrenheit: r.temperature_fahrenheit,
                wind_speed_ms: r.wind_speed_ms,
                precipitation_probability: r.precipitation_probability,
                short_forecast: r.short_forecast.clone(),
                has_alerts: r.has_alerts.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::base::forecast_view;
    use chrono::NaiveDate;

    fn reading(temp_f: f64, wind: f64, precip: f64, flag: &str) -> WeatherReading {
        WeatherReading::builder()
            .region("Oklahoma_City_OK")
            .timestamp(
                NaiveDate::from_ymd_opt(2024, 5, 20)
                    .unwrap()
                    .and_hms_opt(18, 0, 0)
                    .unwrap(),
            )
            .temperature_fahrenheit(temp_f)
            .wind_speed_ms(wind)
            .precipitation_probability(precip)
            .has_alerts(flag)
            .build()
    }

    #[test]
    fn hot_calm_dry_reading_is_extreme_heat() {
        let r = reading(96.0, 5.0, 10.0, "No");
        assert!(is_alert_candidate(&r));
        assert_eq!(active_alert_type(&r), Some(ActiveAlertType::ExtremeHeat));
    }

    #[test]
    fn priority_order_decides_between_matches() {
        // Freezing, windy and wet: temperature wins.
        let r = reading(30.0, 15.0, 90.0, "No");
        assert_eq!(active_alert_type(&r), Some(ActiveAlertType::FreezeWarning));
        // Windy and wet: wind wins.
        let r = reading(60.0, 13.41, 90.0, "No");
        assert_eq!(active_alert_type(&r), Some(ActiveAlertType::HighWind));
        let r = reading(60.0, 2.0, 60.0, "No");
        assert_eq!(active_alert_type(&r), Some(ActiveAlertType::Precipitation));
    }

    #[test]
    fn flag_only_rows_are_selected_then_dropped() {
        let flagged = reading(70.0, 2.0, 10.0, "Yes");
        assert!(is_alert_candidate(&flagged));
        assert_eq!(active_alert_type(&flagged), None);

        let hot = reading(100.0, 2.0, 10.0, "No");
        let alerts = current_active_alerts(&forecast_view(&[flagged, hot]));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, ActiveAlertType::ExtremeHeat);
        assert_eq!(alerts[0].temperature_fahrenheit, Some(100.0));
    }

    #[test]
    fn missing_fields_do_not_match() {
        let r = WeatherReading::builder()
            .region("R1")
            .timestamp(
                NaiveDate::from_ymd_opt(2024, 5, 20)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            )
            .build();
        assert!(!is_alert_candidate(&r));
        assert_eq!(active_alert_type(&r), None);
    }
}
