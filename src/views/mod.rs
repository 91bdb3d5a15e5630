//! Base view, latest-per-region projection and the five derived analytical views.
//!
//! Every function here is pure: same readings and `as_of` in, identical rows out.

pub mod active_alerts;
pub mod base;
pub mod error;
pub mod extreme;
pub mod frame;
pub mod pressure_kpi;
pub mod severity;
pub mod word_cloud;

use crate::views::error::ViewError;
use std::fmt;
use std::str::FromStr;

/// Names of the result tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    ForecastView,
    CurrentWeather,
    ExtremeWeatherAlerts,
    ForecastWordCloud,
    CurrentActiveAlerts,
    BarometricPressureKpi,
    AlertSeverityLevels,
}

impl View {
    pub const ALL: [View; 7] = [
        View::ForecastView,
        View::CurrentWeather,
        View::ExtremeWeatherAlerts,
        View::ForecastWordCloud,
        View::CurrentActiveAlerts,
        View::BarometricPressureKpi,
        View::AlertSeverityLevels,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            View::ForecastView => "forecast_view",
            View::CurrentWeather => "current_weather",
            View::ExtremeWeatherAlerts => "extreme_weather_alerts",
            View::ForecastWordCloud => "forecast_word_cloud",
            View::CurrentActiveAlerts => "current_active_alerts",
            View::BarometricPressureKpi => "barometric_pressure_kpi",
            View::AlertSeverityLevels => "alert_severity_levels",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for View {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| ViewError::UnknownView(s.to_string()))
    }
}
