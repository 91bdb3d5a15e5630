//! The immutable input every view is computed from.

use crate::export::{export_rows, ExportFormat};
use crate::records::report::LoadReport;
use crate::types::reading::{NormalizedReading, WeatherReading};
use crate::views::active_alerts::{current_active_alerts, ActiveAlert};
use crate::views::base::{current_weather, forecast_view};
use crate::views::error::ViewError;
use crate::views::extreme::{extreme_weather_alerts, ExtremeWeatherAlert};
use crate::views::frame::ToDataFrame;
use crate::views::pressure_kpi::{barometric_pressure_kpi, PressureKpi};
use crate::views::severity::{alert_severity_levels, SeverityRow};
use crate::views::word_cloud::{forecast_word_cloud, WordCloudEntry};
use crate::views::View;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

/// Normalized readings plus the instant trailing windows are measured from.
///
/// Built once per load; every view method is a pure function of this value, so
/// calling one twice yields identical rows.
#[derive(Debug, Clone)]
pub struct ReadingSnapshot {
    readings: Arc<Vec<NormalizedReading>>,
    as_of: NaiveDateTime,
    report: LoadReport,
}

impl ReadingSnapshot {
    /// Forward fills `readings` into the base view and pins `as_of`.
    pub fn new(readings: &[WeatherReading], as_of: DateTime<Utc>, report: LoadReport) -> Self {
        Self {
            readings: Arc::new(forecast_view(readings)),
            as_of: as_of.naive_utc(),
            report,
        }
    }

    /// Snapshot of in-memory readings, with a report that only counts them as kept.
    pub fn from_readings(readings: &[WeatherReading], as_of: DateTime<Utc>) -> Self {
        let report = LoadReport {
            rows_read: readings.len(),
            rows_kept: readings.len(),
            ..LoadReport::default()
        };
        Self::new(readings, as_of, report)
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of.and_utc()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn forecast_view(&self) -> &[NormalizedReading] {
        &self.readings
    }

    pub fn current_weather(&self) -> Vec<NormalizedReading> {
        current_weather(&self.readings)
    }

    pub fn extreme_weather_alerts(&self) -> Vec<ExtremeWeatherAlert> {
        extreme_weather_alerts(&self.readings)
    }

    pub fn forecast_word_cloud(&self) -> Vec<WordCloudEntry> {
        forecast_word_cloud(&self.readings, self.as_of)
    }

    pub fn current_active_alerts(&self) -> Vec<ActiveAlert> {
        current_active_alerts(&self.readings)
    }

    pub fn barometric_pressure_kpi(&self) -> Vec<PressureKpi> {
        barometric_pressure_kpi(&self.readings, self.as_of)
    }

    pub fn alert_severity_levels(&self) -> Vec<SeverityRow> {
        alert_severity_levels(&self.readings)
    }

    /// Computes a single view and returns it as a DataFrame.
    pub fn frame(&self, view: View) -> Result<DataFrame, ViewError> {
        let df = match view {
            View::ForecastView => self.forecast_view().to_dataframe(),
            View::CurrentWeather => self.current_weather().to_dataframe(),
            View::ExtremeWeatherAlerts => self.extreme_weather_alerts().to_dataframe(),
            View::ForecastWordCloud => self.forecast_word_cloud().to_dataframe(),
            View::CurrentActiveAlerts => self.current_active_alerts().to_dataframe(),
            View::BarometricPressureKpi => self.barometric_pressure_kpi().to_dataframe(),
            View::AlertSeverityLevels => self.alert_severity_levels().to_dataframe(),
        };
        df.map_err(|e| ViewError::Frame {
            view: view.name(),
            source: e,
        })
    }

    /// Computes every derived view on the blocking pool, one task per view.
    pub async fn materialize(&self) -> Result<ViewSet, ViewError> {
        let as_of = self.as_of;
        let current = spawn_view(&self.readings, current_weather);
        let extreme = spawn_view(&self.readings, extreme_weather_alerts);
        let active = spawn_view(&self.readings, current_active_alerts);
        let severity = spawn_view(&self.readings, alert_severity_levels);
        let word_cloud = spawn_view(&self.readings, move |r| forecast_word_cloud(r, as_of));
        let pressure = spawn_view(&self.readings, move |r| barometric_pressure_kpi(r, as_of));

        let (current, extreme, word_cloud, active, pressure, severity) =
            tokio::try_join!(current, extreme, word_cloud, active, pressure, severity)?;
        debug!(
            "Materialized views over {} readings as of {}",
            self.readings.len(),
            self.as_of
        );

        Ok(ViewSet {
            forecast_view: Arc::clone(&self.readings),
            current_weather: current,
            extreme_weather_alerts: extreme,
            forecast_word_cloud: word_cloud,
            current_active_alerts: active,
            barometric_pressure_kpi: pressure,
            alert_severity_levels: severity,
        })
    }
}

fn spawn_view<T, F>(readings: &Arc<Vec<NormalizedReading>>, f: F) -> task::JoinHandle<Vec<T>>
where
    T: Send + 'static,
    F: FnOnce(&[NormalizedReading]) -> Vec<T> + Send + 'static,
{
    let readings = Arc::clone(readings);
    task::spawn_blocking(move || f(&readings))
}

/// All seven result tables computed from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSet {
    pub forecast_view: Arc<Vec<NormalizedReading>>,
    pub current_weather: Vec<NormalizedReading>,
    pub extreme_weather_alerts: Vec<ExtremeWeatherAlert>,
    pub forecast_word_cloud: Vec<WordCloudEntry>,
    pub current_active_alerts: Vec<ActiveAlert>,
    pub barometric_pressure_kpi: Vec<PressureKpi>,
    pub alert_severity_levels: Vec<SeverityRow>,
}

impl ViewSet {
    pub fn len_of(&self, view: View) -> usize {
        match view {
            View::ForecastView => self.forecast_view.len(),
            View::CurrentWeather => self.current_weather.len(),
            View::ExtremeWeatherAlerts => self.extreme_weather_alerts.len(),
            View::ForecastWordCloud => self.forecast_word_cloud.len(),
            View::CurrentActiveAlerts => self.current_active_alerts.len(),
            View::BarometricPressureKpi => self.barometric_pressure_kpi.len(),
            View::AlertSeverityLevels => self.alert_severity_levels.len(),
        }
    }

    pub fn frame(&self, view: View) -> Result<DataFrame, ViewError> {
        let df = match view {
            View::ForecastView => self.forecast_view.to_dataframe(),
            View::CurrentWeather => self.current_weather.to_dataframe(),
            View::ExtremeWeatherAlerts => self.extreme_weather_alerts.to_dataframe(),
            View::ForecastWordCloud => self.forecast_word_cloud.to_dataframe(),
            View::CurrentActiveAlerts => self.current_active_alerts.to_dataframe(),
            View::BarometricPressureKpi => self.barometric_pressure_kpi.to_dataframe(),
            View::AlertSeverityLevels => self.alert_severity_levels.to_dataframe(),
        };
        df.map_err(|e| ViewError::Frame {
            view: view.name(),
            source: e,
        })
    }

    /// Writes one table to `<dir>/<view name>.<ext>`.
    pub fn export(
        &self,
        view: View,
        format: ExportFormat,
        dir: &Path,
    ) -> Result<PathBuf, ViewError> {
        let name = view.name();
        match view {
            View::ForecastView => export_rows(&self.forecast_view, name, format, dir),
            View::CurrentWeather => export_rows(&self.current_weather, name, format, dir),
            View::ExtremeWeatherAlerts => {
                export_rows(&self.extreme_weather_alerts, name, format, dir)
            }
            View::ForecastWordCloud => export_rows(&self.forecast_word_cloud, name, format, dir),
            View::CurrentActiveAlerts => {
                export_rows(&self.current_active_alerts, name, format, dir)
            }
            View::BarometricPressureKpi => {
                export_rows(&self.barometric_pressure_kpi, name, format, dir)
            }
            View::AlertSeverityLevels => {
                export_rows(&self.alert_severity_levels, name, format, dir)
            }
        }
    }
}
