//! Conversion of view rows into polars DataFrames.

use crate::types::reading::{NormalizedReading, WeatherReading};
use crate::types::schema::*;
use crate::views::active_alerts::ActiveAlert;
use crate::views::extreme::ExtremeWeatherAlert;
use crate::views::pressure_kpi::PressureKpi;
use crate::views::severity::SeverityRow;
use crate::views::word_cloud::WordCloudEntry;
use chrono::NaiveDateTime;
use polars::prelude::*;

/// Tabular form of a view result.
///
/// Column names match the field names of the row type; timestamps become polars
/// datetimes and labels become strings.
pub trait ToDataFrame {
    fn to_dataframe(&self) -> PolarsResult<DataFrame>;
}

fn col_of<T, P>(name: &str, values: T) -> Column
where
    Series: NamedFrom<T, P>,
    P: ?Sized,
{
    Column::new(name.into(), values)
}

fn datetimes<R>(rows: &[R], f: impl Fn(&R) -> NaiveDateTime) -> Vec<NaiveDateTime> {
    rows.iter().map(f).collect()
}

fn strings<R>(rows: &[R], f: impl Fn(&R) -> &str) -> Vec<String> {
    rows.iter().map(|r| f(r).to_string()).collect()
}

fn opt_floats<R>(rows: &[R], f: impl Fn(&R) -> Option<f64>) -> Vec<Option<f64>> {
    rows.iter().map(f).collect()
}

fn opt_strings<R>(rows: &[R], f: impl Fn(&R) -> Option<&str>) -> Vec<Option<String>> {
    rows.iter().map(|r| f(r).map(str::to_string)).collect()
}

fn readings_frame(rows: &[&WeatherReading]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        col_of(COL_TIMESTAMP, datetimes(rows, |r| r.timestamp)),
        col_of(COL_REGION, strings(rows, |r| r.region.as_str())),
        col_of(COL_TEMP_C, opt_floats(rows, |r| r.temperature_celsius)),
        col_of(COL_TEMP_F, opt_floats(rows, |r| r.temperature_fahrenheit)),
        col_of(COL_HUMIDITY, opt_floats(rows, |r| r.humidity)),
        col_of(COL_WIND_SPEED, opt_floats(rows, |r| r.wind_speed_ms)),
        col_of(
            COL_WIND_DIR,
            rows.iter().map(|r| r.wind_direction).collect::<Vec<_>>(),
        ),
        col_of(COL_PRESSURE, opt_floats(rows, |r| r.barometric_pressure)),
        col_of(COL_VISIBILITY, opt_floats(rows, |r| r.visibility)),
        col_of(COL_DEW_POINT, opt_floats(rows, |r| r.dew_point)),
        col_of(COL_HEAT_INDEX, opt_floats(rows, |r| r.heat_index)),
        col_of(COL_WIND_CHILL, opt_floats(rows, |r| r.wind_chill)),
        col_of(
            COL_PRESENT_WEATHER,
            opt_strings(rows, |r| r.present_weather.as_deref()),
        ),
        col_of(
            COL_FORECAST_TEMP,
            rows.iter().map(|r| r.forecast_temp).collect::<Vec<_>>(),
        ),
        col_of(
            COL_SHORT_FORECAST,
            opt_strings(rows, |r| r.short_forecast.as_deref()),
        ),
        col_of(
            COL_DETAILED_FORECAST,
            opt_strings(rows, |r| r.detailed_forecast.as_deref()),
        ),
        col_of(COL_SNOW, opt_floats(rows, |r| r.snow_level)),
        col_of(COL_ICE, opt_floats(rows, |r| r.ice_accumulation)),
        col_of(COL_PRECIP_PROB, opt_floats(rows, |r| r.precipitation_probability)),
        col_of(COL_MAX_TEMP, opt_floats(rows, |r| r.max_temperature)),
        col_of(COL_MIN_TEMP, opt_floats(rows, |r| r.min_temperature)),
        col_of(COL_UV_INDEX, opt_floats(rows, |r| r.uv_index)),
        col_of(COL_HAS_ALERTS, opt_strings(rows, |r| r.has_alerts.as_deref())),
    ])
}

impl ToDataFrame for [WeatherReading] {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        readings_frame(&self.iter().collect::<Vec<_>>())
    }
}

impl ToDataFrame for [NormalizedReading] {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        readings_frame(&self.iter().map(|r| &**r).collect::<Vec<_>>())
    }
}

impl ToDataFrame for [ExtremeWeatherAlert] {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            col_of("timestamp", datetimes(self, |r| r.timestamp)),
            col_of("region", strings(self, |r| r.region.as_str())),
            col_of("temperature_celsius", opt_floats(self, |r| r.temperature_celsius)),
            col_of("wind_speed_ms", opt_floats(self, |r| r.wind_speed_ms)),
            col_of("snow_level", opt_floats(self, |r| r.snow_level)),
            col_of("ice_accumulation", opt_floats(self, |r| r.ice_accumulation)),
            col_of("has_alerts", opt_strings(self, |r| r.has_alerts.as_deref())),
            col_of("temperature_alert", strings(self, |r| r.temperature_alert.as_str())),
            col_of("wind_alert", strings(self, |r| r.wind_alert.as_str())),
            col_of(
                "precipitation_alert",
                strings(self, |r| r.precipitation_alert.as_str()),
            ),
        ])
    }
}

impl ToDataFrame for [ActiveAlert] {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            col_of("timestamp", datetimes(self, |r| r.timestamp)),
            col_of("region", strings(self, |r| r.region.as_str())),
            col_of("alert_type", strings(self, |r| r.alert_type.as_str())),
            col_of("temperature_fahrenheit", opt_floats(self, |r| r.temperature_fahrenheit)),
            col_of("wind_speed_ms", opt_floats(self, |r| r.wind_speed_ms)),
            col_of(
                "precipitation_probability",
                opt_floats(self, |r| r.precipitation_probability),
            ),
            col_of("short_forecast", opt_strings(self, |r| r.short_forecast.as_deref())),
            col_of("has_alerts", opt_strings(self, |r| r.has_alerts.as_deref())),
        ])
    }
}

impl ToDataFrame for [SeverityRow] {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            col_of("timestamp", datetimes(self, |r| r.timestamp)),
            col_of("region", strings(self, |r| r.region.as_str())),
            col_of("temperature_fahrenheit", opt_floats(self, |r| r.temperature_fahrenheit)),
            col_of("wind_speed_ms", opt_floats(self, |r| r.wind_speed_ms)),
            col_of(
                "precipitation_probability",
                opt_floats(self, |r| r.precipitation_probability),
            ),
            col_of("has_alerts", opt_strings(self, |r| r.has_alerts.as_deref())),
            col_of("severity_level", strings(self, |r| r.severity_level.as_str())),
        ])
    }
}

impl ToDataFrame for [PressureKpi] {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            col_of("hour_bucket", datetimes(self, |r| r.hour_bucket)),
            col_of(
                "current_pressure_inhg",
                self.iter().map(|r| r.current_pressure_inhg).collect::<Vec<_>>(),
            ),
            col_of(
                "target_pressure_inhg",
                self.iter().map(|r| r.target_pressure_inhg).collect::<Vec<_>>(),
            ),
            col_of(
                "reading_count",
                self.iter().map(|r| r.reading_count).collect::<Vec<_>>(),
            ),
            col_of("pressure_status", strings(self, |r| r.pressure_status.as_str())),
            col_of(
                "deviation_percent",
                self.iter().map(|r| r.deviation_percent).collect::<Vec<_>>(),
            ),
        ])
    }
}

impl ToDataFrame for [WordCloudEntry] {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            col_of("forecast_text", strings(self, |r| r.forecast_text.as_str())),
            col_of("region", strings(self, |r| r.region.as_str())),
            col_of(
                "word_count",
                self.iter().map(|r| r.word_count).collect::<Vec<_>>(),
            ),
        ])
    }
}
